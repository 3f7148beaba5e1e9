//! Console
//!
//! The operator-facing side of the system, split along the request cycle:
//!
//! - **Actions**: explicit session transitions triggered by form posts
//! - **Views**: render the current session as HTML
//! - **Form**: the dynamic custom-field renderer used by the editor
//!
//! ## Flow
//!
//! 1. Browser posts a form, which becomes an [`Action`]
//! 2. [`apply`] talks to WordPress and updates the [`Session`](crate::session::Session)
//! 3. Browser is redirected and [`render`] draws the page the session selects

mod action;
pub mod form;
pub mod html;
mod views;

pub use action::{apply, Action, EditorSubmission};
pub use form::{collect_meta, render_meta_boxes, Widget};
pub use views::render;
