//! Server Routes
//!
//! Route handlers organized by functionality.

pub mod console;
pub mod health;
