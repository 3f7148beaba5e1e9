//! # CPT Console
//!
//! A server-rendered admin console for WordPress custom post types, including
//! the custom meta fields supplied by the ACPT plugin.
//!
//! ## Features
//!
//! - **Login** with a site URL and an application password
//! - **Browse** registered content types and their entries
//! - **Edit** entries and their custom fields through a generated form
//! - **Create and delete** entries
//!
//! ## Modules
//!
//! - [`wp`]: WordPress REST client and data types
//! - [`session`]: Per-browser session state and store
//! - [`console`]: Actions, views and the dynamic form renderer
//! - [`api`]: HTTP server with Axum
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cpt_console::wp::{WpClient, WpClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WpClient::new(WpClientConfig::default())?;
//!
//!     let (credentials, user) = client
//!         .authenticate("https://example.com", "admin", "abcd-1234-efgh-5678")
//!         .await?;
//!     println!("Logged in as {}", user.display_name());
//!
//!     for content_type in client.list_content_types(&credentials).await?.values() {
//!         println!("{} ({})", content_type.name, content_type.rest_base);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod console;
pub mod session;
pub mod wp;

// Re-export top-level types for convenience
pub use api::{build_router, serve, ApiError, AppState, ServerConfig};

pub use config::{Config, ConfigError, LoggingConfig};

pub use console::{Action, EditorSubmission};

pub use session::{Notice, NoticeLevel, Page, Session, SessionStore};

pub use wp::{
    ContentType, Credentials, Entry, EntryDraft, FieldKind, MetaBox, MetaField, WpClient,
    WpClientConfig, WpError,
};
