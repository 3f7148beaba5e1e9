//! WordPress REST Integration
//!
//! Thin client over the WordPress REST API plus the ACPT custom-field block
//! carried inside entry payloads.
//!
//! ## Endpoints
//!
//! - `GET /wp-json/wp/v2/users/me` - credential check
//! - `GET /wp-json/wp/v2/types` - content types
//! - `GET|POST /wp-json/wp/v2/{type}` and `/{type}/{id}` - entries
//! - `DELETE /wp-json/wp/v2/{type}/{id}?force=true` - permanent delete

mod client;
mod error;
mod types;

pub use client::{WpClient, WpClientConfig};
pub use error::{WpError, WpResult};
pub use types::{
    content_types_from_json, normalize_site_url, AuthToken, ContentType, Credentials, Entry,
    EntryDraft, EntryStatus, FieldKind, FieldValue, MetaBox, MetaField, MetaUpdate, SelectOption,
    UserInfo, EXCLUDED_CONTENT_TYPES,
};
