//! Operator Sessions
//!
//! One `Session` per browser. It is a plain state container: the console
//! actions mutate it, the views only read it.

mod store;

pub use store::{SessionError, SessionHandle, SessionId, SessionStore, SessionStoreConfig};

use std::collections::BTreeMap;

use crate::wp::{ContentType, Credentials, Entry, UserInfo};

/// Page shown once the operator is logged in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Dashboard,
    List,
    Edit,
}

/// Severity of a flash message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A one-shot message shown on the next render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// State of one operator's console session
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Present iff the operator is authenticated
    pub credentials: Option<Credentials>,
    pub current_user: Option<UserInfo>,
    pub page: Page,
    pub content_types: BTreeMap<String, ContentType>,
    pub current_type: Option<String>,
    pub entries: Vec<Entry>,
    /// Content type `entries` was loaded for
    pub entries_type: Option<String>,
    pub current_entry: Option<Entry>,
    notices: Vec<Notice>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn site_url(&self) -> &str {
        self.credentials
            .as_ref()
            .map(|c| c.site_url.as_str())
            .unwrap_or("")
    }

    /// Clear everything back to a fresh, unauthenticated session
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Display name for a content type key, falling back to the key itself
    pub fn type_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.content_types
            .get(key)
            .map(|t| t.name.as_str())
            .unwrap_or(key)
    }

    /// REST collection segment for a content type key
    pub fn collection_for<'a>(&'a self, key: &'a str) -> &'a str {
        self.content_types
            .get(key)
            .map(|t| t.rest_base.as_str())
            .unwrap_or(key)
    }

    /// Whether `entries` holds the list of the current content type
    pub fn entries_are_current(&self) -> bool {
        self.current_type.is_some() && self.entries_type == self.current_type
    }

    pub fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.push(Notice {
            level,
            text: text.into(),
        });
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain pending notices for rendering
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wp::AuthToken;

    fn logged_in() -> Session {
        let mut session = Session::new();
        session.credentials = Some(Credentials::new(
            "https://example.com",
            AuthToken::basic("admin", "secret"),
        ));
        session.content_types.insert(
            "post".into(),
            ContentType {
                key: "post".into(),
                name: "Posts".into(),
                rest_base: "posts".into(),
            },
        );
        session.page = Page::List;
        session.current_type = Some("post".into());
        session.entries.push(Entry::default());
        session
    }

    #[test]
    fn test_new_session_is_unauthenticated() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert_eq!(session.page, Page::Dashboard);
        assert_eq!(session.site_url(), "");
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = logged_in();
        session.notify(NoticeLevel::Success, "hello");
        session.reset();

        assert!(!session.is_authenticated());
        assert!(session.content_types.is_empty());
        assert!(session.entries.is_empty());
        assert!(session.current_type.is_none());
        assert!(session.notices().is_empty());
        assert_eq!(session.page, Page::Dashboard);
    }

    #[test]
    fn test_type_lookup_falls_back_to_key() {
        let session = logged_in();
        assert_eq!(session.type_name("post"), "Posts");
        assert_eq!(session.collection_for("post"), "posts");
        assert_eq!(session.type_name("product"), "product");
        assert_eq!(session.collection_for("product"), "product");
    }

    #[test]
    fn test_entries_follow_their_type() {
        let mut session = logged_in();
        assert!(!session.entries_are_current());

        session.entries_type = Some("post".into());
        assert!(session.entries_are_current());

        session.current_type = Some("page".into());
        assert!(!session.entries_are_current());
    }

    #[test]
    fn test_take_notices_drains() {
        let mut session = Session::new();
        session.notify(NoticeLevel::Error, "boom");
        assert_eq!(session.take_notices().len(), 1);
        assert!(session.take_notices().is_empty());
    }
}
