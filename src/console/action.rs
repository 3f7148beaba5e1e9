//! Console Actions
//!
//! Every operator interaction is an `Action`. `apply` performs at most the
//! round trips that action needs, updates the session only with what
//! succeeded, and queues notices for the next render.

use std::collections::HashMap;

use super::form::collect_meta;
use crate::session::{NoticeLevel, Page, Session};
use crate::wp::{EntryDraft, EntryStatus, WpClient, WpError};

/// Editor form as submitted by the browser
#[derive(Debug, Clone, Default)]
pub struct EditorSubmission {
    pub title: String,
    pub content: String,
    pub status: String,
    /// Raw custom-field controls, keyed by widget name
    pub fields: HashMap<String, String>,
}

impl EditorSubmission {
    /// Split a flat form body into the fixed fields and the custom-field controls
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut submission = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "title" => submission.title = value,
                "content" => submission.content = value,
                "status" => submission.status = value,
                _ => {
                    submission.fields.insert(key, value);
                }
            }
        }
        submission
    }
}

/// A user interaction with the console
#[derive(Debug, Clone)]
pub enum Action {
    Login {
        site_url: String,
        username: String,
        password: String,
    },
    Logout,
    ShowDashboard,
    /// Open the entry list of a content type
    OpenList { type_key: String },
    /// Open a blank editor; `None` means the current content type
    NewEntry { type_key: Option<String> },
    EditEntry { id: u64 },
    DeleteEntry { id: u64 },
    SaveEntry(EditorSubmission),
    Cancel,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Login { .. } => "login",
            Action::Logout => "logout",
            Action::ShowDashboard => "show_dashboard",
            Action::OpenList { .. } => "open_list",
            Action::NewEntry { .. } => "new_entry",
            Action::EditEntry { .. } => "edit_entry",
            Action::DeleteEntry { .. } => "delete_entry",
            Action::SaveEntry(_) => "save_entry",
            Action::Cancel => "cancel",
        }
    }
}

/// Apply an action to a session
pub async fn apply(session: &mut Session, client: &WpClient, action: Action) {
    let name = action.name();
    tracing::debug!(action = name, page = ?session.page, "Applying action");

    match action {
        Action::Login {
            site_url,
            username,
            password,
        } => login(session, client, &site_url, &username, &password).await,
        Action::Logout => {
            tracing::info!(site = %session.site_url(), "Logged out");
            session.reset();
        }
        // Everything else needs an authenticated session.
        _ if !session.is_authenticated() => {
            tracing::debug!(action = name, "Ignoring action without login");
        }
        Action::ShowDashboard => {
            session.page = Page::Dashboard;
            session.current_entry = None;
        }
        Action::OpenList { type_key } => {
            session.current_entry = None;
            if refresh_entries(session, client, &type_key).await {
                session.page = Page::List;
            }
        }
        Action::NewEntry { type_key } => {
            if let Some(type_key) = type_key {
                session.current_type = Some(type_key);
            }
            if !session.entries_are_current() {
                session.entries.clear();
                session.entries_type = None;
            }
            if session.current_type.is_some() {
                session.current_entry = None;
                session.page = Page::Edit;
            }
        }
        Action::EditEntry { id } => edit_entry(session, client, id).await,
        Action::DeleteEntry { id } => delete_entry(session, client, id).await,
        Action::SaveEntry(submission) => save_entry(session, client, submission).await,
        Action::Cancel => {
            session.current_entry = None;
            if !session.entries_are_current() {
                if let Some(type_key) = session.current_type.clone() {
                    refresh_entries(session, client, &type_key).await;
                }
            }
            session.page = Page::List;
        }
    }
}

async fn login(
    session: &mut Session,
    client: &WpClient,
    site_url: &str,
    username: &str,
    password: &str,
) {
    if site_url.trim().is_empty() || username.is_empty() || password.is_empty() {
        session.notify(NoticeLevel::Error, "Please fill in all fields");
        return;
    }

    let (credentials, user) = match client.authenticate(site_url, username, password).await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!(site = %site_url, error = %e, "Login failed");
            session.notify(NoticeLevel::Error, login_error_text(&e));
            return;
        }
    };

    session.reset();
    match client.list_content_types(&credentials).await {
        Ok(types) => session.content_types = types,
        Err(e) => session.notify(
            NoticeLevel::Error,
            format!("Failed to retrieve content types: {}", e),
        ),
    }
    session.credentials = Some(credentials);
    session.current_user = Some(user);
    session.page = Page::Dashboard;
}

fn login_error_text(err: &WpError) -> String {
    match err {
        WpError::Api {
            message: Some(message),
            ..
        } => format!("Authentication failed: {}", message),
        WpError::Api { status, .. } => format!("Authentication failed: HTTP {}", status),
        WpError::Connection(e) => format!("Error connecting to site: {}", e),
        other => format!("Authentication failed: {}", other),
    }
}

/// Reload the entry list for `type_key`; on failure the previous list stays
async fn refresh_entries(session: &mut Session, client: &WpClient, type_key: &str) -> bool {
    let Some(credentials) = session.credentials.as_ref() else {
        return false;
    };
    let collection = session.collection_for(type_key);

    let result = client.list_entries(credentials, collection).await;
    match result {
        Ok(entries) => {
            session.entries = entries;
            session.current_type = Some(type_key.to_string());
            session.entries_type = Some(type_key.to_string());
            true
        }
        Err(e) => {
            let name = session.type_name(type_key).to_string();
            session.notify(
                NoticeLevel::Error,
                format!("Failed to retrieve {}: {}", name, e),
            );
            false
        }
    }
}

async fn edit_entry(session: &mut Session, client: &WpClient, id: u64) {
    let (Some(credentials), Some(type_key)) =
        (session.credentials.as_ref(), session.current_type.as_deref())
    else {
        return;
    };
    let collection = session.collection_for(type_key);

    let result = client.get_entry(credentials, collection, id).await;
    match result {
        Ok(entry) => {
            session.current_entry = Some(entry);
            session.page = Page::Edit;
        }
        Err(e) => {
            tracing::warn!(id, error = %e, "Failed to load entry");
            session.notify(NoticeLevel::Error, format!("Failed to retrieve entry: {}", e));
        }
    }
}

async fn delete_entry(session: &mut Session, client: &WpClient, id: u64) {
    let (Some(credentials), Some(type_key)) =
        (session.credentials.as_ref(), session.current_type.clone())
    else {
        return;
    };
    let collection = session.collection_for(&type_key);

    let result = client.delete_entry(credentials, collection, id).await;
    match result {
        Ok(_) => {
            let title = session
                .entries
                .iter()
                .find(|e| e.id == Some(id))
                .map(|e| e.title.clone())
                .unwrap_or_else(|| id.to_string());
            session.notify(
                NoticeLevel::Success,
                format!("'{}' deleted successfully", title),
            );
            refresh_entries(session, client, &type_key).await;
        }
        Err(e) => {
            tracing::warn!(id, error = %e, "Failed to delete entry");
            session.notify(NoticeLevel::Error, format!("Failed to delete entry: {}", e));
        }
    }
}

async fn save_entry(session: &mut Session, client: &WpClient, submission: EditorSubmission) {
    let (Some(credentials), Some(type_key)) =
        (session.credentials.as_ref(), session.current_type.clone())
    else {
        return;
    };

    let status = EntryStatus::parse(&submission.status);
    let status = if status.is_selectable() {
        status
    } else {
        EntryStatus::Draft
    };

    let (id, meta) = match session.current_entry.as_ref() {
        Some(entry) => (entry.id, collect_meta(&entry.meta_boxes, &submission.fields)),
        None => (None, Vec::new()),
    };
    let draft = EntryDraft {
        title: submission.title,
        content: submission.content,
        status,
        meta,
    };

    let collection = session.collection_for(&type_key);
    let result = client.save_entry(credentials, collection, &draft, id).await;
    match result {
        Ok(_) => {
            let name = session.type_name(&type_key).to_string();
            session.notify(NoticeLevel::Success, format!("{} saved successfully", name));
            session.current_entry = None;
            refresh_entries(session, client, &type_key).await;
            session.page = Page::List;
        }
        Err(e) => {
            tracing::warn!(id = ?id, error = %e, "Failed to save entry");
            session.notify(NoticeLevel::Error, format!("Failed to save entry: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wp::{AuthToken, Credentials, Entry, WpClientConfig};

    fn offline_client() -> WpClient {
        WpClient::new(WpClientConfig::default()).unwrap()
    }

    #[test]
    fn test_submission_from_pairs() {
        let submission = EditorSubmission::from_pairs(vec![
            ("title".into(), "Widget".into()),
            ("content".into(), "<p>x</p>".into()),
            ("status".into(), "publish".into()),
            ("meta-0-0".into(), "W-100".into()),
        ]);
        assert_eq!(submission.title, "Widget");
        assert_eq!(submission.status, "publish");
        assert_eq!(submission.fields["meta-0-0"], "W-100");
        assert_eq!(submission.fields.len(), 1);
    }

    #[tokio::test]
    async fn test_login_requires_all_fields() {
        let mut session = Session::new();
        let action = Action::Login {
            site_url: "https://example.com".into(),
            username: "admin".into(),
            password: String::new(),
        };
        apply(&mut session, &offline_client(), action).await;

        assert!(!session.is_authenticated());
        assert_eq!(session.notices()[0].text, "Please fill in all fields");
    }

    #[tokio::test]
    async fn test_actions_ignored_when_logged_out() {
        let mut session = Session::new();
        apply(&mut session, &offline_client(), Action::Cancel).await;
        assert_eq!(session.page, Page::Dashboard);
        assert!(session.notices().is_empty());
    }

    #[tokio::test]
    async fn test_new_and_cancel_transitions() {
        let mut session = Session::new();
        session.credentials = Some(Credentials::new(
            "https://example.com",
            AuthToken::basic("admin", "secret"),
        ));
        session.current_type = Some("product".into());
        session.entries_type = Some("product".into());
        session.entries = vec![Entry::default()];
        session.current_entry = Some(Entry::default());
        let client = offline_client();

        // Same type: the loaded list is kept and no request is made.
        apply(&mut session, &client, Action::NewEntry { type_key: None }).await;
        assert_eq!(session.page, Page::Edit);
        assert_eq!(session.current_type.as_deref(), Some("product"));
        assert!(session.current_entry.is_none());
        assert_eq!(session.entries.len(), 1);

        apply(&mut session, &client, Action::Cancel).await;
        assert_eq!(session.page, Page::List);
        assert_eq!(session.entries.len(), 1);

        apply(&mut session, &client, Action::ShowDashboard).await;
        assert_eq!(session.page, Page::Dashboard);

        apply(&mut session, &client, Action::Logout).await;
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_login_error_text() {
        let with_message = WpError::Api {
            status: 401,
            message: Some("Incorrect password.".into()),
        };
        assert_eq!(
            login_error_text(&with_message),
            "Authentication failed: Incorrect password."
        );

        let bare = WpError::Api {
            status: 403,
            message: None,
        };
        assert_eq!(login_error_text(&bare), "Authentication failed: HTTP 403");
    }
}
