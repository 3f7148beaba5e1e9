//! Session Store
//!
//! Maps the opaque id carried in a browser cookie to that browser's
//! `Session`. Each session sits behind its own mutex, so a session runs one
//! action at a time while different browsers proceed independently.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::Session;

/// Opaque session identifier
pub type SessionId = String;

/// Shared handle to one session
pub type SessionHandle = Arc<Mutex<Session>>;

/// Configuration for the session store
#[derive(Debug, Clone)]
pub struct SessionStoreConfig {
    /// Maximum number of live sessions
    pub max_sessions: usize,
    /// Sessions untouched for this long are dropped
    pub idle_timeout: Duration,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            max_sessions: 256,
            idle_timeout: Duration::from_secs(60 * 60),
        }
    }
}

struct Slot {
    session: SessionHandle,
    last_seen: Instant,
}

/// In-memory store of all operator sessions
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Slot>>,
    config: SessionStoreConfig,
}

impl SessionStore {
    pub fn new(config: SessionStoreConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Look up a live session without creating one
    pub async fn get(&self, id: &str) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let slot = sessions.get_mut(id)?;
        if slot.last_seen.elapsed() > self.config.idle_timeout {
            return None;
        }
        slot.last_seen = Instant::now();
        Some(Arc::clone(&slot.session))
    }

    /// Look up the session for `id`, creating a fresh one when the id is
    /// missing or unknown.
    ///
    /// When the store is full, the least recently seen session that is not
    /// logged in is evicted; only logged-in sessions can exhaust the store.
    ///
    /// Returns the id actually in use and whether it was newly created.
    pub async fn resolve(
        &self,
        id: Option<&str>,
    ) -> Result<(SessionId, SessionHandle, bool), SessionError> {
        let mut sessions = self.sessions.write().await;

        if let Some(id) = id {
            if let Some(slot) = sessions.get_mut(id) {
                if slot.last_seen.elapsed() <= self.config.idle_timeout {
                    slot.last_seen = Instant::now();
                    return Ok((id.to_string(), Arc::clone(&slot.session), false));
                }
            }
        }

        let idle_timeout = self.config.idle_timeout;
        let before = sessions.len();
        sessions.retain(|_, slot| slot.last_seen.elapsed() <= idle_timeout);
        if sessions.len() < before {
            tracing::debug!(purged = before - sessions.len(), "Purged idle sessions");
        }

        if sessions.len() >= self.config.max_sessions {
            // A locked session is mid-action and is never evicted.
            let anonymous = sessions
                .iter()
                .filter(|(_, slot)| {
                    slot.session
                        .try_lock()
                        .map(|session| !session.is_authenticated())
                        .unwrap_or(false)
                })
                .min_by_key(|(_, slot)| slot.last_seen)
                .map(|(id, _)| id.clone());

            match anonymous {
                Some(evicted) => {
                    sessions.remove(&evicted);
                    tracing::debug!(session_id = %evicted, "Evicted anonymous session");
                }
                None => {
                    tracing::warn!(max = self.config.max_sessions, "Session limit reached");
                    return Err(SessionError::TooManySessions);
                }
            }
        }

        let id = Uuid::new_v4().to_string();
        let session = Arc::new(Mutex::new(Session::new()));
        sessions.insert(
            id.clone(),
            Slot {
                session: Arc::clone(&session),
                last_seen: Instant::now(),
            },
        );

        tracing::info!(session_id = %id, "Session started");
        Ok((id, session, true))
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Errors raised by the session store
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Maximum number of sessions reached")]
    TooManySessions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Page;
    use crate::wp::{AuthToken, Credentials};

    #[tokio::test]
    async fn test_resolve_creates_and_reuses() {
        let store = SessionStore::new(SessionStoreConfig::default());

        let (id, handle, created) = store.resolve(None).await.unwrap();
        assert!(created);
        handle.lock().await.page = Page::Edit;

        let (same_id, same, created) = store.resolve(Some(&id)).await.unwrap();
        assert!(!created);
        assert_eq!(same_id, id);
        assert_eq!(same.lock().await.page, Page::Edit);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_id_gets_fresh_session() {
        let store = SessionStore::new(SessionStoreConfig::default());
        let (id, _, created) = store.resolve(Some("not-a-session")).await.unwrap();
        assert!(created);
        assert_ne!(id, "not-a-session");
    }

    fn log_in(session: &mut Session) {
        session.credentials = Some(Credentials::new(
            "https://example.com",
            AuthToken::basic("admin", "secret"),
        ));
    }

    #[tokio::test]
    async fn test_session_limit_counts_logged_in_sessions() {
        let store = SessionStore::new(SessionStoreConfig {
            max_sessions: 1,
            ..Default::default()
        });

        let (_, handle, _) = store.resolve(None).await.unwrap();
        log_in(&mut *handle.lock().await);

        assert!(matches!(
            store.resolve(None).await,
            Err(SessionError::TooManySessions)
        ));
    }

    #[tokio::test]
    async fn test_full_store_evicts_oldest_anonymous_session() {
        let store = SessionStore::new(SessionStoreConfig {
            max_sessions: 3,
            ..Default::default()
        });

        let (operator, handle, _) = store.resolve(None).await.unwrap();
        log_in(&mut *handle.lock().await);
        let (oldest, _, _) = store.resolve(None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let (newer, _, _) = store.resolve(None).await.unwrap();

        let (_, _, created) = store.resolve(None).await.unwrap();
        assert!(created);
        assert_eq!(store.len().await, 3);
        assert!(store.get(&oldest).await.is_none());
        assert!(store.get(&newer).await.is_some());
        assert!(store.get(&operator).await.is_some());
    }

    #[tokio::test]
    async fn test_busy_session_is_not_evicted() {
        let store = SessionStore::new(SessionStoreConfig {
            max_sessions: 1,
            ..Default::default()
        });

        let (_, handle, _) = store.resolve(None).await.unwrap();
        let _busy = handle.lock().await;
        assert!(matches!(
            store.resolve(None).await,
            Err(SessionError::TooManySessions)
        ));
    }

    #[tokio::test]
    async fn test_get_never_creates() {
        let store = SessionStore::new(SessionStoreConfig::default());
        assert!(store.get("missing").await.is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_idle_sessions_are_replaced() {
        let store = SessionStore::new(SessionStoreConfig {
            max_sessions: 1,
            idle_timeout: Duration::from_millis(10),
        });

        let (id, _, _) = store.resolve(None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        let (new_id, _, created) = store.resolve(Some(&id)).await.unwrap();
        assert!(created);
        assert_ne!(new_id, id);
        assert_eq!(store.len().await, 1);
    }
}
