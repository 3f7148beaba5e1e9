//! Application State
//!
//! Shared state accessible by all handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::session::{SessionStore, SessionStoreConfig};
use crate::wp::WpClient;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// WordPress REST client shared by every session
    pub client: WpClient,
    /// Per-browser operator sessions
    pub sessions: Arc<SessionStore>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(client: WpClient, config: ServerConfig) -> Self {
        let sessions = SessionStore::new(config.sessions.clone());
        Self {
            client,
            sessions: Arc::new(sessions),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Console server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Name of the session cookie
    pub cookie_name: String,
    /// Mark the session cookie `Secure` (HTTPS deployments)
    pub secure_cookie: bool,
    /// Session store limits
    pub sessions: SessionStoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            cookie_name: "cpt_session".to_string(),
            secure_cookie: false,
            sessions: SessionStoreConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
