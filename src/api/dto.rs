//! Data Transfer Objects
//!
//! Form bodies posted by the console pages and JSON bodies served by the
//! health endpoints.

use serde::{Deserialize, Serialize};

use crate::console::Action;

/// Login form body
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub site_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl From<LoginForm> for Action {
    fn from(form: LoginForm) -> Self {
        Action::Login {
            site_url: form.site_url,
            username: form.username,
            password: form.password,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: "healthy"
    pub status: String,
    /// Number of live operator sessions
    pub sessions: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Crate version
    pub version: String,
}
