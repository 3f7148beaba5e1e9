//! WordPress client error types
//!
//! Transport failures and well-formed error responses are kept apart so the
//! console can word them differently.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the WordPress REST API
#[derive(Error, Debug)]
pub enum WpError {
    /// Transport-level failure (DNS, TLS, refused connection, timeout)
    #[error("{0}")]
    Connection(#[source] reqwest::Error),

    /// Well-formed HTTP response with a non-success status
    #[error("{}", api_error_text(.status, .message))]
    Api { status: u16, message: Option<String> },

    /// Success response whose body is not the expected shape
    #[error("Unexpected response body: {0}")]
    Decode(#[source] reqwest::Error),

    /// Operator-supplied site URL is not an http(s) URL
    #[error("Invalid site URL: {0}")]
    InvalidSiteUrl(String),
}

impl WpError {
    /// Upstream HTTP status, for `Api` errors only
    pub fn status(&self) -> Option<u16> {
        match self {
            WpError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Upstream `message` field, for `Api` errors only
    pub fn message(&self) -> Option<&str> {
        match self {
            WpError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, WpError::Connection(_))
    }

    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_decode() {
            WpError::Decode(err)
        } else {
            WpError::Connection(err)
        }
    }

    /// Build an `Api` error from a failed response, reading `message` from the
    /// body when it parses as JSON.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        WpError::Api {
            status,
            message: error_message(&text),
        }
    }
}

fn api_error_text(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("HTTP {}", status),
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Extract the `message` field from a WordPress error body
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
}

/// Result type for WordPress client operations
pub type WpResult<T> = Result<T, WpError>;
