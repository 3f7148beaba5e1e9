//! Server Error Types
//!
//! Errors raised by the console server itself (not by WordPress, whose
//! failures are shown to the operator as notices) and their conversion to
//! HTTP responses.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::console::html::escape;
use crate::session::SessionError;

/// Server error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Session could not be created
    #[error("Service unavailable: {0}")]
    Session(#[from] SessionError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Session(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };

        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::error!(
            request_id = %request_id,
            error_code = %code,
            error_message = %self,
            "Request failed"
        );

        let body = format!(
            "<!DOCTYPE html><html><body><h1>{}</h1><p>{}</p><p><small>Request {}</small></p></body></html>",
            status,
            escape(&self.to_string()),
            request_id
        );

        (status, Html(body)).into_response()
    }
}

/// Result type for server operations
pub type ApiResult<T> = Result<T, ApiError>;
