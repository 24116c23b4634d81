//! Error types for taskdeck-core

use serde::Deserialize;
use thiserror::Error;

/// Result type alias using taskdeck-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in taskdeck-core task operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected before any network call was made
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Task not found in the local collection
    #[error("Task not found: {0}")]
    NotFound(String),

    /// HTTP transport failure (connection, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be parsed
    #[error("Failed to parse server response: {0}")]
    Json(#[from] serde_json::Error),

    /// Server rejected the request with a non-2xx status
    #[error("API error: {0}")]
    Api(String),

    /// Server no longer accepts the session token
    #[error("Session is no longer valid; sign in again")]
    Unauthorized,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Render a non-2xx response into a user-facing message, preferring the
/// server's own `message`/`error` fields when the body is JSON.
pub(crate) fn parse_api_error(status: u16, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status);
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("{trimmed} ({status})")
    }
}
