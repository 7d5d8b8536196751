//! Errors surfaced by [`crate::SnippetApi`] implementations.

use thiserror::Error;

/// Network, HTTP, and payload failures.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Server did not confirm {0}")]
    Rejected(&'static str),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl ApiError {
    pub fn not_found(what: &str, id: &str) -> Self {
        ApiError::Status {
            status: 404,
            message: format!("{} with id {} not found", what, id),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Status {
            status: 409,
            message: message.into(),
        }
    }

    /// HTTP status code when the server answered with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// The message shown to users: the server text when there is one.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Transport(err) if err.is_timeout() => "Request timed out".to_string(),
            ApiError::Transport(err) if err.is_connect() => {
                "Could not connect to the snippet server".to_string()
            }
            other => other.to_string(),
        }
    }
}
