//! Errors surfaced to users.
//!
//! Every failure ends up as a message string in the UI. The variants only
//! record where the message came from; nothing retries based on them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The JSON shape every endpoint uses for errors and plain confirmations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Rejected locally before anything was sent.
    #[error("{0}")]
    Validation(String),
    /// The server answered with a non-success status.
    #[error("{message}")]
    Http { status: u16, message: String },
    /// The request never produced a response.
    #[error("{0}")]
    Transport(String),
    /// A success response whose body could not be decoded.
    #[error("{0}")]
    Decode(String),
}

impl StoreError {
    /// Builds the error for a non-success response.
    ///
    /// `action` completes the sentence "Failed to ...", e.g. `"update control"`.
    /// A JSON body with a `message` wins; a JSON body without one falls back to
    /// the status line; anything else is reported as an unexpected response.
    pub fn from_response(status: u16, status_text: &str, body: &str, action: &str) -> Self {
        let message = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => value
                .get("message")
                .and_then(serde_json::Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP error! status: {status} {status_text}")),
            Err(_) => format!(
                "Failed to {action}. Server responded unexpectedly (status: {status})"
            ),
        };
        StoreError::Http { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
