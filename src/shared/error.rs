//! Client Error Types
//!
//! Centralized error handling for the REST, storage, and realtime layers.

use serde_json::Value;

use crate::domain::value_objects::InvalidChannelId;
use crate::infrastructure::realtime::TransportError;

/// Fallback shown when the backend gives no usable detail.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Client error type
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    InvalidChannel(#[from] InvalidChannelId),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not authenticated")]
    Unauthenticated,
}

impl ClientError {
    /// One-line message suitable for a view's error slot.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { detail, .. } => detail.clone(),
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Unauthenticated => "Please sign in first".into(),
            ClientError::InvalidChannel(e) => e.to_string(),
            _ => GENERIC_ERROR_MESSAGE.into(),
        }
    }

    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Credential storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt credential file: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Extract a human-readable message from an error body's `detail` field.
///
/// The backend answers either `{"detail": "text"}` or a list of field errors
/// `{"detail": [{"msg": "..."}, ...]}`.
pub fn extract_detail(body: &Value) -> String {
    match body.get("detail") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if msgs.is_empty() {
                GENERIC_ERROR_MESSAGE.into()
            } else {
                msgs.join(", ")
            }
        }
        _ => GENERIC_ERROR_MESSAGE.into(),
    }
}
