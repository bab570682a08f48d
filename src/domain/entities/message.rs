//! Message entity.
//!
//! Mirrors the backend's message record, used both by the REST API and by
//! realtime fan-out payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{timestamp, User};

/// Kind of message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// Plain text
    #[default]
    Text,
    /// Image attachment
    Image,
    /// Generic file attachment
    File,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::File => "file",
        }
    }

    /// True for kinds that carry an attachment URL.
    pub fn has_attachment(&self) -> bool {
        !matches!(self, Self::Text)
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted message in a chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,

    /// Full sender record
    pub sender: User,

    pub receiver_id: i64,

    pub content: String,

    #[serde(default)]
    pub message_type: MessageType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,

    /// Message this one replies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<i64>,

    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,

    #[serde(default)]
    pub is_read: bool,
}

impl Message {
    /// Check if this message was sent by the given user.
    pub fn is_from(&self, user_id: i64) -> bool {
        self.sender.id == user_id
    }

    /// Check if this is a reply message.
    pub fn is_reply(&self) -> bool {
        self.parent_message_id.is_some()
    }
}
