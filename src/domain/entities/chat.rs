//! Chat (conversation) entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{timestamp, Message, User};

/// Conversation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    /// One-to-one conversation
    #[default]
    Direct,
    /// Conversation with any number of participants
    Group,
}

/// A conversation the signed-in user takes part in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,

    pub name: String,

    #[serde(default)]
    pub chat_type: ChatType,

    #[serde(default)]
    pub participants: Vec<User>,

    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<Message>,
}

/// Preview text shown when a chat has no messages.
pub const EMPTY_CHAT_PREVIEW: &str = "No messages yet";

impl Chat {
    /// Content of the latest message, or a placeholder.
    pub fn preview(&self) -> &str {
        self.last_message
            .as_ref()
            .map(|m| m.content.as_str())
            .unwrap_or(EMPTY_CHAT_PREVIEW)
    }

    /// First participant that is not `user_id`.
    ///
    /// Used as the receiver of outgoing messages.
    pub fn counterpart_of(&self, user_id: i64) -> Option<&User> {
        self.participants.iter().find(|p| p.id != user_id)
    }
}
