//! Request DTOs
//!
//! Data structures for API request bodies.

use serde::Serialize;
use validator::Validate;

use crate::domain::{ChannelId, ChatType, Gender, MessageType, Role};

/// Message shown when any required form field is blank.
pub const REQUIRED_FIELDS_MESSAGE: &str = "Required fields are missing";

/// Login request, sent form-encoded to `/auth/token`.
///
/// The backend's OAuth2 password flow names the email field `username`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[serde(rename = "username")]
    #[validate(length(min = 1, message = "Required fields are missing"))]
    pub email: String,

    #[validate(length(min = 1, message = "Required fields are missing"))]
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Required fields are missing"))]
    pub username: String,

    #[validate(length(min = 1, message = "Required fields are missing"))]
    pub email: String,

    #[validate(length(min = 1, message = "Required fields are missing"))]
    pub password: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl RegisterRequest {
    /// Credentials for the login that follows a successful registration.
    pub fn login(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

/// Refresh token request
#[derive(Debug, Serialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Send message request, also used as the realtime fan-out payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageCreate {
    pub chat_id: i64,

    pub sender_id: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_id: Option<i64>,

    pub content: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<MessageType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<i64>,
}

impl MessageCreate {
    /// Plain text message from `sender_id` into `chat`.
    pub fn text(chat: ChannelId, sender_id: i64, content: impl Into<String>) -> Self {
        Self {
            chat_id: chat.as_i64(),
            sender_id,
            receiver_id: None,
            content: content.into(),
            message_type: Some(MessageType::Text),
            attachment_url: None,
            parent_message_id: None,
        }
    }

    pub fn to(mut self, receiver_id: Option<i64>) -> Self {
        self.receiver_id = receiver_id;
        self
    }
}

/// Create chat request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct ChatCreate {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_type: Option<ChatType>,

    #[validate(length(min = 1, message = "At least one participant is required"))]
    pub participant_ids: Vec<i64>,
}

/// Message page query parameters
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MessageQueryParams {
    pub page: u32,
    pub page_size: u32,
}

impl Default for MessageQueryParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}
