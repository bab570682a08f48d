//! REST API client
//!
//! Typed access to the chat backend's HTTP endpoints.
//!
//! | Method | Path                          | Operation        |
//! |--------|-------------------------------|------------------|
//! | POST   | `/users/register`             | `register`       |
//! | POST   | `/auth/token` (form)          | `login`          |
//! | GET    | `/users/me`                   | `current_user`   |
//! | POST   | `/messages/`                  | `send_message`   |
//! | GET    | `/chats/{id}/messages`        | `messages`       |
//! | POST   | `/chats/`                     | `create_chat`    |
//! | GET    | `/chats/`                     | `chats`          |
//! | POST   | `/auth/refresh`               | `refresh_token`  |

mod http_client;

pub use http_client::HttpChatApi;

use async_trait::async_trait;

use crate::application::dto::{
    ChatCreate, LoginRequest, MessageCreate, MessageQueryParams, PaginatedMessages,
    RegisterRequest,
};
use crate::domain::{ChannelId, Chat, Message, Token, User};
use crate::shared::error::ClientError;

/// Supplies the bearer token attached to outgoing requests.
pub trait BearerSource: Send + Sync {
    fn bearer(&self) -> Option<String>;
}

/// Chat backend operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Create an account.
    async fn register(&self, request: &RegisterRequest) -> Result<User, ClientError>;

    /// Exchange email and password for a credential.
    async fn login(&self, request: &LoginRequest) -> Result<Token, ClientError>;

    /// Identity belonging to the current credential.
    async fn current_user(&self) -> Result<User, ClientError>;

    /// Persist a message.
    async fn send_message(&self, message: &MessageCreate) -> Result<Message, ClientError>;

    /// One page of a chat's history.
    async fn messages(
        &self,
        chat: ChannelId,
        query: MessageQueryParams,
    ) -> Result<PaginatedMessages, ClientError>;

    async fn create_chat(&self, chat: &ChatCreate) -> Result<Chat, ClientError>;

    /// Chats the current user takes part in.
    async fn chats(&self) -> Result<Vec<Chat>, ClientError>;

    /// Trade a refresh token for a new credential.
    async fn refresh_token(&self, refresh_token: &str) -> Result<Token, ClientError>;
}
