//! # Domain Entities
//!
//! Records exchanged with the chat backend.
//!
//! - **User**: account identity and profile
//! - **Token**: bearer credential with optional refresh token
//! - **Chat**: a conversation and its participants
//! - **Message**: a message within a chat

mod chat;
mod message;
pub(crate) mod timestamp;
mod token;
mod user;

pub use chat::{Chat, ChatType, EMPTY_CHAT_PREVIEW};
pub use message::{Message, MessageType};
pub use token::Token;
pub use user::{Gender, Role, User};
