//! Application Services
//!
//! Flows that coordinate the REST API, the realtime transport, and the
//! in-memory state.
//!
//! ## Available Services
//!
//! - **AuthService**: Login, registration, refresh, session resume
//! - **ChatService**: Chat listing and creation
//! - **MessageService**: Message persistence, fan-out, and history

pub mod auth_service;
pub mod chat_service;
pub mod message_service;

pub use auth_service::AuthService;
pub use chat_service::ChatService;
pub use message_service::MessageService;
