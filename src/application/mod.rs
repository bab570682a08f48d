//! Application Layer
//!
//! Session state, chat store, services, and data transfer objects (DTOs).
//! This layer sits between the presentation layer's views and the
//! infrastructure clients.

pub mod chat_store;
pub mod dto;
pub mod services;
pub mod session;

pub use chat_store::ChatStore;
pub use session::SessionState;
