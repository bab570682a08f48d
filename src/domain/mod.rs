//! # Domain Layer
//!
//! Records and value types shared by every other layer of the client.
//! It is independent of transport, storage, and presentation concerns.
//!
//! ## Structure
//!
//! - **entities**: Backend records (User, Token, Chat, Message)
//! - **value_objects**: Validated value types (ChannelId)

pub mod entities;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use value_objects::*;
