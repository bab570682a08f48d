//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! - **ChannelId**: validated non-negative conversation id

mod channel_id;

pub use channel_id::*;
