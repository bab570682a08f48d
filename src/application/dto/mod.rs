//! Data Transfer Objects
//!
//! DTOs for API request/response serialization.

pub mod request;
pub mod response;

pub use request::{
    ChatCreate, LoginRequest, MessageCreate, MessageQueryParams, RefreshTokenRequest,
    RegisterRequest, REQUIRED_FIELDS_MESSAGE,
};
pub use response::PaginatedMessages;
