//! Response DTOs
//!
//! Data structures for API response bodies.

use serde::{Deserialize, Serialize};

use crate::domain::Message;

/// One page of a chat's message history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedMessages {
    pub messages: Vec<Message>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl PaginatedMessages {
    /// Check whether a later page exists.
    pub fn has_more(&self) -> bool {
        (self.page as u64) * (self.page_size as u64) < self.total
    }
}
