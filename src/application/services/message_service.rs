//! Message Service
//!
//! Persists outgoing messages over REST, then fans them out over the
//! realtime transport on a best-effort basis.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::dto::{MessageCreate, MessageQueryParams, PaginatedMessages};
use crate::domain::{ChannelId, Message};
use crate::infrastructure::api::ChatApi;
use crate::infrastructure::realtime::RealtimeTransport;
use crate::shared::error::ClientError;

/// Message persistence and fan-out.
pub struct MessageService {
    api: Arc<dyn ChatApi>,
    transport: Arc<dyn RealtimeTransport>,
    page_size: u32,
}

impl MessageService {
    pub fn new(api: Arc<dyn ChatApi>, transport: Arc<dyn RealtimeTransport>, page_size: u32) -> Self {
        Self {
            api,
            transport,
            page_size,
        }
    }

    /// Persist `message`, then publish it to the open connection.
    ///
    /// Only the REST call can fail; a skipped publish is logged.
    pub async fn send(&self, message: &MessageCreate) -> Result<Message, ClientError> {
        let saved = self.api.send_message(message).await?;
        debug!(message_id = saved.id, chat_id = message.chat_id, "Message persisted");

        match serde_json::to_value(message) {
            Ok(event) => {
                if !self.transport.publish(&event) {
                    debug!(chat_id = message.chat_id, "Realtime fan-out skipped");
                }
            }
            Err(e) => warn!(error = %e, "Failed to encode realtime event"),
        }

        Ok(saved)
    }

    /// Fetch one page of history for `chat`, 1-based.
    pub async fn history(&self, chat: ChannelId, page: u32) -> Result<PaginatedMessages, ClientError> {
        self.api
            .messages(
                chat,
                MessageQueryParams {
                    page: page.max(1),
                    page_size: self.page_size,
                },
            )
            .await
    }
}
