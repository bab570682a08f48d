//! Chat Service
//!
//! Loads and creates chats, keeping the [`ChatStore`] current.

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::application::chat_store::ChatStore;
use crate::application::dto::ChatCreate;
use crate::domain::Chat;
use crate::infrastructure::api::ChatApi;
use crate::shared::error::ClientError;
use crate::shared::validation::validation_error;

pub struct ChatService {
    api: Arc<dyn ChatApi>,
    store: Arc<ChatStore>,
}

impl ChatService {
    pub fn new(api: Arc<dyn ChatApi>, store: Arc<ChatStore>) -> Self {
        Self { api, store }
    }

    /// Fetch the user's chats and replace the store contents.
    pub async fn load(&self) -> Result<Vec<Chat>, ClientError> {
        let chats = self.api.chats().await?;
        info!(count = chats.len(), "Chats loaded");
        self.store.set_chats(chats.clone());
        Ok(chats)
    }

    /// Create a chat and append it to the store.
    pub async fn create(&self, request: &ChatCreate) -> Result<Chat, ClientError> {
        request.validate().map_err(validation_error)?;
        let chat = self.api.create_chat(request).await?;
        info!(chat_id = chat.id, name = %chat.name, "Chat created");
        self.store.add_chat(chat.clone());
        Ok(chat)
    }

    pub fn store(&self) -> &ChatStore {
        &self.store
    }
}
