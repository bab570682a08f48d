//! In-memory collection of the user's chats.

use parking_lot::RwLock;

use crate::domain::Chat;

/// Chats known to the client, in server order.
#[derive(Debug, Default)]
pub struct ChatStore {
    chats: RwLock<Vec<Chat>>,
}

impl ChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chats(&self) -> Vec<Chat> {
        self.chats.read().clone()
    }

    pub fn get(&self, id: i64) -> Option<Chat> {
        self.chats.read().iter().find(|c| c.id == id).cloned()
    }

    pub fn set_chats(&self, chats: Vec<Chat>) {
        *self.chats.write() = chats;
    }

    pub fn add_chat(&self, chat: Chat) {
        self.chats.write().push(chat);
    }

    /// Replace the chat with the same id; unknown ids are ignored.
    pub fn update_chat(&self, chat: Chat) {
        if let Some(slot) = self.chats.write().iter_mut().find(|c| c.id == chat.id) {
            *slot = chat;
        }
    }

    pub fn clear(&self) {
        self.chats.write().clear();
    }
}
