//! Chat list view.

use tracing::{debug, warn};

use super::routes::{guard, Route};
use crate::domain::{ChannelId, Chat};
use crate::startup::AppContext;

/// One row of the chat list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSummary {
    pub id: i64,
    pub name: String,
    pub preview: String,
}

impl From<&Chat> for ChatSummary {
    fn from(chat: &Chat) -> Self {
        Self {
            id: chat.id,
            name: chat.name.clone(),
            preview: chat.preview().to_string(),
        }
    }
}

impl ChatSummary {
    /// Route that opens this chat, if the id is usable.
    pub fn route(&self) -> Option<Route> {
        ChannelId::try_from(self.id).ok().map(Route::Chat)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChatListState {
    #[default]
    Idle,
    Loading,
    Failed(String),
    Empty,
    Loaded(Vec<ChatSummary>),
}

#[derive(Debug, Default)]
pub struct ChatListView {
    state: ChatListState,
}

impl ChatListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ChatListState {
        &self.state
    }

    /// Load the user's chats into the store and this view.
    ///
    /// Returns a redirect when there is no signed-in user with a credential.
    pub async fn load(&mut self, ctx: &AppContext) -> Option<Route> {
        if let Some(redirect) = guard(ctx, Route::Chats) {
            debug!("No credential, redirecting to login");
            return Some(redirect);
        }

        self.state = ChatListState::Loading;
        self.state = match ctx.chat_service().load().await {
            Ok(chats) if chats.is_empty() => ChatListState::Empty,
            Ok(chats) => ChatListState::Loaded(chats.iter().map(ChatSummary::from).collect()),
            Err(e) => {
                warn!(error = %e, "Failed to load chats");
                ChatListState::Failed(format!("Error loading chats: {}", e.user_message()))
            }
        };
        None
    }

    pub fn render(&self) -> Vec<String> {
        match &self.state {
            ChatListState::Idle => vec![],
            ChatListState::Loading => vec!["Loading chats...".into()],
            ChatListState::Failed(msg) => vec![msg.clone()],
            ChatListState::Empty => vec!["No chats available. Create a new chat.".into()],
            ChatListState::Loaded(chats) => std::iter::once("Chats".to_string())
                .chain(
                    chats
                        .iter()
                        .map(|c| format!("  [{}] {} - {}", c.id, c.name, c.preview)),
                )
                .collect(),
        }
    }
}
