//! Application Startup
//!
//! Builds the [`AppContext`] that every view receives explicitly.

use std::sync::Arc;

use crate::application::services::{AuthService, ChatService, MessageService};
use crate::application::{ChatStore, SessionState};
use crate::config::Settings;
use crate::infrastructure::api::{ChatApi, HttpChatApi};
use crate::infrastructure::realtime::{RealtimeTransport, SocketClient};
use crate::infrastructure::storage::{CredentialStore, FileCredentialStore};
use crate::shared::error::ClientError;

/// Shared state and clients handed to views.
///
/// Views read the session freely; they change it only through
/// [`SessionState`]'s setters or the services built here.
pub struct AppContext {
    pub settings: Arc<Settings>,
    pub session: Arc<SessionState>,
    pub chats: Arc<ChatStore>,
    pub api: Arc<dyn ChatApi>,
    pub transport: Arc<dyn RealtimeTransport>,
}

impl AppContext {
    /// Wire the production clients from settings.
    pub fn build(settings: Settings) -> Result<Self, ClientError> {
        let store: Arc<dyn CredentialStore> =
            Arc::new(FileCredentialStore::new(&settings.storage.credentials_path));
        let session = Arc::new(SessionState::new(store));
        let api: Arc<dyn ChatApi> = Arc::new(HttpChatApi::new(&settings.api, session.clone())?);
        let transport: Arc<dyn RealtimeTransport> =
            Arc::new(SocketClient::new(settings.websocket.url.clone()));

        tracing::info!(
            api = %settings.api.base_url,
            websocket = %settings.websocket.url,
            "Client context built"
        );

        Ok(Self::from_parts(settings, session, api, transport))
    }

    /// Assemble a context from existing parts.
    pub fn from_parts(
        settings: Settings,
        session: Arc<SessionState>,
        api: Arc<dyn ChatApi>,
        transport: Arc<dyn RealtimeTransport>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            session,
            chats: Arc::new(ChatStore::new()),
            api,
            transport,
        }
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.api.clone(), self.session.clone())
    }

    pub fn chat_service(&self) -> ChatService {
        ChatService::new(self.api.clone(), self.chats.clone())
    }

    pub fn message_service(&self) -> MessageService {
        MessageService::new(
            self.api.clone(),
            self.transport.clone(),
            self.settings.messages.page_size,
        )
    }
}
