//! Chat view: message list plus message input for one conversation.
//!
//! Mounting connects the realtime transport; inbound events are queued for
//! the owner, which answers them with [`ChatView::refresh`]. Unmounting (or
//! dropping the view) tears down the view's own connection exactly once and
//! cancels any fetch still in flight, so late results never land in a dead
//! view. A connection opened later by another view is left alone.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::message_list::{group_by_date, render_lines, MessageGroup};
use super::routes::{guard, Route};
use crate::application::dto::MessageCreate;
use crate::domain::{ChannelId, Message};
use crate::infrastructure::realtime::{ConnectionHandle, SocketHandlers};
use crate::startup::AppContext;

/// Result of trying to mount a chat view.
pub enum Mount {
    Mounted(ChatView),
    Redirect(Route),
}

impl Mount {
    pub fn into_view(self) -> Option<ChatView> {
        match self {
            Mount::Mounted(view) => Some(view),
            Mount::Redirect(_) => None,
        }
    }

    pub fn redirect(&self) -> Option<Route> {
        match self {
            Mount::Mounted(_) => None,
            Mount::Redirect(route) => Some(*route),
        }
    }
}

pub struct ChatView {
    ctx: Arc<AppContext>,
    chat: ChannelId,
    receiver_id: Option<i64>,
    input: String,
    error: Arc<RwLock<Option<String>>>,
    messages: Arc<RwLock<Vec<Message>>>,
    events: mpsc::UnboundedReceiver<Value>,
    connection: Option<ConnectionHandle>,
    cancel: CancellationToken,
    mounted: bool,
}

impl ChatView {
    /// Mount the view for the route parameter `raw_id`.
    ///
    /// Redirects to the login route without a session and to the chat list
    /// for an invalid id. Otherwise connects the transport; a failed connect
    /// is logged and the view still mounts.
    pub fn mount(ctx: Arc<AppContext>, raw_id: &str) -> Mount {
        if let Some(redirect) = guard(&ctx, Route::Chats) {
            debug!("No session, redirecting to login");
            return Mount::Redirect(redirect);
        }
        let (Some(user), Some(token)) = (ctx.session.user(), ctx.session.token()) else {
            return Mount::Redirect(Route::Login);
        };

        let chat = match ChannelId::try_from(raw_id) {
            Ok(chat) => chat,
            Err(e) => {
                error!(raw_id, error = %e, "Invalid chatId");
                return Mount::Redirect(Route::Chats);
            }
        };

        let receiver_id = ctx
            .chats
            .get(chat.as_i64())
            .and_then(|c| c.counterpart_of(user.id).map(|u| u.id));

        let (tx, events) = mpsc::unbounded_channel();
        let handlers = SocketHandlers::new()
            .on_open(move || info!(chat_id = %chat, "Connected to chat"))
            .on_message(move |event| {
                debug!(chat_id = %chat, %event, "Received realtime event");
                // The view may already be gone.
                let _ = tx.send(event);
            })
            .on_close(move || info!(chat_id = %chat, "Disconnected from chat"))
            .on_error(move |e| warn!(chat_id = %chat, error = %e, "Realtime error"));

        let connection = match ctx.transport.connect(&token.access_token, chat, handlers) {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!(chat_id = %chat, error = %e, "WebSocket connection failed");
                None
            }
        };

        Mount::Mounted(ChatView {
            ctx,
            chat,
            receiver_id,
            input: String::new(),
            error: Arc::new(RwLock::new(None)),
            messages: Arc::new(RwLock::new(Vec::new())),
            events,
            connection,
            cancel: CancellationToken::new(),
            mounted: true,
        })
    }

    /// Mount and load the first page of history.
    pub async fn open(ctx: Arc<AppContext>, raw_id: &str) -> Mount {
        let mount = Self::mount(ctx, raw_id);
        if let Mount::Mounted(view) = &mount {
            view.refresh().await;
        }
        mount
    }

    pub fn chat(&self) -> ChannelId {
        self.chat
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn connection(&self) -> Option<&ConnectionHandle> {
        self.connection.as_ref()
    }

    pub fn receiver_id(&self) -> Option<i64> {
        self.receiver_id
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    pub fn error(&self) -> Option<String> {
        self.error.read().clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.read().clone()
    }

    /// Wait for the next inbound realtime event.
    ///
    /// Returns `None` once the connection is gone and the queue is drained.
    pub async fn next_event(&mut self) -> Option<Value> {
        if !self.mounted {
            return None;
        }
        tokio::select! {
            event = self.events.recv() => event,
            _ = self.cancel.cancelled() => None,
        }
    }

    /// Fetch page 1 of history and replace the list.
    ///
    /// The returned future owns what it needs, so it can be spawned. Its
    /// result is dropped if the view unmounts first.
    pub fn refresh_task(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let service = self.ctx.message_service();
        let chat = self.chat;
        let cancel = self.cancel.clone();
        let messages = self.messages.clone();
        let error = self.error.clone();

        async move {
            let result = tokio::select! {
                result = service.history(chat, 1) => result,
                _ = cancel.cancelled() => {
                    debug!(chat_id = %chat, "Refresh cancelled");
                    return;
                }
            };
            if cancel.is_cancelled() {
                return;
            }
            match result {
                Ok(page) => {
                    debug!(chat_id = %chat, count = page.messages.len(), total = page.total, "Messages refreshed");
                    *messages.write() = page.messages;
                }
                Err(e) => {
                    warn!(chat_id = %chat, error = %e, "Failed to load messages");
                    *error.write() = Some(format!("Failed to load messages: {}", e.user_message()));
                }
            }
        }
    }

    pub async fn refresh(&self) {
        if self.mounted {
            self.refresh_task().await;
        }
    }

    /// Send the current input.
    ///
    /// Blank input, a missing identity, or an unmounted view make no call.
    /// On success the input is cleared; on failure it is kept and the error
    /// slot is filled.
    pub async fn submit(&mut self) -> bool {
        if !self.mounted || self.input.trim().is_empty() {
            return false;
        }
        let Some(sender_id) = self.ctx.session.user_id() else {
            warn!(chat_id = %self.chat, "Cannot send message without a signed-in user");
            return false;
        };

        let message = MessageCreate::text(self.chat, sender_id, self.input.clone()).to(self.receiver_id);

        match self.ctx.message_service().send(&message).await {
            Ok(saved) => {
                info!(chat_id = %self.chat, message_id = saved.id, "Message sent");
                self.input.clear();
                *self.error.write() = None;
                if !self.cancel.is_cancelled() {
                    let mut messages = self.messages.write();
                    if !messages.iter().any(|m| m.id == saved.id) {
                        messages.push(saved);
                    }
                }
                true
            }
            Err(e) => {
                error!(chat_id = %self.chat, error = %e, "Failed to send message");
                *self.error.write() = Some(format!("Failed to send message: {}", e.user_message()));
                false
            }
        }
    }

    pub fn groups(&self, today: NaiveDate) -> Vec<MessageGroup> {
        group_by_date(&self.messages.read(), self.ctx.session.user_id(), today, &Local)
    }

    /// Terminal rendering in local time.
    pub fn render(&self) -> Vec<String> {
        let today = Local::now().date_naive();
        let mut lines = render_lines(&self.groups(today), &Local);
        if let Some(err) = self.error() {
            lines.push(format!("! {}", err));
        }
        lines
    }

    /// Tear down the view. The first call cancels pending work and
    /// disconnects the transport if it still holds this view's connection;
    /// later calls do nothing.
    pub fn unmount(&mut self) -> bool {
        if !self.mounted {
            return false;
        }
        self.mounted = false;
        self.cancel.cancel();

        let own_id = self.connection.as_ref().map(ConnectionHandle::id);
        let current_id = self.ctx.transport.current().map(|c| c.id());
        if own_id.is_some() && own_id == current_id {
            self.ctx.transport.disconnect();
        } else {
            debug!(chat_id = %self.chat, "Connection already replaced or never opened");
        }
        info!(chat_id = %self.chat, "Chat view unmounted");
        true
    }
}

impl Drop for ChatView {
    fn drop(&mut self) {
        self.unmount();
    }
}
