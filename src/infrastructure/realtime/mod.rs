//! Realtime transport
//!
//! Thin wrapper around a single WebSocket connection to the chat backend.
//!
//! ## Behavior
//!
//! - At most one connection is held at a time; `connect` tears down the
//!   previous one before opening the next.
//! - Inbound text frames are parsed as JSON and handed to `on_message`;
//!   unparseable frames are logged and dropped.
//! - `publish` only sends while the connection is open. Nothing is queued,
//!   retried, or acknowledged.
//! - There is no reconnection and no heartbeat beyond the protocol's own
//!   ping/pong.

mod handlers;
mod socket;

pub use handlers::SocketHandlers;
pub use socket::{ConnectionHandle, ConnectionState, SocketClient};

use std::convert::Infallible;

use serde_json::Value;

use crate::domain::{ChannelId, InvalidChannelId};

/// Realtime transport errors
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    InvalidChannel(#[from] InvalidChannelId),

    #[error("Invalid WebSocket URL: {0}")]
    InvalidUrl(String),

    #[error("No async runtime available to drive the connection")]
    NoRuntime,

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

impl From<Infallible> for TransportError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Connection lifecycle operations used by views.
#[cfg_attr(test, mockall::automock)]
pub trait RealtimeTransport: Send + Sync {
    /// Open a connection for `channel`, replacing any current one.
    fn connect(
        &self,
        credential: &str,
        channel: ChannelId,
        handlers: SocketHandlers,
    ) -> Result<ConnectionHandle, TransportError>;

    /// Send an event if connected. Returns whether it was handed off.
    fn publish(&self, event: &Value) -> bool;

    /// Close the current connection, if any. Returns whether one was closed.
    fn disconnect(&self) -> bool;

    fn is_connected(&self) -> bool;

    /// Handle of the current connection, if any.
    fn current(&self) -> Option<ConnectionHandle>;
}
