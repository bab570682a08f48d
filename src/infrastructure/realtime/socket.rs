//! WebSocket client holding at most one live connection.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};
use tracing::{debug, error, info, warn};
use url::Url;

use super::{RealtimeTransport, SocketHandlers, TransportError};
use crate::domain::ChannelId;

/// Lifecycle of a single connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    Connecting = 0,
    Open = 1,
    Closing = 2,
    Closed = 3,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Connecting,
            1 => Self::Open,
            2 => Self::Closing,
            _ => Self::Closed,
        }
    }
}

/// Observable handle to a connection returned by `connect`.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: u64,
    channel: ChannelId,
    state: Arc<AtomicU8>,
}

impl ConnectionHandle {
    /// Detached handle in the given state, for callers that stand in for a
    /// real transport.
    pub fn detached(id: u64, channel: ChannelId, state: ConnectionState) -> Self {
        Self {
            id,
            channel,
            state: Arc::new(AtomicU8::new(state as u8)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }
}

enum Command {
    Send(String),
    Close,
}

struct ActiveConnection {
    handle: ConnectionHandle,
    commands: mpsc::UnboundedSender<Command>,
}

/// WebSocket client for the chat backend's realtime endpoint.
pub struct SocketClient {
    endpoint: String,
    current: Mutex<Option<ActiveConnection>>,
    next_id: AtomicU64,
}

impl SocketClient {
    /// Create a client for `endpoint` (e.g. `ws://localhost:8000/websocket/ws`).
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            current: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the connection URL carrying the channel id and credential.
    pub fn connection_url(&self, credential: &str, channel: ChannelId) -> Result<Url, TransportError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", self.endpoint, e)))?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(TransportError::InvalidUrl(format!(
                "{}: scheme must be ws or wss",
                self.endpoint
            )));
        }
        url.query_pairs_mut()
            .append_pair("chat_id", &channel.to_string())
            .append_pair("token", credential);
        Ok(url)
    }

    /// Open a connection to `channel`.
    ///
    /// The channel id is validated before anything else happens; an invalid
    /// id leaves any existing connection untouched. A valid call closes the
    /// previous connection, then spawns the new one on the current tokio
    /// runtime and returns immediately. `on_open` fires once the handshake
    /// completes.
    pub fn connect<C>(
        &self,
        credential: &str,
        channel: C,
        handlers: SocketHandlers,
    ) -> Result<ConnectionHandle, TransportError>
    where
        C: TryInto<ChannelId>,
        C::Error: Into<TransportError>,
    {
        let channel = channel.try_into().map_err(Into::into)?;
        let runtime = Handle::try_current().map_err(|_| TransportError::NoRuntime)?;
        let url = self.connection_url(credential, channel)?;

        self.disconnect();

        let handle = ConnectionHandle::detached(
            self.next_id.fetch_add(1, Ordering::SeqCst),
            channel,
            ConnectionState::Connecting,
        );
        let (tx, rx) = mpsc::unbounded_channel();

        // The URL carries the credential, so only the endpoint is logged.
        info!(
            connection_id = handle.id,
            chat_id = %channel,
            endpoint = %self.endpoint,
            "Connecting WebSocket"
        );

        runtime.spawn(run_connection(url, handlers, handle.clone(), rx));

        *self.current.lock() = Some(ActiveConnection {
            handle: handle.clone(),
            commands: tx,
        });

        Ok(handle)
    }

    /// Serialize and send `event` if the connection is open.
    ///
    /// While disconnected this logs a warning and returns `false`.
    pub fn publish<T: Serialize + ?Sized>(&self, event: &T) -> bool {
        let current = self.current.lock();
        let Some(conn) = current.as_ref().filter(|c| c.handle.is_open()) else {
            warn!("WebSocket not connected. Cannot send event");
            return false;
        };

        let text = match serde_json::to_string(event) {
            Ok(text) => text,
            Err(e) => {
                error!(error = %e, "Failed to serialize outbound event");
                return false;
            }
        };

        if conn.commands.send(Command::Send(text)).is_err() {
            warn!(connection_id = conn.handle.id, "WebSocket task has exited. Event dropped");
            return false;
        }
        true
    }

    /// Close the current connection and clear it. Safe to call repeatedly.
    pub fn disconnect(&self) -> bool {
        let Some(conn) = self.current.lock().take() else {
            return false;
        };
        info!(connection_id = conn.handle.id, chat_id = %conn.handle.channel, "Disconnecting WebSocket");
        if conn.handle.state() != ConnectionState::Closed {
            conn.handle.set_state(ConnectionState::Closing);
        }
        // The task may already be gone after a remote close.
        let _ = conn.commands.send(Command::Close);
        true
    }

    /// True while the current connection is open.
    pub fn is_connected(&self) -> bool {
        self.current
            .lock()
            .as_ref()
            .is_some_and(|c| c.handle.is_open())
    }

    /// Handle of the current connection, if any.
    pub fn current(&self) -> Option<ConnectionHandle> {
        self.current.lock().as_ref().map(|c| c.handle.clone())
    }
}

impl RealtimeTransport for SocketClient {
    fn connect(
        &self,
        credential: &str,
        channel: ChannelId,
        handlers: SocketHandlers,
    ) -> Result<ConnectionHandle, TransportError> {
        SocketClient::connect(self, credential, channel, handlers)
    }

    fn publish(&self, event: &Value) -> bool {
        SocketClient::publish(self, event)
    }

    fn disconnect(&self) -> bool {
        SocketClient::disconnect(self)
    }

    fn is_connected(&self) -> bool {
        SocketClient::is_connected(self)
    }

    fn current(&self) -> Option<ConnectionHandle> {
        SocketClient::current(self)
    }
}

impl Drop for SocketClient {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Drive one connection from handshake to close.
async fn run_connection(
    url: Url,
    handlers: SocketHandlers,
    handle: ConnectionHandle,
    mut commands: mpsc::UnboundedReceiver<Command>,
) {
    let id = handle.id;

    let stream = tokio::select! {
        result = connect_async(url.as_str()) => match result {
            Ok((stream, _response)) => stream,
            Err(e) => {
                handle.set_state(ConnectionState::Closed);
                let err = TransportError::from(e);
                error!(connection_id = id, error = %err, "WebSocket error");
                handlers.error(&err);
                handlers.close();
                return;
            }
        },
        _ = closed_while_connecting(&mut commands) => {
            handle.set_state(ConnectionState::Closed);
            info!(connection_id = id, "WebSocket closed before opening");
            handlers.close();
            return;
        }
    };

    // A disconnect may have raced the handshake.
    if handle.state() == ConnectionState::Closing {
        let (mut write, _read) = stream.split();
        let _ = write.close().await;
        handle.set_state(ConnectionState::Closed);
        info!(connection_id = id, "WebSocket closed before opening");
        handlers.close();
        return;
    }

    handle.set_state(ConnectionState::Open);
    info!(connection_id = id, chat_id = %handle.channel, "WebSocket connected");
    handlers.open();

    let (mut write, mut read) = stream.split();

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => dispatch(&handlers, id, &text),
                Some(Ok(WsMessage::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                    Ok(text) => dispatch(&handlers, id, text),
                    Err(_) => warn!(connection_id = id, len = bytes.len(), "Dropping non-UTF-8 binary frame"),
                },
                Some(Ok(WsMessage::Close(frame))) => {
                    debug!(connection_id = id, ?frame, "Close frame received");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    let err = TransportError::from(e);
                    error!(connection_id = id, error = %err, "WebSocket error");
                    handlers.error(&err);
                    break;
                }
                None => break,
            },
            command = commands.recv() => match command {
                Some(Command::Send(text)) => {
                    if let Err(e) = write.send(WsMessage::Text(text)).await {
                        let err = TransportError::from(e);
                        error!(connection_id = id, error = %err, "WebSocket send failed");
                        handlers.error(&err);
                        break;
                    }
                }
                Some(Command::Close) | None => {
                    handle.set_state(ConnectionState::Closing);
                    if let Err(e) = write.close().await {
                        debug!(connection_id = id, error = %e, "Close handshake failed");
                    }
                    break;
                }
            }
        }
    }

    handle.set_state(ConnectionState::Closed);
    info!(connection_id = id, "WebSocket closed");
    handlers.close();
}

/// Resolve once a close is requested or the client side is dropped.
async fn closed_while_connecting(commands: &mut mpsc::UnboundedReceiver<Command>) {
    loop {
        match commands.recv().await {
            Some(Command::Send(_)) => warn!("Dropping event sent before the connection opened"),
            Some(Command::Close) | None => return,
        }
    }
}

fn dispatch(handlers: &SocketHandlers, id: u64, text: &str) {
    match serde_json::from_str::<Value>(text) {
        Ok(payload) => {
            debug!(connection_id = id, %payload, "WebSocket message");
            handlers.message(payload);
        }
        Err(e) => error!(connection_id = id, error = %e, raw = %text, "Failed to parse WebSocket message"),
    }
}
