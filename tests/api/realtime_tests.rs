//! Realtime Transport Tests
//!
//! `SocketClient` against a local WebSocket server.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use chat_client::domain::ChannelId;
use chat_client::infrastructure::realtime::{
    ConnectionState, SocketClient, SocketHandlers, TransportError,
};

use crate::common::{eventually, recv, WsServer};

#[derive(Debug, PartialEq)]
enum Event {
    Open,
    Message(Value),
    Close,
    Error,
}

fn recording_handlers() -> (SocketHandlers, mpsc::UnboundedReceiver<Event>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let (open, message, close, error) = (tx.clone(), tx.clone(), tx.clone(), tx);
    let handlers = SocketHandlers::new()
        .on_open(move || {
            let _ = open.send(Event::Open);
        })
        .on_message(move |v| {
            let _ = message.send(Event::Message(v));
        })
        .on_close(move || {
            let _ = close.send(Event::Close);
        })
        .on_error(move |_| {
            let _ = error.send(Event::Error);
        });
    (handlers, rx)
}

fn chat(id: i64) -> ChannelId {
    ChannelId::try_from(id).unwrap()
}

#[tokio::test]
async fn test_open_fires_and_url_carries_chat_and_token() {
    let server = WsServer::start().await;
    let client = SocketClient::new(server.url.clone());
    let (handlers, mut events) = recording_handlers();

    let handle = client.connect("a-token", chat(2), handlers).unwrap();
    assert_eq!(recv(&mut events).await, Event::Open);
    assert!(handle.is_open());
    assert!(client.is_connected());

    let uris = server.request_uris.lock().clone();
    assert_eq!(uris, vec!["/websocket/ws?chat_id=2&token=a-token".to_string()]);
}

#[tokio::test]
async fn test_publish_while_open_reaches_server() {
    let mut server = WsServer::start().await;
    let client = SocketClient::new(server.url.clone());
    let (handlers, mut events) = recording_handlers();

    client.connect("t", chat(2), handlers).unwrap();
    assert_eq!(recv(&mut events).await, Event::Open);

    assert!(client.publish(&json!({"chat_id": 2, "content": "hi"})));
    let text = recv(&mut server.received).await;
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value, json!({"chat_id": 2, "content": "hi"}));
}

#[tokio::test]
async fn test_inbound_json_reaches_on_message_and_junk_is_dropped() {
    let server = WsServer::start().await;
    let client = SocketClient::new(server.url.clone());
    let (handlers, mut events) = recording_handlers();

    client.connect("t", chat(2), handlers).unwrap();
    assert_eq!(recv(&mut events).await, Event::Open);

    server.push(Message::Text("not json".into()));
    server.push_json(&json!({"type": "message", "id": 1}));

    assert_eq!(
        recv(&mut events).await,
        Event::Message(json!({"type": "message", "id": 1}))
    );
}

#[tokio::test]
async fn test_invalid_channel_allocates_no_connection() {
    let server = WsServer::start().await;
    let client = SocketClient::new(server.url.clone());

    let err = client
        .connect("t", "abc", SocketHandlers::new())
        .unwrap_err();
    assert!(matches!(err, TransportError::InvalidChannel(_)));
    assert_eq!(err.to_string(), "Invalid chatId: abc");

    let err = client.connect("t", 1.5_f64, SocketHandlers::new()).unwrap_err();
    assert!(matches!(err, TransportError::InvalidChannel(_)));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(server.accepted(), 0);
    assert!(client.current().is_none());
}

#[tokio::test]
async fn test_invalid_channel_keeps_existing_connection() {
    let server = WsServer::start().await;
    let client = SocketClient::new(server.url.clone());
    let (handlers, mut events) = recording_handlers();

    client.connect("t", chat(2), handlers).unwrap();
    assert_eq!(recv(&mut events).await, Event::Open);

    assert!(client.connect("t", "-1", SocketHandlers::new()).is_err());
    assert!(client.is_connected());
    assert_eq!(client.current().map(|h| h.channel()), Some(chat(2)));
}

#[tokio::test]
async fn test_connect_replaces_previous_connection() {
    let server = WsServer::start().await;
    let client = SocketClient::new(server.url.clone());

    let (first_handlers, mut first) = recording_handlers();
    let first_handle = client.connect("t", chat(1), first_handlers).unwrap();
    assert_eq!(recv(&mut first).await, Event::Open);

    let (second_handlers, mut second) = recording_handlers();
    let second_handle = client.connect("t", chat(2), second_handlers).unwrap();
    assert_eq!(recv(&mut second).await, Event::Open);
    assert_eq!(recv(&mut first).await, Event::Close);

    assert_ne!(first_handle.id(), second_handle.id());
    assert_eq!(first_handle.state(), ConnectionState::Closed);
    assert_eq!(client.current().map(|h| h.id()), Some(second_handle.id()));
    assert!(eventually(|| server.closed() == 1).await);
    assert_eq!(server.accepted(), 2);
}

#[tokio::test]
async fn test_publish_while_disconnected_is_a_no_op() {
    let mut server = WsServer::start().await;
    let client = SocketClient::new(server.url.clone());

    assert!(!client.publish(&json!({"content": "lost"})));

    let (handlers, mut events) = recording_handlers();
    client.connect("t", chat(2), handlers).unwrap();
    assert_eq!(recv(&mut events).await, Event::Open);
    client.disconnect();
    assert!(!client.publish(&json!({"content": "lost"})));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(server.received.try_recv().is_err());
}

#[tokio::test]
async fn test_double_disconnect_closes_once() {
    let server = WsServer::start().await;
    let client = SocketClient::new(server.url.clone());
    let (handlers, mut events) = recording_handlers();

    let handle = client.connect("t", chat(2), handlers).unwrap();
    assert_eq!(recv(&mut events).await, Event::Open);

    assert!(client.disconnect());
    assert!(!client.disconnect());
    assert_eq!(recv(&mut events).await, Event::Close);
    assert_eq!(handle.state(), ConnectionState::Closed);
    assert!(eventually(|| server.closed() == 1).await);
}

#[tokio::test]
async fn test_disconnect_before_open_never_fires_open() {
    let server = WsServer::start().await;
    let client = SocketClient::new(server.url.clone());
    let (handlers, mut events) = recording_handlers();

    let handle = client.connect("t", chat(2), handlers).unwrap();
    assert!(client.disconnect());

    assert_eq!(recv(&mut events).await, Event::Close);
    assert_eq!(handle.state(), ConnectionState::Closed);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_server_close_fires_on_close() {
    let server = WsServer::start().await;
    let client = SocketClient::new(server.url.clone());
    let (handlers, mut events) = recording_handlers();

    let handle = client.connect("t", chat(2), handlers).unwrap();
    assert_eq!(recv(&mut events).await, Event::Open);

    server.push(Message::Close(None));
    assert_eq!(recv(&mut events).await, Event::Close);
    assert!(eventually(|| handle.state() == ConnectionState::Closed).await);
    assert!(!client.is_connected());
}

#[tokio::test]
async fn test_unreachable_server_reports_error_then_close() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = SocketClient::new(format!("ws://{}/ws", addr));
    let (handlers, mut events) = recording_handlers();
    client.connect("t", chat(2), handlers).unwrap();

    assert_eq!(recv(&mut events).await, Event::Error);
    assert_eq!(recv(&mut events).await, Event::Close);
}
