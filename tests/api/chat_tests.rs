//! Chat Tests
//!
//! Chat list and chat view flows against a mocked backend and a local
//! WebSocket server.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chat_client::domain::Token;
use chat_client::presentation::{navbar, ChatListState, ChatListView, ChatView, Mount, Route};
use chat_client::startup::AppContext;

use crate::common::{chat_json, context, eventually, message_json, recv, user_json, WsServer};

fn signed_in(server: &MockServer, ws_url: &str, dir: &TempDir) -> Arc<AppContext> {
    let ctx = context(&server.uri(), ws_url, dir.path());
    ctx.session.set_credential(Some(Token::bearer("a-token")));
    ctx.session
        .set_identity(Some(serde_json::from_value(user_json(4, "testuser")).unwrap()));
    ctx
}

async fn mount_history(server: &MockServer, messages: Vec<Value>) {
    let total = messages.len();
    Mock::given(method("GET"))
        .and(path("/chats/2/messages"))
        .and(query_param("page", "1"))
        .and(query_param("page_size", "20"))
        .and(header("authorization", "Bearer a-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": messages,
            "total": total,
            "page": 1,
            "page_size": 20
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_chat_list_loads_with_bearer() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .and(path("/chats/"))
        .and(header("authorization", "Bearer a-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            chat_json(2, "ann", vec![user_json(4, "testuser"), user_json(7, "ann")])
        ])))
        .expect(1)
        .mount(&server)
        .await;
    let ctx = signed_in(&server, "ws://127.0.0.1:9/ws", &dir);

    let mut view = ChatListView::new();
    assert_eq!(view.load(&ctx).await, None);

    let ChatListState::Loaded(rows) = view.state() else {
        panic!("expected loaded chats, got {:?}", view.state());
    };
    assert_eq!(rows[0].preview, "No messages yet");
    assert_eq!(rows[0].route(), Some(Route::Chat(2_i64.try_into().unwrap())));
    assert_eq!(ctx.chats.get(2).map(|c| c.participants.len()), Some(2));
}

#[tokio::test]
async fn test_open_chat_loads_history_and_connects() {
    let server = MockServer::start().await;
    let ws = WsServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_history(&server, vec![message_json(1, user_json(7, "ann"), "hello")]).await;
    let ctx = signed_in(&server, &ws.url, &dir);

    let view = ChatView::open(ctx.clone(), "2").await.into_view().unwrap();

    assert_eq!(view.messages().len(), 1);
    assert!(eventually(|| ctx.transport.is_connected()).await);
    assert_eq!(
        ws.request_uris.lock().clone(),
        vec!["/websocket/ws?chat_id=2&token=a-token".to_string()]
    );
}

#[tokio::test]
async fn test_submit_persists_then_publishes() {
    let server = MockServer::start().await;
    let mut ws = WsServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_history(&server, vec![]).await;
    Mock::given(method("POST"))
        .and(path("/messages/"))
        .and(header("authorization", "Bearer a-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(message_json(13, user_json(4, "testuser"), "man this not life")),
        )
        .expect(1)
        .mount(&server)
        .await;
    let ctx = signed_in(&server, &ws.url, &dir);
    ctx.chats.set_chats(vec![serde_json::from_value(chat_json(
        2,
        "ann",
        vec![user_json(4, "testuser"), user_json(7, "ann")],
    ))
    .unwrap()]);

    let mut view = ChatView::open(ctx.clone(), "2").await.into_view().unwrap();
    assert!(eventually(|| ctx.transport.is_connected()).await);

    view.set_input("man this not life");
    assert!(view.submit().await);
    assert_eq!(view.input(), "");

    let requests = server.received_requests().await.unwrap();
    let sent: Value = requests
        .iter()
        .find(|r| r.url.path() == "/messages/")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .unwrap();
    assert_eq!(sent["chat_id"], json!(2));
    assert_eq!(sent["sender_id"], json!(4));
    assert_eq!(sent["receiver_id"], json!(7));
    assert_eq!(sent["content"], json!("man this not life"));
    assert_eq!(sent["message_type"], json!("text"));

    let published: Value = serde_json::from_str(&recv(&mut ws.received).await).unwrap();
    assert_eq!(published["content"], json!("man this not life"));
}

#[tokio::test]
async fn test_inbound_event_triggers_refresh() {
    let server = MockServer::start().await;
    let ws = WsServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_history(&server, vec![message_json(1, user_json(7, "ann"), "hello")]).await;
    let ctx = signed_in(&server, &ws.url, &dir);

    let mut view = ChatView::open(ctx.clone(), "2").await.into_view().unwrap();
    assert!(eventually(|| ctx.transport.is_connected()).await);

    ws.push_json(&json!({"type": "message", "chat_id": 2}));
    let event = tokio::time::timeout(crate::common::WAIT, view.next_event())
        .await
        .unwrap();
    assert_eq!(event.map(|e| e["chat_id"].clone()), Some(json!(2)));

    view.refresh().await;
    assert_eq!(view.messages().len(), 1);
}

#[tokio::test]
async fn test_unmount_closes_connection() {
    let server = MockServer::start().await;
    let ws = WsServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_history(&server, vec![]).await;
    let ctx = signed_in(&server, &ws.url, &dir);

    let mut view = ChatView::open(ctx.clone(), "2").await.into_view().unwrap();
    assert!(eventually(|| ws.accepted() == 1).await);

    assert!(view.unmount());
    assert!(!view.unmount());
    assert!(!ctx.transport.is_connected());
    assert!(eventually(|| ws.closed() == 1).await);
}

#[tokio::test]
async fn test_invalid_chat_id_never_connects() {
    let server = MockServer::start().await;
    let ws = WsServer::start().await;
    let dir = TempDir::new().unwrap();
    let ctx = signed_in(&server, &ws.url, &dir);

    let mount = ChatView::mount(ctx, "abc");
    assert!(matches!(mount, Mount::Redirect(Route::Chats)));

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert_eq!(ws.accepted(), 0);
}

#[tokio::test]
async fn test_logout_clears_everything() {
    let server = MockServer::start().await;
    let ws = WsServer::start().await;
    let dir = TempDir::new().unwrap();
    mount_history(&server, vec![]).await;
    let ctx = signed_in(&server, &ws.url, &dir);

    let _view = ChatView::open(ctx.clone(), "2").await.into_view().unwrap();
    assert!(eventually(|| ctx.transport.is_connected()).await);

    assert_eq!(navbar::logout(&ctx), Route::Home);
    assert!(!ctx.transport.is_connected());
    assert!(!ctx.session.is_authenticated());
    assert!(navbar::render(&ctx).is_none());
}

#[tokio::test]
async fn test_closing_older_view_keeps_newer_connection() {
    let server = MockServer::start().await;
    let ws = WsServer::start().await;
    let dir = TempDir::new().unwrap();
    let ctx = signed_in(&server, &ws.url, &dir);

    let older = ChatView::mount(ctx.clone(), "2").into_view().unwrap();
    let newer = ChatView::mount(ctx.clone(), "3").into_view().unwrap();
    assert!(eventually(|| ctx.transport.is_connected()).await);

    drop(older);
    assert_eq!(
        ctx.transport.current().map(|c| c.id()),
        newer.connection().map(|c| c.id())
    );
    assert!(ctx.transport.is_connected());

    drop(newer);
    assert!(ctx.transport.current().is_none());
}

#[tokio::test]
async fn test_chat_list_without_credential_redirects() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .and(path("/chats/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    let ctx = context(&server.uri(), "ws://127.0.0.1:9/ws", dir.path());
    ctx.session
        .set_identity(Some(serde_json::from_value(user_json(4, "testuser")).unwrap()));

    let mut view = ChatListView::new();
    assert_eq!(view.load(&ctx).await, Some(Route::Login));
}
