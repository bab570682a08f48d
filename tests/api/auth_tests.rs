//! Authentication Tests
//!
//! Auth form and session flows against a mocked backend.

use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chat_client::infrastructure::storage::{
    CredentialStore, FileCredentialStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY,
};
use chat_client::presentation::{AuthForm, AuthMode, Route};

use crate::common::{context, token_json, user_json};

const WS_URL: &str = "ws://127.0.0.1:9/websocket/ws";

/// Login posts a form, stores the credential, then loads the identity
#[tokio::test]
async fn test_login_with_valid_credentials() {
    // Arrange
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .and(body_string_contains("username=test%40example.com"))
        .and(body_string_contains("password=secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json("a-token", Some("r-token"))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("authorization", "Bearer a-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(4, "testuser")))
        .expect(1)
        .mount(&server)
        .await;
    let ctx = context(&server.uri(), WS_URL, dir.path());

    // Act
    let mut form = AuthForm::new(AuthMode::Login);
    form.fields_mut().email = "test@example.com".into();
    form.fields_mut().password = "secret".into();
    let route = form.submit(&ctx).await;

    // Assert
    assert_eq!(route, Some(Route::Chats));
    assert_eq!(ctx.session.user_id(), Some(4));
    let store = FileCredentialStore::new(dir.path().join("credentials.json"));
    assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("a-token"));
    assert_eq!(store.get(REFRESH_TOKEN_KEY).unwrap().as_deref(), Some("r-token"));
}

/// Backend detail strings reach the form's error slot
#[tokio::test]
async fn test_login_with_wrong_password_shows_detail() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Incorrect email or password"})),
        )
        .mount(&server)
        .await;
    let ctx = context(&server.uri(), WS_URL, dir.path());

    let mut form = AuthForm::new(AuthMode::Login);
    form.fields_mut().email = "test@example.com".into();
    form.fields_mut().password = "wrong".into();

    assert_eq!(form.submit(&ctx).await, None);
    assert_eq!(form.error(), Some("Incorrect email or password"));
    assert!(!ctx.session.is_authenticated());
}

/// Validation error lists are joined into one line
#[tokio::test]
async fn test_register_validation_errors_are_joined() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("POST"))
        .and(path("/users/register"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [
                {"loc": ["body", "email"], "msg": "value is not a valid email address"},
                {"loc": ["body", "password"], "msg": "ensure this value has at least 8 characters"}
            ]
        })))
        .mount(&server)
        .await;
    let ctx = context(&server.uri(), WS_URL, dir.path());

    let mut form = AuthForm::new(AuthMode::Register);
    let fields = form.fields_mut();
    fields.username = "testuser".into();
    fields.email = "bad".into();
    fields.password = "x".into();

    assert_eq!(form.submit(&ctx).await, None);
    assert_eq!(
        form.error(),
        Some("value is not a valid email address, ensure this value has at least 8 characters")
    );
}

/// Unparseable error bodies fall back to the generic message
#[tokio::test]
async fn test_unexpected_error_body_uses_generic_message() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;
    let ctx = context(&server.uri(), WS_URL, dir.path());

    let mut form = AuthForm::new(AuthMode::Login);
    form.fields_mut().email = "test@example.com".into();
    form.fields_mut().password = "secret".into();

    assert_eq!(form.submit(&ctx).await, None);
    assert_eq!(form.error(), Some("An error occurred"));
}

/// Registration sends the JSON body, then signs in
#[tokio::test]
async fn test_register_then_login() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("POST"))
        .and(path("/users/register"))
        .and(body_json(json!({
            "username": "testuser",
            "email": "test@example.com",
            "password": "secret",
            "first_name": "Ada"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(4, "testuser")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json("a-token", None)))
        .expect(1)
        .mount(&server)
        .await;
    let ctx = context(&server.uri(), WS_URL, dir.path());

    let mut form = AuthForm::new(AuthMode::Register);
    let fields = form.fields_mut();
    fields.username = "testuser".into();
    fields.email = "test@example.com".into();
    fields.password = "secret".into();
    fields.first_name = "Ada".into();

    assert_eq!(form.submit(&ctx).await, Some(Route::Chats));
    assert_eq!(ctx.session.access_token().as_deref(), Some("a-token"));
    assert_eq!(ctx.session.user().map(|u| u.username), Some("testuser".into()));
}

/// A stale stored credential is refreshed once on resume
#[tokio::test]
async fn test_resume_refreshes_rejected_credential() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let store = FileCredentialStore::new(dir.path().join("credentials.json"));
    store.set(ACCESS_TOKEN_KEY, "stale").unwrap();
    store.set(REFRESH_TOKEN_KEY, "r-old").unwrap();

    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Could not validate credentials"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({"refresh_token": "r-old"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json("fresh", None)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(4, "testuser")))
        .expect(1)
        .mount(&server)
        .await;
    let ctx = context(&server.uri(), WS_URL, dir.path());

    let user = ctx.auth().resume().await.unwrap();

    assert_eq!(user.map(|u| u.id), Some(4));
    assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("fresh"));
    assert_eq!(store.get(REFRESH_TOKEN_KEY).unwrap().as_deref(), Some("r-old"));
}

/// Resume without anything stored does not touch the network
#[tokio::test]
async fn test_resume_without_stored_credential() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(4, "testuser")))
        .expect(0)
        .mount(&server)
        .await;
    let ctx = context(&server.uri(), WS_URL, dir.path());

    assert!(ctx.auth().resume().await.unwrap().is_none());
    assert!(!ctx.session.is_authenticated());
}
