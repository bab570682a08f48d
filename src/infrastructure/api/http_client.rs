//! reqwest implementation of [`ChatApi`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::{BearerSource, ChatApi};
use crate::application::dto::{
    ChatCreate, LoginRequest, MessageCreate, MessageQueryParams, PaginatedMessages,
    RefreshTokenRequest, RegisterRequest,
};
use crate::config::ApiSettings;
use crate::domain::{ChannelId, Chat, Message, Token, User};
use crate::shared::error::{extract_detail, ClientError, GENERIC_ERROR_MESSAGE};

/// HTTP client for the chat backend.
pub struct HttpChatApi {
    client: Client,
    base_url: String,
    bearer: Arc<dyn BearerSource>,
}

impl HttpChatApi {
    /// Build a client from settings.
    ///
    /// # Errors
    ///
    /// Fails if the underlying TLS backend cannot be initialized.
    pub fn new(settings: &ApiSettings, bearer: Arc<dyn BearerSource>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self::with_client(client, &settings.base_url, bearer))
    }

    pub fn with_client(client: Client, base_url: &str, bearer: Arc<dyn BearerSource>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer header when a credential exists.
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.bearer.bearer() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = self.authorized(builder).send().await?;
        parse_response(response).await
    }
}

/// Decode a success body, or turn an error status into [`ClientError::Api`].
async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let url = response.url().path().to_string();

    if status.is_success() {
        debug!(%status, path = %url, "API request succeeded");
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<Value>(&body)
        .map(|v| extract_detail(&v))
        .unwrap_or_else(|_| GENERIC_ERROR_MESSAGE.to_string());

    warn!(%status, path = %url, %detail, "API request failed");

    Err(ClientError::Api {
        status: status.as_u16(),
        detail,
    })
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn register(&self, request: &RegisterRequest) -> Result<User, ClientError> {
        self.execute(self.client.post(self.url("/users/register")).json(request))
            .await
    }

    async fn login(&self, request: &LoginRequest) -> Result<Token, ClientError> {
        // OAuth2 password flow: form-encoded, no bearer needed.
        let response = self
            .client
            .post(self.url("/auth/token"))
            .form(request)
            .send()
            .await?;
        parse_response(response).await
    }

    async fn current_user(&self) -> Result<User, ClientError> {
        self.execute(self.client.get(self.url("/users/me"))).await
    }

    async fn send_message(&self, message: &MessageCreate) -> Result<Message, ClientError> {
        self.execute(self.client.post(self.url("/messages/")).json(message))
            .await
    }

    async fn messages(
        &self,
        chat: ChannelId,
        query: MessageQueryParams,
    ) -> Result<PaginatedMessages, ClientError> {
        self.execute(
            self.client
                .get(self.url(&format!("/chats/{}/messages", chat)))
                .query(&query),
        )
        .await
    }

    async fn create_chat(&self, chat: &ChatCreate) -> Result<Chat, ClientError> {
        self.execute(self.client.post(self.url("/chats/")).json(chat))
            .await
    }

    async fn chats(&self) -> Result<Vec<Chat>, ClientError> {
        self.execute(self.client.get(self.url("/chats/"))).await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<Token, ClientError> {
        let body = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.execute(self.client.post(self.url("/auth/refresh")).json(&body))
            .await
    }
}
