//! Client settings and configuration structures.

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all client settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// REST backend configuration
    pub api: ApiSettings,

    /// Realtime endpoint configuration
    pub websocket: WebSocketSettings,

    /// Durable credential storage
    pub storage: StorageSettings,

    /// Message list paging
    pub messages: MessageSettings,

    /// Log output options
    pub logging: LoggingSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// REST backend configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the REST API (e.g., "http://localhost:8000")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Realtime endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebSocketSettings {
    /// WebSocket endpoint without query parameters
    pub url: String,
}

/// Credential storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// JSON file holding the access and refresh tokens
    pub credentials_path: PathBuf,
}

/// Message list configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageSettings {
    /// Messages fetched per page
    pub page_size: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if an endpoint URL is malformed.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("api.base_url", "http://localhost:8000")?
            .set_default("api.timeout_secs", 30)?
            .set_default("websocket.url", "ws://localhost:8000/websocket/ws")?
            .set_default("storage.credentials_path", ".chat-client/credentials.json")?
            .set_default("messages.page_size", 20)?
            .set_default("logging.json", false)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__API__BASE_URL=... -> api.base_url
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("api.base_url", std::env::var("API_BASE_URL").ok())?
            .set_override_option("websocket.url", std::env::var("WS_URL").ok())?
            .set_override_option(
                "storage.credentials_path",
                std::env::var("CREDENTIALS_PATH").ok(),
            )?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| {
                settings.validate()?;
                Ok(settings)
            })
    }

    /// Check that both endpoints parse as URLs with the expected schemes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let api = url::Url::parse(&self.api.base_url)
            .map_err(|e| ConfigError::Message(format!("Invalid api.base_url: {}", e)))?;
        if !matches!(api.scheme(), "http" | "https") {
            return Err(ConfigError::Message(format!(
                "api.base_url must use http or https, got {}",
                api.scheme()
            )));
        }

        let ws = url::Url::parse(&self.websocket.url)
            .map_err(|e| ConfigError::Message(format!("Invalid websocket.url: {}", e)))?;
        if !matches!(ws.scheme(), "ws" | "wss") {
            return Err(ConfigError::Message(format!(
                "websocket.url must use ws or wss, got {}",
                ws.scheme()
            )));
        }

        if self.messages.page_size == 0 {
            return Err(ConfigError::Message(
                "messages.page_size must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Settings pointing at a local backend, used by tests and as a fallback.
    pub fn local(api_base_url: &str, ws_url: &str, credentials_path: PathBuf) -> Self {
        Self {
            api: ApiSettings {
                base_url: api_base_url.trim_end_matches('/').to_string(),
                timeout_secs: 30,
            },
            websocket: WebSocketSettings {
                url: ws_url.to_string(),
            },
            storage: StorageSettings { credentials_path },
            messages: MessageSettings { page_size: 20 },
            logging: LoggingSettings { json: false },
            environment: "test".into(),
        }
    }
}
