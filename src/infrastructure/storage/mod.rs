//! Durable credential storage.
//!
//! A small string key/value store holding the access and refresh tokens
//! across process restarts.

mod file_store;
mod memory_store;

pub use file_store::FileCredentialStore;
pub use memory_store::MemoryCredentialStore;

use crate::shared::error::StorageError;

/// Storage key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// String entry store for credentials.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore: Send + Sync {
    /// Read an entry; missing keys yield `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write or overwrite an entry.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove an entry; removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
