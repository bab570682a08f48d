//! Session State
//!
//! Holder of the signed-in identity and credential. Any view may read it;
//! writes go through the setters below, which keep the durable credential
//! store in step with memory.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::domain::{Token, User};
use crate::infrastructure::api::BearerSource;
use crate::infrastructure::storage::{CredentialStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

/// Identity plus credential of the current user.
pub struct SessionState {
    user: RwLock<Option<User>>,
    token: RwLock<Option<Token>>,
    store: Arc<dyn CredentialStore>,
}

impl SessionState {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            user: RwLock::new(None),
            token: RwLock::new(None),
            store,
        }
    }

    // ------------------------------------------------------------------
    // Readers
    // ------------------------------------------------------------------

    pub fn user(&self) -> Option<User> {
        self.user.read().clone()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.read().as_ref().map(|u| u.id)
    }

    pub fn token(&self) -> Option<Token> {
        self.token.read().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.token.read().as_ref().map(|t| t.access_token.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.token
            .read()
            .as_ref()
            .and_then(|t| t.refresh_token.clone())
    }

    pub fn has_credential(&self) -> bool {
        self.token.read().is_some()
    }

    /// Both an identity and a credential are present.
    pub fn is_authenticated(&self) -> bool {
        self.has_credential() && self.user.read().is_some()
    }

    // ------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------

    /// Store the credential in memory and in the durable store.
    ///
    /// `None` or a blank access token clears both durable entries.
    pub fn set_credential(&self, token: Option<Token>) {
        match token.filter(|t| !t.is_empty()) {
            Some(token) => {
                self.persist(ACCESS_TOKEN_KEY, &token.access_token);
                match &token.refresh_token {
                    Some(refresh) => self.persist(REFRESH_TOKEN_KEY, refresh),
                    None => self.forget(REFRESH_TOKEN_KEY),
                }
                *self.token.write() = Some(token);
                debug!("Credential stored");
            }
            None => {
                *self.token.write() = None;
                self.forget(ACCESS_TOKEN_KEY);
                self.forget(REFRESH_TOKEN_KEY);
                debug!("Credential cleared");
            }
        }
    }

    /// Store the identity in memory only.
    pub fn set_identity(&self, user: Option<User>) {
        if let Some(u) = &user {
            debug!(user_id = u.id, username = %u.username, "Identity set");
        }
        *self.user.write() = user;
    }

    /// Clear identity, credential, and both durable entries.
    pub fn logout(&self) {
        *self.user.write() = None;
        *self.token.write() = None;
        self.forget(ACCESS_TOKEN_KEY);
        self.forget(REFRESH_TOKEN_KEY);
        info!("Logged out");
    }

    /// Load a previously stored credential into memory.
    ///
    /// Returns whether a credential was found. The identity is not stored
    /// durably and has to be fetched again by the caller.
    pub fn restore(&self) -> bool {
        let access = match self.store.get(ACCESS_TOKEN_KEY) {
            Ok(Some(access)) if !access.trim().is_empty() => access,
            Ok(_) => return false,
            Err(e) => {
                warn!(error = %e, "Failed to read stored credential");
                return false;
            }
        };
        let refresh = self.store.get(REFRESH_TOKEN_KEY).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read stored refresh token");
            None
        });

        let mut token = Token::bearer(access);
        token.refresh_token = refresh;
        *self.token.write() = Some(token);
        info!("Restored stored credential");
        true
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            warn!(key, error = %e, "Failed to persist credential entry");
        }
    }

    fn forget(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!(key, error = %e, "Failed to remove credential entry");
        }
    }
}

impl BearerSource for SessionState {
    fn bearer(&self) -> Option<String> {
        self.access_token()
    }
}
