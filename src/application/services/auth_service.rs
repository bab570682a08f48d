//! Authentication Service
//!
//! Login, registration, credential refresh, and session resume on top of the
//! REST API and [`SessionState`].

use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use crate::application::dto::{LoginRequest, RegisterRequest};
use crate::application::session::SessionState;
use crate::domain::User;
use crate::infrastructure::api::ChatApi;
use crate::shared::error::ClientError;
use crate::shared::validation::validation_error;

/// Authentication flows that update the session.
pub struct AuthService {
    api: Arc<dyn ChatApi>,
    session: Arc<SessionState>,
}

impl AuthService {
    pub fn new(api: Arc<dyn ChatApi>, session: Arc<SessionState>) -> Self {
        Self { api, session }
    }

    /// Create an account, then sign in with the same credentials.
    ///
    /// The identity is set as soon as registration succeeds, even if the
    /// follow-up login fails.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ClientError> {
        request.validate().map_err(validation_error)?;

        let user = self.api.register(request).await?;
        info!(user_id = user.id, username = %user.username, "Registered");
        self.session.set_identity(Some(user.clone()));

        let token = self.api.login(&request.login()).await?;
        self.session.set_credential(Some(token));

        Ok(user)
    }

    /// Sign in and load the identity behind the new credential.
    pub async fn login(&self, request: &LoginRequest) -> Result<User, ClientError> {
        request.validate().map_err(validation_error)?;

        let token = self.api.login(request).await?;
        self.session.set_credential(Some(token));

        let user = self.api.current_user().await?;
        info!(user_id = user.id, username = %user.username, "Logged in");
        self.session.set_identity(Some(user.clone()));

        Ok(user)
    }

    /// Trade the stored refresh token for a new credential.
    ///
    /// A response without a refresh token keeps the previous one.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let refresh = self
            .session
            .refresh_token()
            .ok_or(ClientError::Unauthenticated)?;

        let mut token = self.api.refresh_token(&refresh).await?;
        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh);
        }
        self.session.set_credential(Some(token));
        info!("Credential refreshed");
        Ok(())
    }

    /// Resume a session from the durable credential store.
    ///
    /// Returns `Ok(None)` when nothing is stored. A rejected credential is
    /// refreshed once; if that also fails the session is cleared.
    pub async fn resume(&self) -> Result<Option<User>, ClientError> {
        if !self.session.restore() {
            return Ok(None);
        }

        let user = match self.api.current_user().await {
            Ok(user) => user,
            Err(e) if e.status() == Some(401) => {
                warn!("Stored credential rejected, refreshing");
                let refreshed = match self.refresh().await {
                    Ok(()) => self.api.current_user().await,
                    Err(err) => Err(err),
                };
                match refreshed {
                    Ok(user) => user,
                    Err(err) => {
                        self.session.logout();
                        return Err(err);
                    }
                }
            }
            Err(e) => return Err(e),
        };

        info!(user_id = user.id, "Session resumed");
        self.session.set_identity(Some(user.clone()));
        Ok(Some(user))
    }

    pub fn logout(&self) {
        self.session.logout();
    }
}
