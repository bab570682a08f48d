//! Login and registration form.

use tracing::{info, warn};

use super::routes::Route;
use crate::application::dto::{LoginRequest, RegisterRequest, REQUIRED_FIELDS_MESSAGE};
use crate::domain::Gender;
use crate::startup::AppContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// Raw form input.
#[derive(Debug, Clone, Default)]
pub struct AuthFields {
    pub username: String,
    pub email: String,
    pub password: String,
    pub gender: String,
    pub first_name: String,
    pub last_name: String,
}

/// Headless auth form: field state, inline error slot, and submit.
#[derive(Debug)]
pub struct AuthForm {
    mode: AuthMode,
    fields: AuthFields,
    error: Option<String>,
    is_loading: bool,
}

fn optional(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl AuthForm {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            fields: AuthFields::default(),
            error: None,
            is_loading: false,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn fields(&self) -> &AuthFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut AuthFields {
        &mut self.fields
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            AuthMode::Login => "Sign in",
            AuthMode::Register => "Create account",
        }
    }

    /// Route offered by the "Sign up" / "Sign in" switch link.
    pub fn switch_route(&self) -> Route {
        match self.mode {
            AuthMode::Login => Route::Register,
            AuthMode::Register => Route::Login,
        }
    }

    fn missing_required(&self) -> bool {
        self.fields.email.trim().is_empty()
            || self.fields.password.is_empty()
            || (self.mode == AuthMode::Register && self.fields.username.trim().is_empty())
    }

    fn login_request(&self) -> LoginRequest {
        LoginRequest {
            email: self.fields.email.trim().to_string(),
            password: self.fields.password.clone(),
        }
    }

    fn register_request(&self) -> RegisterRequest {
        RegisterRequest {
            username: self.fields.username.trim().to_string(),
            email: self.fields.email.trim().to_string(),
            password: self.fields.password.clone(),
            gender: Gender::parse(&self.fields.gender),
            first_name: optional(&self.fields.first_name),
            last_name: optional(&self.fields.last_name),
            role: None,
        }
    }

    /// Validate and submit.
    ///
    /// Returns the route to navigate to on success. On failure the error slot
    /// holds a one-line message and `None` is returned.
    pub async fn submit(&mut self, ctx: &AppContext) -> Option<Route> {
        if self.missing_required() {
            self.error = Some(REQUIRED_FIELDS_MESSAGE.into());
            return None;
        }

        self.is_loading = true;
        self.error = None;

        let auth = ctx.auth();
        let result = match self.mode {
            AuthMode::Register => auth.register(&self.register_request()).await,
            AuthMode::Login => auth.login(&self.login_request()).await,
        };

        self.is_loading = false;

        match result {
            Ok(user) => {
                info!(user_id = user.id, mode = ?self.mode, "Authentication succeeded");
                self.fields.password.clear();
                Some(Route::Chats)
            }
            Err(e) => {
                warn!(error = %e, mode = ?self.mode, "Authentication failed");
                self.error = Some(e.user_message());
                None
            }
        }
    }
}
