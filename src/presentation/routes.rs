//! Navigation targets returned by views instead of performing redirects
//! themselves.

use std::fmt;

use crate::domain::ChannelId;
use crate::startup::AppContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Chats,
    Chat(ChannelId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".into(),
            Route::Login => "/auth/login".into(),
            Route::Register => "/auth/register".into(),
            Route::Chats => "/chats".into(),
            Route::Chat(id) => format!("/chats/{}", id),
        }
    }

    /// True for routes that need a signed-in user.
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Chats | Route::Chat(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Redirect target for `route` given the current session, if any.
///
/// Protected routes need both an identity and a credential.
pub fn guard(ctx: &AppContext, route: Route) -> Option<Route> {
    if route.is_protected() && !ctx.session.is_authenticated() {
        Some(Route::Login)
    } else {
        None
    }
}
