//! Top navigation bar.

use tracing::info;

use super::routes::Route;
use crate::startup::AppContext;

/// Greeting for the signed-in user, if any.
pub fn render(ctx: &AppContext) -> Option<String> {
    ctx.session
        .user()
        .map(|user| format!("Welcome, {}", user.username))
}

/// Sign out: close the realtime connection, clear the session and the
/// chat store, and go home.
pub fn logout(ctx: &AppContext) -> Route {
    ctx.transport.disconnect();
    ctx.session.logout();
    ctx.chats.clear();
    info!("Signed out");
    Route::Home
}
