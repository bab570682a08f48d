//! Presentation Layer
//!
//! Headless views. Each view holds its own state, talks to services through
//! the [`AppContext`](crate::startup::AppContext) it is given, and returns a
//! [`Route`] when the user should be sent elsewhere.

pub mod auth_form;
pub mod chat_list;
pub mod chat_view;
pub mod message_list;
pub mod navbar;
pub mod routes;

pub use auth_form::{AuthFields, AuthForm, AuthMode};
pub use chat_list::{ChatListState, ChatListView, ChatSummary};
pub use chat_view::{ChatView, Mount};
pub use routes::Route;
