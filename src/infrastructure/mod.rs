//! Infrastructure Layer
//!
//! Implementations for the client's external collaborators:
//! - REST API client (reqwest)
//! - Realtime WebSocket transport (tokio-tungstenite)
//! - Durable credential storage

pub mod api;
pub mod realtime;
pub mod storage;
