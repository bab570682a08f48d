//! # Chat Client Library
//!
//! This crate provides a client for a REST + WebSocket chat backend with:
//! - Authentication (register, login, token refresh) with a durable credential
//! - Chat list and paginated message history over HTTP
//! - A single realtime WebSocket connection per open chat
//! - Headless views that a terminal front end drives
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Entities and the chat id value object
//! - **Application Layer**: Session state, services, and DTOs
//! - **Infrastructure Layer**: HTTP client, WebSocket transport, credential storage
//! - **Presentation Layer**: Views and routes
//!
//! ## Module Structure
//!
//! ```text
//! chat_client/
//! +-- config/         Configuration management
//! +-- domain/         Domain entities and value objects
//! +-- application/    Session, stores, services, and DTOs
//! +-- infrastructure/ REST client, realtime transport, credential storage
//! +-- presentation/   Views and routes
//! +-- shared/         Common utilities (errors, validation)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core types
pub mod domain;

// Application layer - Session and services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - Views
pub mod presentation;

// Shared utilities
pub mod shared;

// Context wiring
pub mod startup;

// Logging
pub mod telemetry;
