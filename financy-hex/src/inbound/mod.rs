//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the application layer through a single
//! operation endpoint.

mod auth;
mod dispatcher;
mod handlers;
mod server;

pub use auth::{bearer_token, resolve_caller};
pub use dispatcher::dispatch;
pub use server::HttpServer;
