//! MemVault Server - organization-scoped memory API with ACL enforcement
//!
//! This library provides the core functionality of the MemVault HTTP
//! server, including identity resolution, per-resource authorization,
//! and RESTful memory endpoints.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::*;
pub use server::{MemVaultServer, ServerConfig};

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the main application router with all routes and middleware
pub fn create_app(server: MemVaultServer) -> Router {
    routes::create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::create_cors_layer()),
        )
        .with_state(server)
}
