//! Middleware modules for request processing

pub mod acl;
pub mod auth_session;

// Re-export for convenience
pub use acl::resolve_resource_id;
pub use auth_session::AuthSession;

use tower_http::cors::{Any, CorsLayer};

/// Permissive CORS layer; tighten per deployment via a reverse proxy.
pub fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
