pub mod paths;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::{
    handlers::{health, memories, permissions},
    openapi,
    server::MemVaultServer,
};

/// Create health check routes
pub fn health_routes() -> Router<MemVaultServer> {
    Router::new()
        .route(paths::health::HEALTH, get(health::health_check))
        .route(paths::health::VERSION, get(health::version_info))
}

/// Create memory record routes
pub fn memory_routes() -> Router<MemVaultServer> {
    Router::new()
        // Memory CRUD
        .route(paths::memories::MEMORIES, post(memories::create_memory))
        .route(paths::memories::MEMORIES, get(memories::list_memories))
        .route(paths::memories::MEMORY_BY_ID, get(memories::get_memory))
        .route(paths::memories::MEMORY_BY_ID, put(memories::update_memory))
        .route(paths::memories::MEMORY_BY_ID, delete(memories::delete_memory))
        // Search
        .route(paths::memories::SEARCH, post(memories::search_memories))
        // Sharing
        .route(paths::memories::SHARE, post(memories::share_memory))
        .route(paths::memories::SHARE, delete(memories::revoke_memory_access))
}

/// Create permission check routes
pub fn permission_routes() -> Router<MemVaultServer> {
    Router::new().route(paths::permissions::CHECK, post(permissions::check_access))
}

/// Create API v1 routes
pub fn api_v1_routes() -> Router<MemVaultServer> {
    Router::new().merge(memory_routes()).merge(permission_routes())
}

/// Create all application routes
pub fn create_routes() -> Router<MemVaultServer> {
    Router::new()
        // Health check routes (no authentication required)
        .merge(health_routes())
        // API documentation routes
        .merge(openapi::create_docs_routes())
        // API v1 routes (authentication required)
        .nest(paths::API_V1, api_v1_routes())
}
