//! Route path constants
//!
//! Kept in one place so handlers, routes, and the OpenAPI document
//! cannot drift apart.

/// API v1 prefix
pub const API_V1: &str = "/api/v1";

pub mod health {
    pub const HEALTH: &str = "/health";
    pub const VERSION: &str = "/version";
}

pub mod memories {
    pub const MEMORIES: &str = "/memories";
    pub const MEMORY_BY_ID: &str = "/memories/:id";
    pub const SEARCH: &str = "/memories/search";
    pub const SHARE: &str = "/memories/:id/share";
}

pub mod permissions {
    pub const CHECK: &str = "/permissions/check";
}
