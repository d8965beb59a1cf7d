use axum::{extract::State, response::Json as ResponseJson, Json};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::server::MemVaultServer;

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub checks: HashMap<String, String>,
}

/// Version information response
#[derive(Debug, Serialize, ToSchema)]
pub struct VersionResponse {
    pub name: String,
    pub version: String,
    pub features: Vec<String>,
}

/// Health check handler
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_check(State(_server): State<MemVaultServer>) -> ResponseJson<HealthResponse> {
    let mut checks = HashMap::new();

    checks.insert("identity_service".to_string(), "healthy".to_string());
    checks.insert("grant_store".to_string(), "healthy".to_string());
    checks.insert("document_store".to_string(), "healthy".to_string());
    checks.insert("audit_trail".to_string(), "healthy".to_string());

    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
    };

    Json(response)
}

/// Version information handler
#[utoipa::path(
    get,
    path = "/version",
    tag = "Health",
    responses(
        (status = 200, description = "Build information", body = VersionResponse),
    )
)]
pub async fn version_info() -> ResponseJson<VersionResponse> {
    let features = vec![
        "acl-authorization".to_string(),
        "organization-scoping".to_string(),
        "audit-logging".to_string(),
        "identity-delegation".to_string(),
    ];

    let response = VersionResponse {
        name: "MemVault Engine".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        features,
    };

    Json(response)
}
