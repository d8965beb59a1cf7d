//! Generic permission check handler
//!
//! Lets UI consumers ask "would this caller be allowed?" without
//! performing the operation. The resource id is located by the standard
//! extraction ladder (path, query, then body for mutating methods).

use axum::{
    extract::{Query, State},
    http::Method,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::middleware::{resolve_resource_id, AuthSession};
use crate::server::MemVaultServer;

/// Request to check access against a resource
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckAccessRequest {
    #[schema(example = "memory")]
    pub resource_type: String,
    #[schema(value_type = String, example = "viewer")]
    #[serde(default = "default_required_level")]
    pub required_level: auth_acl::PermissionLevel,
    /// Resource id, when not supplied via query parameter
    pub resource_id: Option<uuid::Uuid>,
}

fn default_required_level() -> auth_acl::PermissionLevel {
    auth_acl::PermissionLevel::Viewer
}

/// Access check result
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckAccessResponse {
    pub allowed: bool,
    #[schema(example = "memory")]
    pub resource_type: String,
}

/// Check whether the caller holds a permission level on a resource
#[utoipa::path(
    post,
    path = "/api/v1/permissions/check",
    tag = "Permissions",
    request_body = CheckAccessRequest,
    responses(
        (status = 200, description = "Access decision", body = CheckAccessResponse),
        (status = 400, description = "Resource ID not provided"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn check_access(
    State(server): State<MemVaultServer>,
    session: AuthSession,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    Json(request): Json<CheckAccessRequest>,
) -> Result<Json<ApiResponse<CheckAccessResponse>>, ApiError> {
    // This route has no path captures; ids arrive via query or body.
    let body = serde_json::json!({ "resource_id": request.resource_id });
    let resource_id = resolve_resource_id(&[], &query, &method, Some(&body))?;

    let allowed = server
        .memories
        .check_access(
            &session.identity,
            &request.resource_type,
            resource_id,
            request.required_level,
        )
        .await?;

    Ok(Json(api_success(CheckAccessResponse {
        allowed,
        resource_type: request.resource_type,
    })))
}
