//! Memory record handlers
//!
//! CRUD, search, and sharing endpoints for organization-scoped memory
//! records. Authorization is enforced by the facade service; handlers
//! only translate between the wire and the service.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::middleware::AuthSession;
use crate::models::{
    CreateMemoryRequest, MemoryResponse, SearchMemoriesRequest, ShareMemoryRequest,
    UpdateMemoryRequest,
};
use crate::server::MemVaultServer;
use crate::services::ListMemoriesInput;
use crate::types::ListParams;

/// Query parameters for listing memories
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ListMemoriesQuery {
    #[param(example = 10, minimum = 1, maximum = 100)]
    pub limit: Option<u32>,
    #[param(example = 0, minimum = 0)]
    pub offset: Option<u32>,
    /// Restrict results to one type tag
    #[serde(rename = "type")]
    pub memory_type: Option<String>,
    /// Restrict results to memories carrying this tag
    pub tag: Option<String>,
    /// Also include the organization's public memories
    #[serde(default)]
    pub include_public: bool,
}

/// Query parameters for revoking access
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct RevokeAccessQuery {
    pub grantee_id: Uuid,
    #[param(example = "user")]
    pub grantee_type: String,
}

/// Share operation result
#[derive(Debug, Serialize, ToSchema)]
pub struct ShareResponse {
    pub message: String,
    #[schema(value_type = String, example = "viewer")]
    pub permission_level: auth_acl::PermissionLevel,
}

/// Plain confirmation message
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Create a new memory
///
/// The creator is granted admin permission on the new memory.
#[utoipa::path(
    post,
    path = "/api/v1/memories",
    tag = "Memories",
    request_body = CreateMemoryRequest,
    responses(
        (status = 201, description = "Memory created", body = MemoryResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Organization membership required"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_memory(
    State(server): State<MemVaultServer>,
    session: AuthSession,
    Json(request): Json<CreateMemoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MemoryResponse>>), ApiError> {
    let (memory, level) = server
        .memories
        .create(&session.identity, session.client_addr.clone(), request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(api_success(MemoryResponse::from_memory(memory, Some(level)))),
    ))
}

/// Get a specific memory by ID
///
/// Requires at least viewer permission for the memory.
#[utoipa::path(
    get,
    path = "/api/v1/memories/{id}",
    tag = "Memories",
    params(("id" = Uuid, Path, description = "Memory ID")),
    responses(
        (status = 200, description = "Memory found", body = MemoryResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient permissions"),
        (status = 404, description = "Memory not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_memory(
    State(server): State<MemVaultServer>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MemoryResponse>>, ApiError> {
    let (memory, level) = server.memories.get(&session.identity, id).await?;

    Ok(Json(api_success(MemoryResponse::from_memory(memory, level))))
}

/// Update a memory
///
/// Requires editor permission for the memory.
#[utoipa::path(
    put,
    path = "/api/v1/memories/{id}",
    tag = "Memories",
    params(("id" = Uuid, Path, description = "Memory ID")),
    request_body = UpdateMemoryRequest,
    responses(
        (status = 200, description = "Memory updated", body = MemoryResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient permissions"),
        (status = 404, description = "Memory not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_memory(
    State(server): State<MemVaultServer>,
    session: AuthSession,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMemoryRequest>,
) -> Result<Json<ApiResponse<MemoryResponse>>, ApiError> {
    let (memory, level) = server
        .memories
        .update(&session.identity, session.client_addr.clone(), id, request)
        .await?;

    Ok(Json(api_success(MemoryResponse::from_memory(memory, level))))
}

/// Delete a memory
///
/// Requires admin permission; removes every grant referencing the memory.
#[utoipa::path(
    delete,
    path = "/api/v1/memories/{id}",
    tag = "Memories",
    params(("id" = Uuid, Path, description = "Memory ID")),
    responses(
        (status = 200, description = "Memory deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient permissions"),
        (status = 404, description = "Memory not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_memory(
    State(server): State<MemVaultServer>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    server
        .memories
        .delete(&session.identity, session.client_addr.clone(), id)
        .await?;

    Ok(Json(api_success(MessageResponse {
        message: "Memory deleted successfully".to_string(),
    })))
}

/// List memories with pagination
///
/// Returns memories the caller has access to, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/memories",
    tag = "Memories",
    params(ListMemoriesQuery),
    responses(
        (status = 200, description = "Accessible memories", body = Vec<MemoryResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Organization membership required"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_memories(
    State(server): State<MemVaultServer>,
    session: AuthSession,
    Query(params): Query<ListMemoriesQuery>,
) -> Result<Json<ApiResponse<Vec<MemoryResponse>>>, ApiError> {
    let window = ListParams {
        limit: params.limit,
        offset: params.offset,
    };

    let input = ListMemoriesInput {
        limit: window.limit(),
        offset: window.offset(),
        memory_type: params.memory_type,
        tag: params.tag,
        include_public: params.include_public,
    };

    let (memories, total) = server.memories.list(&session.identity, input).await?;

    let payload: Vec<MemoryResponse> = memories
        .into_iter()
        .map(|(memory, level)| MemoryResponse::from_memory(memory, level))
        .collect();

    Ok(Json(window.wrap_response(payload, total)))
}

/// Search memories with ACL filtering
///
/// Returns only memories the caller has access to within their
/// organization; public memories are included when requested.
#[utoipa::path(
    post,
    path = "/api/v1/memories/search",
    tag = "Memories",
    request_body = SearchMemoriesRequest,
    responses(
        (status = 200, description = "Matching memories", body = Vec<MemoryResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Organization membership required"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn search_memories(
    State(server): State<MemVaultServer>,
    session: AuthSession,
    Json(request): Json<SearchMemoriesRequest>,
) -> Result<Json<ApiResponse<Vec<MemoryResponse>>>, ApiError> {
    let memories = server.memories.search(&session.identity, request).await?;

    let payload: Vec<MemoryResponse> = memories
        .into_iter()
        .map(|(memory, level)| MemoryResponse::from_memory(memory, level))
        .collect();

    Ok(Json(api_success(payload)))
}

/// Share a memory with a user, organizational unit, or organization
///
/// Requires admin permission for the memory. Resharing an existing
/// grantee updates the stored permission level in place.
#[utoipa::path(
    post,
    path = "/api/v1/memories/{id}/share",
    tag = "Memories",
    params(("id" = Uuid, Path, description = "Memory ID")),
    request_body = ShareMemoryRequest,
    responses(
        (status = 200, description = "Memory shared", body = ShareResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient permissions"),
        (status = 404, description = "Memory not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn share_memory(
    State(server): State<MemVaultServer>,
    session: AuthSession,
    Path(id): Path<Uuid>,
    Json(request): Json<ShareMemoryRequest>,
) -> Result<Json<ApiResponse<ShareResponse>>, ApiError> {
    let grantee_type = request.grantee_type;
    let grant = server
        .memories
        .share(&session.identity, session.client_addr.clone(), id, request)
        .await?;

    Ok(Json(api_success(ShareResponse {
        message: format!("Memory shared with {} successfully", grantee_type),
        permission_level: grant.permission_level,
    })))
}

/// Revoke access to a memory
///
/// Requires admin permission. Succeeds even when the grantee had no
/// access; the end state is the same.
#[utoipa::path(
    delete,
    path = "/api/v1/memories/{id}/share",
    tag = "Memories",
    params(("id" = Uuid, Path, description = "Memory ID"), RevokeAccessQuery),
    responses(
        (status = 200, description = "Access revoked", body = MessageResponse),
        (status = 400, description = "Invalid grantee type"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Insufficient permissions"),
        (status = 404, description = "Memory not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn revoke_memory_access(
    State(server): State<MemVaultServer>,
    session: AuthSession,
    Path(id): Path<Uuid>,
    Query(params): Query<RevokeAccessQuery>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let grantee_type = auth_acl::GranteeType::from_label(&params.grantee_type)
        .ok_or_else(|| ApiError::validation(format!("Invalid grantee type: {}", params.grantee_type)))?;

    server
        .memories
        .revoke(
            &session.identity,
            session.client_addr.clone(),
            id,
            params.grantee_id,
            grantee_type,
        )
        .await?;

    Ok(Json(api_success(MessageResponse {
        message: "Access revoked successfully".to_string(),
    })))
}
