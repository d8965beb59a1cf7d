//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiErrorResponse;
use crate::handlers::{health, memories, permissions};
use crate::models::{
    CreateMemoryRequest, MemoryResponse, SearchMemoriesRequest, ShareMemoryRequest,
    UpdateMemoryRequest,
};
use crate::server::MemVaultServer;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::version_info,
        memories::create_memory,
        memories::get_memory,
        memories::update_memory,
        memories::delete_memory,
        memories::list_memories,
        memories::search_memories,
        memories::share_memory,
        memories::revoke_memory_access,
        permissions::check_access,
    ),
    components(schemas(
        ApiErrorResponse,
        CreateMemoryRequest,
        UpdateMemoryRequest,
        SearchMemoriesRequest,
        ShareMemoryRequest,
        MemoryResponse,
        memories::ShareResponse,
        memories::MessageResponse,
        permissions::CheckAccessRequest,
        permissions::CheckAccessResponse,
        health::HealthResponse,
        health::VersionResponse,
    )),
    tags(
        (name = "Health", description = "Service health and build information"),
        (name = "Memories", description = "Organization-scoped memory records with ACL enforcement"),
        (name = "Permissions", description = "Generic access checks"),
    ),
    info(
        title = "MemVault Engine API",
        description = "Organization-scoped memory API with per-resource access control",
    )
)]
pub struct ApiDoc;

/// Create Swagger UI routes serving the generated OpenAPI document
pub fn create_docs_routes() -> Router<MemVaultServer> {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
