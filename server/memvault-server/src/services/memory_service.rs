//! Memory resource facade
//!
//! Every operation consults the permission engine before touching the
//! document store, and every state-changing operation appends one audit
//! entry (best-effort). The facade is HTTP-agnostic so the integration
//! suite can drive it directly against in-memory collaborators.

use crate::error::{ApiError, ApiResult};
use crate::models::{
    CreateMemoryRequest, Memory, SearchMemoriesRequest, ShareMemoryRequest, UpdateMemoryRequest,
};
use crate::storage::{Condition, DocumentQuery, DocumentStore};
use audit_engine::{AuditEntry, AuditTrail};
use auth_acl::{GranteeType, PermissionEngine, PermissionLevel, ResourceGrant, ResourceRef};
use auth_identity::IdentityContext;
use chrono::Utc;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Resource type tag under which memory grants are stored.
pub const MEMORY_RESOURCE_TYPE: &str = "memory";

/// Parameters for listing memories.
#[derive(Debug, Clone, Default)]
pub struct ListMemoriesInput {
    pub limit: u32,
    pub offset: u32,
    pub memory_type: Option<String>,
    pub tag: Option<String>,
    pub include_public: bool,
}

/// Facade over the permission engine, document store, and audit trail.
pub struct MemoryService {
    permissions: Arc<PermissionEngine>,
    documents: Arc<dyn DocumentStore>,
    audit: Arc<AuditTrail>,
}

impl MemoryService {
    pub fn new(
        permissions: Arc<PermissionEngine>,
        documents: Arc<dyn DocumentStore>,
        audit: Arc<AuditTrail>,
    ) -> Self {
        Self {
            permissions,
            documents,
            audit,
        }
    }

    fn organization_of(&self, identity: &IdentityContext) -> ApiResult<Uuid> {
        identity
            .organization_id
            .ok_or_else(|| ApiError::authorization("Organization membership required"))
    }

    fn resource_ref(memory: &Memory) -> ResourceRef {
        ResourceRef::new(MEMORY_RESOURCE_TYPE, memory.id, memory.organization_id)
    }

    /// Load a memory within the caller's organization, or fail NotFound.
    async fn load(&self, identity: &IdentityContext, id: Uuid) -> ApiResult<Memory> {
        let organization_id = self.organization_of(identity)?;
        self.documents
            .fetch(organization_id, id)
            .await?
            .ok_or_else(|| ApiError::not_found(MEMORY_RESOURCE_TYPE))
    }

    // =========================================================================
    // CRUD
    // =========================================================================

    /// Create a memory and synthesize the creator's admin grant.
    pub async fn create(
        &self,
        identity: &IdentityContext,
        client_addr: Option<String>,
        request: CreateMemoryRequest,
    ) -> ApiResult<(Memory, PermissionLevel)> {
        let organization_id = self.organization_of(identity)?;

        if request.title.trim().is_empty() {
            return Err(ApiError::validation("Title is required"));
        }
        if request.content.trim().is_empty() {
            return Err(ApiError::validation("Content is required"));
        }

        let now = Utc::now();
        let memory = Memory {
            id: Uuid::new_v4(),
            organization_id,
            title: request.title,
            content: request.content,
            memory_type: request.memory_type,
            metadata: request.metadata,
            tags: request.tags,
            is_public: request.is_public,
            created_by: identity.user_id,
            created_at: now,
            updated_at: now,
        };

        self.documents.insert(memory.clone()).await?;
        self.permissions
            .grant_creator(&Self::resource_ref(&memory), identity.user_id)
            .await?;

        info!(memory_id = %memory.id, user_id = %identity.user_id, "Memory created");

        self.audit
            .record(
                AuditEntry::new(organization_id, identity.user_id, "memory_created")
                    .with_resource(MEMORY_RESOURCE_TYPE, memory.id)
                    .with_ip_address(client_addr),
            )
            .await;

        Ok((memory, PermissionLevel::Admin))
    }

    /// Fetch a memory. Requires viewer access.
    pub async fn get(
        &self,
        identity: &IdentityContext,
        id: Uuid,
    ) -> ApiResult<(Memory, Option<PermissionLevel>)> {
        let memory = self.load(identity, id).await?;
        let resource = Self::resource_ref(&memory);

        self.permissions
            .authorize(identity, &resource, PermissionLevel::Viewer)
            .await?;

        let level = self.permissions.effective_level(identity, &resource).await?;
        Ok((memory, level))
    }

    /// Update a memory in place. Requires editor access.
    pub async fn update(
        &self,
        identity: &IdentityContext,
        client_addr: Option<String>,
        id: Uuid,
        request: UpdateMemoryRequest,
    ) -> ApiResult<(Memory, Option<PermissionLevel>)> {
        let mut memory = self.load(identity, id).await?;
        let resource = Self::resource_ref(&memory);

        self.permissions
            .authorize(identity, &resource, PermissionLevel::Editor)
            .await?;

        if let Some(title) = request.title {
            if title.trim().is_empty() {
                return Err(ApiError::validation("Title cannot be empty"));
            }
            memory.title = title;
        }
        if let Some(content) = request.content {
            memory.content = content;
        }
        if let Some(metadata) = request.metadata {
            memory.metadata = metadata;
        }
        if let Some(tags) = request.tags {
            memory.tags = tags;
        }
        if let Some(is_public) = request.is_public {
            memory.is_public = is_public;
        }
        memory.updated_at = Utc::now();

        self.documents.update(memory.clone()).await?;

        self.audit
            .record(
                AuditEntry::new(memory.organization_id, identity.user_id, "memory_updated")
                    .with_resource(MEMORY_RESOURCE_TYPE, memory.id)
                    .with_ip_address(client_addr),
            )
            .await;

        let level = self.permissions.effective_level(identity, &resource).await?;
        Ok((memory, level))
    }

    /// Delete a memory and cascade-delete every grant referencing it.
    /// Requires admin access.
    pub async fn delete(
        &self,
        identity: &IdentityContext,
        client_addr: Option<String>,
        id: Uuid,
    ) -> ApiResult<()> {
        let memory = self.load(identity, id).await?;
        let resource = Self::resource_ref(&memory);

        self.permissions
            .authorize(identity, &resource, PermissionLevel::Admin)
            .await?;

        self.documents.remove(memory.organization_id, id).await?;
        self.permissions.revoke_all(&resource).await?;

        info!(memory_id = %id, user_id = %identity.user_id, "Memory deleted");

        self.audit
            .record(
                AuditEntry::new(memory.organization_id, identity.user_id, "memory_deleted")
                    .with_resource(MEMORY_RESOURCE_TYPE, id)
                    .with_ip_address(client_addr),
            )
            .await;

        Ok(())
    }

    // =========================================================================
    // List and search
    // =========================================================================

    /// List memories the caller can see, newest first.
    pub async fn list(
        &self,
        identity: &IdentityContext,
        input: ListMemoriesInput,
    ) -> ApiResult<(Vec<(Memory, Option<PermissionLevel>)>, u64)> {
        let organization_id = self.organization_of(identity)?;

        let mut query = DocumentQuery::for_organization(organization_id)
            .with_limit(input.limit)
            .with_offset(input.offset);

        if let Some(type_tag) = &input.memory_type {
            query = query.with_condition(Condition::TypeEquals(type_tag.clone()));
        }
        if let Some(tag) = &input.tag {
            query = query.with_condition(Condition::TagIn(vec![tag.clone()]));
        }
        query = self
            .apply_access_filter(identity, query, input.include_public)
            .await?;

        let total = self.documents.count(&query).await?;
        let memories = self.documents.query(&query).await?;

        Ok((self.annotate_levels(identity, memories).await?, total))
    }

    /// Search memories by free text, restricted to what the caller can
    /// see.
    pub async fn search(
        &self,
        identity: &IdentityContext,
        request: SearchMemoriesRequest,
    ) -> ApiResult<Vec<(Memory, Option<PermissionLevel>)>> {
        let organization_id = self.organization_of(identity)?;
        let limit = request.limit.clamp(1, 100);

        let mut query = DocumentQuery::for_organization(organization_id)
            .with_text(&request.query)
            .with_limit(limit);

        if let Some(type_tag) = &request.memory_type {
            query = query.with_condition(Condition::TypeEquals(type_tag.clone()));
        }
        if let Some(tags) = &request.tags {
            if !tags.is_empty() {
                query = query.with_condition(Condition::TagIn(tags.clone()));
            }
        }
        query = self
            .apply_access_filter(identity, query, request.include_public)
            .await?;

        let memories = self.documents.query(&query).await?;
        self.annotate_levels(identity, memories).await
    }

    /// Restrict a query to what the caller can see.
    ///
    /// Admins are unrestricted within their organization. Everyone else
    /// is limited to their accessible-id set; with `include_public` the
    /// effective filter is the union of that set and the organization's
    /// public documents, not an intersection.
    async fn apply_access_filter(
        &self,
        identity: &IdentityContext,
        query: DocumentQuery,
        include_public: bool,
    ) -> ApiResult<DocumentQuery> {
        let accessible: Option<HashSet<Uuid>> = self
            .permissions
            .accessible_resource_ids(identity, MEMORY_RESOURCE_TYPE)
            .await?;

        Ok(match accessible {
            None => query,
            Some(ids) if include_public => query.with_condition(Condition::AnyOf(vec![
                Condition::IdIn(ids),
                Condition::IsPublic(true),
            ])),
            Some(ids) => query.with_condition(Condition::IdIn(ids)),
        })
    }

    async fn annotate_levels(
        &self,
        identity: &IdentityContext,
        memories: Vec<Memory>,
    ) -> ApiResult<Vec<(Memory, Option<PermissionLevel>)>> {
        let mut annotated = Vec::with_capacity(memories.len());
        for memory in memories {
            let level = self
                .permissions
                .effective_level(identity, &Self::resource_ref(&memory))
                .await?;
            annotated.push((memory, level));
        }
        Ok(annotated)
    }

    // =========================================================================
    // Sharing
    // =========================================================================

    /// Share a memory with a grantee. Requires admin access; upsert
    /// semantics on resubmission.
    pub async fn share(
        &self,
        identity: &IdentityContext,
        client_addr: Option<String>,
        id: Uuid,
        request: ShareMemoryRequest,
    ) -> ApiResult<ResourceGrant> {
        let memory = self.load(identity, id).await?;
        let resource = Self::resource_ref(&memory);

        let grant = self
            .permissions
            .share(
                identity,
                &resource,
                request.grantee_id,
                request.grantee_type,
                request.permission_level,
            )
            .await?;

        self.audit
            .record(
                AuditEntry::new(memory.organization_id, identity.user_id, "memory_shared")
                    .with_resource(MEMORY_RESOURCE_TYPE, id)
                    .with_details(json!({
                        "grantee_id": request.grantee_id,
                        "grantee_type": request.grantee_type.as_str(),
                        "permission_level": request.permission_level.as_str(),
                    }))
                    .with_ip_address(client_addr),
            )
            .await;

        Ok(grant)
    }

    /// Revoke a grantee's access to a memory. Requires admin access;
    /// succeeds when no matching grant exists.
    pub async fn revoke(
        &self,
        identity: &IdentityContext,
        client_addr: Option<String>,
        id: Uuid,
        grantee_id: Uuid,
        grantee_type: GranteeType,
    ) -> ApiResult<()> {
        let memory = self.load(identity, id).await?;
        let resource = Self::resource_ref(&memory);

        self.permissions
            .revoke(identity, &resource, grantee_id, grantee_type)
            .await?;

        self.audit
            .record(
                AuditEntry::new(
                    memory.organization_id,
                    identity.user_id,
                    "memory_access_revoked",
                )
                .with_resource(MEMORY_RESOURCE_TYPE, id)
                .with_details(json!({
                    "grantee_id": grantee_id,
                    "grantee_type": grantee_type.as_str(),
                }))
                .with_ip_address(client_addr),
            )
            .await;

        Ok(())
    }

    // =========================================================================
    // Generic access checks
    // =========================================================================

    /// Check whether the caller holds `required` on an arbitrary resource
    /// within their own organization. Resources are organization-scoped,
    /// so the caller's organization is the resource's organization here.
    pub async fn check_access(
        &self,
        identity: &IdentityContext,
        resource_type: &str,
        resource_id: Uuid,
        required: PermissionLevel,
    ) -> ApiResult<bool> {
        let organization_id = self.organization_of(identity)?;
        let resource = ResourceRef::new(resource_type, resource_id, organization_id);

        match self.permissions.authorize(identity, &resource, required).await {
            Ok(()) => Ok(true),
            Err(auth_acl::AclError::Forbidden { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
