//! Integration tests for the memory facade
//!
//! Drives the full create/share/list/delete lifecycle through the
//! service layer against in-memory collaborators, checking both the
//! authorization outcomes and the audit side effects.

use audit_engine::{sink::InMemoryAuditSink, AuditTrail};
use auth_acl::{repository::InMemoryGrantStore, GranteeType, PermissionEngine, PermissionLevel};
use auth_identity::{IdentityContext, Profile, Role, TokenSubject};
use memvault_server::error::ApiError;
use memvault_server::models::{
    CreateMemoryRequest, SearchMemoriesRequest, ShareMemoryRequest, UpdateMemoryRequest,
};
use memvault_server::services::{ListMemoriesInput, MemoryService};
use memvault_server::storage::InMemoryDocumentStore;
use serde_json::Map;
use std::sync::Arc;
use uuid::Uuid;

struct TestHarness {
    service: MemoryService,
    audit: Arc<InMemoryAuditSink>,
}

fn harness() -> TestHarness {
    let audit = Arc::new(InMemoryAuditSink::new());
    let service = MemoryService::new(
        Arc::new(PermissionEngine::new(Arc::new(InMemoryGrantStore::new()))),
        Arc::new(InMemoryDocumentStore::new()),
        Arc::new(AuditTrail::new(audit.clone())),
    );
    TestHarness { service, audit }
}

fn identity(org: Uuid, role: Role) -> IdentityContext {
    IdentityContext::from_parts(
        TokenSubject {
            subject_id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
        },
        Profile {
            organization_id: Some(org),
            organizational_unit_id: None,
            role,
            display_name: None,
        },
    )
}

fn create_request(title: &str) -> CreateMemoryRequest {
    CreateMemoryRequest {
        title: title.to_string(),
        content: format!("content of {}", title),
        memory_type: "text".to_string(),
        metadata: Map::new(),
        tags: Vec::new(),
        is_public: false,
    }
}

#[tokio::test]
async fn test_create_grants_creator_admin_access() {
    let harness = harness();
    let org = Uuid::new_v4();
    let creator = identity(org, Role::Member);

    let (memory, level) = harness
        .service
        .create(&creator, None, create_request("notes"))
        .await
        .unwrap();

    assert_eq!(level, PermissionLevel::Admin);
    assert_eq!(memory.organization_id, org);
    assert_eq!(memory.created_by, creator.user_id);

    // Creator can immediately perform admin-level operations
    harness
        .service
        .delete(&creator, None, memory.id)
        .await
        .unwrap();

    let actions: Vec<String> = harness
        .audit
        .entries()
        .iter()
        .map(|e| e.action.clone())
        .collect();
    assert_eq!(actions, vec!["memory_created", "memory_deleted"]);
}

#[tokio::test]
async fn test_create_requires_organization() {
    let harness = harness();
    let mut outsider = identity(Uuid::new_v4(), Role::Member);
    outsider.organization_id = None;

    let result = harness
        .service
        .create(&outsider, None, create_request("x"))
        .await;
    assert!(matches!(result, Err(ApiError::Authorization { .. })));
}

#[tokio::test]
async fn test_create_validates_title_and_content() {
    let harness = harness();
    let creator = identity(Uuid::new_v4(), Role::Member);

    let mut request = create_request("valid");
    request.title = "   ".to_string();
    let result = harness.service.create(&creator, None, request).await;
    assert!(matches!(result, Err(ApiError::Validation { .. })));
}

#[tokio::test]
async fn test_share_viewer_then_revoke_scenario() {
    // User U creates R and shares it with V at viewer; V can read but not
    // edit; after revocation V cannot read at all.
    let harness = harness();
    let org = Uuid::new_v4();
    let owner = identity(org, Role::Member);
    let viewer = identity(org, Role::Member);

    let (memory, _) = harness
        .service
        .create(&owner, None, create_request("shared notes"))
        .await
        .unwrap();

    // Before sharing: V sees nothing
    let result = harness.service.get(&viewer, memory.id).await;
    assert!(matches!(result, Err(ApiError::Authorization { .. })));

    harness
        .service
        .share(
            &owner,
            None,
            memory.id,
            ShareMemoryRequest {
                grantee_id: viewer.user_id,
                grantee_type: GranteeType::User,
                permission_level: PermissionLevel::Viewer,
            },
        )
        .await
        .unwrap();

    // Viewer access works, editor-level operations stay forbidden
    let (fetched, level) = harness.service.get(&viewer, memory.id).await.unwrap();
    assert_eq!(fetched.id, memory.id);
    assert_eq!(level, Some(PermissionLevel::Viewer));

    let update = UpdateMemoryRequest {
        content: Some("edited".to_string()),
        ..Default::default()
    };
    let result = harness
        .service
        .update(&viewer, None, memory.id, update)
        .await;
    assert!(matches!(result, Err(ApiError::Authorization { .. })));

    harness
        .service
        .revoke(&owner, None, memory.id, viewer.user_id, GranteeType::User)
        .await
        .unwrap();

    let result = harness.service.get(&viewer, memory.id).await;
    assert!(matches!(result, Err(ApiError::Authorization { .. })));

    let actions: Vec<String> = harness
        .audit
        .entries()
        .iter()
        .map(|e| e.action.clone())
        .collect();
    assert_eq!(
        actions,
        vec!["memory_created", "memory_shared", "memory_access_revoked"]
    );
}

#[tokio::test]
async fn test_non_admin_cannot_share() {
    let harness = harness();
    let org = Uuid::new_v4();
    let owner = identity(org, Role::Member);
    let editor = identity(org, Role::Member);

    let (memory, _) = harness
        .service
        .create(&owner, None, create_request("doc"))
        .await
        .unwrap();
    harness
        .service
        .share(
            &owner,
            None,
            memory.id,
            ShareMemoryRequest {
                grantee_id: editor.user_id,
                grantee_type: GranteeType::User,
                permission_level: PermissionLevel::Editor,
            },
        )
        .await
        .unwrap();

    // Editor-level access is not enough to share further
    let result = harness
        .service
        .share(
            &editor,
            None,
            memory.id,
            ShareMemoryRequest {
                grantee_id: Uuid::new_v4(),
                grantee_type: GranteeType::User,
                permission_level: PermissionLevel::Viewer,
            },
        )
        .await;
    assert!(matches!(result, Err(ApiError::Authorization { .. })));
}

#[tokio::test]
async fn test_list_includes_public_as_a_union() {
    // Accessible = {R1}; R2 is public; R3 is neither.
    // include_public=true must return R1 ∪ R2.
    let harness = harness();
    let org = Uuid::new_v4();
    let owner = identity(org, Role::Member);
    let caller = identity(org, Role::Member);

    let (r1, _) = harness
        .service
        .create(&owner, None, create_request("granted"))
        .await
        .unwrap();
    let mut public_request = create_request("public");
    public_request.is_public = true;
    let (r2, _) = harness
        .service
        .create(&owner, None, public_request)
        .await
        .unwrap();
    harness
        .service
        .create(&owner, None, create_request("hidden"))
        .await
        .unwrap();

    harness
        .service
        .share(
            &owner,
            None,
            r1.id,
            ShareMemoryRequest {
                grantee_id: caller.user_id,
                grantee_type: GranteeType::User,
                permission_level: PermissionLevel::Viewer,
            },
        )
        .await
        .unwrap();

    let (visible, total) = harness
        .service
        .list(
            &caller,
            ListMemoriesInput {
                limit: 10,
                offset: 0,
                include_public: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let ids: Vec<Uuid> = visible.iter().map(|(m, _)| m.id).collect();
    assert_eq!(total, 2);
    assert!(ids.contains(&r1.id));
    assert!(ids.contains(&r2.id));

    // Without include_public only the explicit grant is visible
    let (visible, total) = harness
        .service
        .list(
            &caller,
            ListMemoriesInput {
                limit: 10,
                offset: 0,
                include_public: false,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(visible[0].0.id, r1.id);
}

#[tokio::test]
async fn test_admin_lists_everything_in_org_only() {
    let harness = harness();
    let org = Uuid::new_v4();
    let member = identity(org, Role::Member);
    let admin = identity(org, Role::OrgAdmin);
    let foreign_member = identity(Uuid::new_v4(), Role::Member);

    harness
        .service
        .create(&member, None, create_request("one"))
        .await
        .unwrap();
    harness
        .service
        .create(&member, None, create_request("two"))
        .await
        .unwrap();
    harness
        .service
        .create(&foreign_member, None, create_request("elsewhere"))
        .await
        .unwrap();

    let (visible, total) = harness
        .service
        .list(
            &admin,
            ListMemoriesInput {
                limit: 10,
                offset: 0,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(total, 2);
    assert!(visible.iter().all(|(m, _)| m.organization_id == org));
    // Admins report admin-level access on every visible record
    assert!(visible
        .iter()
        .all(|(_, level)| *level == Some(PermissionLevel::Admin)));
}

#[tokio::test]
async fn test_search_respects_access_and_text() {
    let harness = harness();
    let org = Uuid::new_v4();
    let owner = identity(org, Role::Member);
    let caller = identity(org, Role::Member);

    let (granted, _) = harness
        .service
        .create(&owner, None, create_request("quarterly planning"))
        .await
        .unwrap();
    harness
        .service
        .create(&owner, None, create_request("quarterly budget"))
        .await
        .unwrap();

    harness
        .service
        .share(
            &owner,
            None,
            granted.id,
            ShareMemoryRequest {
                grantee_id: caller.user_id,
                grantee_type: GranteeType::User,
                permission_level: PermissionLevel::Viewer,
            },
        )
        .await
        .unwrap();

    let results = harness
        .service
        .search(
            &caller,
            SearchMemoriesRequest {
                query: "quarterly".to_string(),
                limit: 10,
                memory_type: None,
                tags: None,
                include_public: false,
            },
        )
        .await
        .unwrap();

    // Only the granted memory matches despite both containing the text
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].0.id, granted.id);
}

#[tokio::test]
async fn test_delete_cascades_grants() {
    let harness = harness();
    let org = Uuid::new_v4();
    let owner = identity(org, Role::Member);
    let other = identity(org, Role::Member);

    let (memory, _) = harness
        .service
        .create(&owner, None, create_request("ephemeral"))
        .await
        .unwrap();
    harness
        .service
        .share(
            &owner,
            None,
            memory.id,
            ShareMemoryRequest {
                grantee_id: other.user_id,
                grantee_type: GranteeType::User,
                permission_level: PermissionLevel::Admin,
            },
        )
        .await
        .unwrap();

    harness.service.delete(&owner, None, memory.id).await.unwrap();

    // The document is gone, and so is every grant: even the former
    // admin-level grantee gets NotFound rather than a stale grant path.
    let result = harness.service.get(&other, memory.id).await;
    assert!(matches!(result, Err(ApiError::NotFound { .. })));

    let (visible, total) = harness
        .service
        .list(
            &other,
            ListMemoriesInput {
                limit: 10,
                offset: 0,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(total, 0);
    assert!(visible.is_empty());
}

#[tokio::test]
async fn test_update_applies_partial_changes() {
    let harness = harness();
    let org = Uuid::new_v4();
    let owner = identity(org, Role::Member);

    let (memory, _) = harness
        .service
        .create(&owner, None, create_request("draft"))
        .await
        .unwrap();

    let update = UpdateMemoryRequest {
        title: Some("final".to_string()),
        is_public: Some(true),
        ..Default::default()
    };
    let (updated, level) = harness
        .service
        .update(&owner, None, memory.id, update)
        .await
        .unwrap();

    assert_eq!(updated.title, "final");
    assert!(updated.is_public);
    // Untouched fields survive
    assert_eq!(updated.content, memory.content);
    assert_eq!(level, Some(PermissionLevel::Admin));
    assert!(updated.updated_at >= memory.updated_at);
}

#[tokio::test]
async fn test_check_access_reports_without_erroring() {
    let harness = harness();
    let org = Uuid::new_v4();
    let owner = identity(org, Role::Member);
    let stranger = identity(org, Role::Member);

    let (memory, _) = harness
        .service
        .create(&owner, None, create_request("doc"))
        .await
        .unwrap();

    assert!(harness
        .service
        .check_access(&owner, "memory", memory.id, PermissionLevel::Admin)
        .await
        .unwrap());
    assert!(!harness
        .service
        .check_access(&stranger, "memory", memory.id, PermissionLevel::Viewer)
        .await
        .unwrap());
}
