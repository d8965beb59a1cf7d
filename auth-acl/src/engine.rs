use crate::{
    error::{AclError, Result},
    models::{GrantKey, GranteeType, PermissionLevel, ResourceGrant, ResourceRef},
    repository::GrantStore,
};
use auth_identity::IdentityContext;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Core ACL permission engine.
///
/// Stateless per call: every decision is evaluated against the current
/// grant rows owned by the [`GrantStore`]. Denial is an error
/// ([`AclError::Forbidden`]), never a silent `false`, so callers cannot
/// accidentally ignore it.
pub struct PermissionEngine {
    grants: Arc<dyn GrantStore>,
}

impl PermissionEngine {
    /// Create a new permission engine over the given grant store.
    pub fn new(grants: Arc<dyn GrantStore>) -> Self {
        Self { grants }
    }

    // =========================================================================
    // Authorization
    // =========================================================================

    /// Check that `identity` holds at least `required` on `resource`.
    ///
    /// Ordered, short-circuiting on the first satisfying match:
    /// 1. Admin roles have blanket access within their own organization.
    /// 2. Direct user grant.
    /// 3. Organizational-unit grant, when the identity carries a unit.
    /// 4. Deny.
    pub async fn authorize(
        &self,
        identity: &IdentityContext,
        resource: &ResourceRef,
        required: PermissionLevel,
    ) -> Result<()> {
        // Admin bypass is gated on the admin's own organization matching
        // the resource's organization; cross-organization access is never
        // permitted, not even for admins.
        if identity.is_admin() && identity.organization_id == Some(resource.organization_id) {
            debug!(user_id = %identity.user_id, %resource, "Allowed via admin role");
            return Ok(());
        }

        let user_key = GrantKey::new(
            resource.resource_id,
            &resource.resource_type,
            identity.user_id,
            GranteeType::User,
        );
        if let Some(grant) = self.grants.find_grant(&user_key).await? {
            if grant.permission_level.satisfies(required) {
                debug!(user_id = %identity.user_id, %resource, level = %grant.permission_level,
                       "Allowed via direct grant");
                return Ok(());
            }
        }

        if let Some(unit_id) = identity.organizational_unit_id {
            let unit_key = GrantKey::new(
                resource.resource_id,
                &resource.resource_type,
                unit_id,
                GranteeType::OrganizationalUnit,
            );
            if let Some(grant) = self.grants.find_grant(&unit_key).await? {
                if grant.permission_level.satisfies(required) {
                    debug!(user_id = %identity.user_id, %resource, level = %grant.permission_level,
                           "Allowed via organizational unit grant");
                    return Ok(());
                }
            }
        }

        debug!(user_id = %identity.user_id, %resource, %required, "Denied");
        Err(AclError::forbidden(&resource.resource_type, required))
    }

    /// Resource ids visible to a non-admin caller for list/search
    /// filtering.
    ///
    /// Returns `None` for admins (unrestricted within their
    /// organization); otherwise the union of ids granted directly to the
    /// user and, when set, to the user's organizational unit.
    pub async fn accessible_resource_ids(
        &self,
        identity: &IdentityContext,
        resource_type: &str,
    ) -> Result<Option<HashSet<Uuid>>> {
        let organization_id = identity
            .organization_id
            .ok_or(AclError::OrganizationRequired)?;

        if identity.is_admin() {
            return Ok(None);
        }

        let mut grantee_ids = vec![identity.user_id];
        if let Some(unit_id) = identity.organizational_unit_id {
            grantee_ids.push(unit_id);
        }

        let ids = self
            .grants
            .list_accessible_resource_ids(organization_id, resource_type, &grantee_ids)
            .await?;

        Ok(Some(ids))
    }

    // =========================================================================
    // Grant management
    // =========================================================================

    /// Share a resource with a grantee at a permission level.
    ///
    /// Requires the caller to hold admin-level authorization on the
    /// resource. Upsert semantics: an existing grant under the same key
    /// has its level, granter, and timestamp updated in place.
    pub async fn share(
        &self,
        identity: &IdentityContext,
        resource: &ResourceRef,
        grantee_id: Uuid,
        grantee_type: GranteeType,
        level: PermissionLevel,
    ) -> Result<ResourceGrant> {
        self.authorize(identity, resource, PermissionLevel::Admin)
            .await?;

        let grant = ResourceGrant::new(
            resource.organization_id,
            resource.resource_id,
            &resource.resource_type,
            grantee_id,
            grantee_type,
            level,
            identity.user_id,
        );

        info!(%resource, %grantee_id, %grantee_type, %level, "Sharing resource");
        self.grants.upsert_grant(grant.clone()).await?;

        Ok(grant)
    }

    /// Revoke a grantee's access to a resource.
    ///
    /// Requires caller admin-level authorization. No-op success when no
    /// matching grant exists; the end state is the same either way.
    pub async fn revoke(
        &self,
        identity: &IdentityContext,
        resource: &ResourceRef,
        grantee_id: Uuid,
        grantee_type: GranteeType,
    ) -> Result<()> {
        self.authorize(identity, resource, PermissionLevel::Admin)
            .await?;

        let key = GrantKey::new(
            resource.resource_id,
            &resource.resource_type,
            grantee_id,
            grantee_type,
        );

        info!(%resource, %grantee_id, %grantee_type, "Revoking access");
        self.grants.delete_grant(&key).await
    }

    /// Synthesize the creator's implicit admin grant at resource creation
    /// time. No authorization check: creation itself is the grant source.
    pub async fn grant_creator(
        &self,
        resource: &ResourceRef,
        creator_id: Uuid,
    ) -> Result<ResourceGrant> {
        let grant = ResourceGrant::new(
            resource.organization_id,
            resource.resource_id,
            &resource.resource_type,
            creator_id,
            GranteeType::User,
            PermissionLevel::Admin,
            creator_id,
        );

        debug!(%resource, %creator_id, "Granting creator admin access");
        self.grants.upsert_grant(grant.clone()).await?;

        Ok(grant)
    }

    /// Remove every grant referencing a resource. Called when the
    /// resource itself is deleted.
    pub async fn revoke_all(&self, resource: &ResourceRef) -> Result<()> {
        info!(%resource, "Removing all grants for resource");
        self.grants
            .delete_all_for_resource(resource.resource_id, &resource.resource_type)
            .await
    }

    /// The caller's effective level on a resource, when granted
    /// explicitly or implied by an admin role.
    pub async fn effective_level(
        &self,
        identity: &IdentityContext,
        resource: &ResourceRef,
    ) -> Result<Option<PermissionLevel>> {
        if identity.is_admin() && identity.organization_id == Some(resource.organization_id) {
            return Ok(Some(PermissionLevel::Admin));
        }

        let user_key = GrantKey::new(
            resource.resource_id,
            &resource.resource_type,
            identity.user_id,
            GranteeType::User,
        );
        let direct = self
            .grants
            .find_grant(&user_key)
            .await?
            .map(|g| g.permission_level);

        let via_unit = match identity.organizational_unit_id {
            Some(unit_id) => {
                let unit_key = GrantKey::new(
                    resource.resource_id,
                    &resource.resource_type,
                    unit_id,
                    GranteeType::OrganizationalUnit,
                );
                self.grants
                    .find_grant(&unit_key)
                    .await?
                    .map(|g| g.permission_level)
            }
            None => None,
        };

        Ok(direct.max(via_unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryGrantStore;
    use auth_identity::{Profile, Role, TokenSubject};

    fn identity(org: Uuid, unit: Option<Uuid>, role: Role) -> IdentityContext {
        IdentityContext::from_parts(
            TokenSubject {
                subject_id: Uuid::new_v4(),
                email: "user@example.com".to_string(),
            },
            Profile {
                organization_id: Some(org),
                organizational_unit_id: unit,
                role,
                display_name: None,
            },
        )
    }

    fn engine() -> PermissionEngine {
        PermissionEngine::new(Arc::new(InMemoryGrantStore::new()))
    }

    #[tokio::test]
    async fn test_no_grant_is_denied() {
        let engine = engine();
        let org = Uuid::new_v4();
        let member = identity(org, None, Role::Member);
        let resource = ResourceRef::new("memory", Uuid::new_v4(), org);

        let result = engine
            .authorize(&member, &resource, PermissionLevel::Viewer)
            .await;
        assert!(matches!(result, Err(AclError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_admin_bypass_within_org() {
        let engine = engine();
        let org = Uuid::new_v4();
        let admin = identity(org, None, Role::OrgAdmin);
        let resource = ResourceRef::new("memory", Uuid::new_v4(), org);

        for level in [
            PermissionLevel::Viewer,
            PermissionLevel::Editor,
            PermissionLevel::Admin,
        ] {
            engine.authorize(&admin, &resource, level).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_admin_of_other_org_is_denied() {
        let engine = engine();
        let admin = identity(Uuid::new_v4(), None, Role::OrgAdmin);
        let resource = ResourceRef::new("memory", Uuid::new_v4(), Uuid::new_v4());

        let result = engine
            .authorize(&admin, &resource, PermissionLevel::Viewer)
            .await;
        assert!(matches!(result, Err(AclError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_direct_grant_level_ordering() {
        let store = Arc::new(InMemoryGrantStore::new());
        let engine = PermissionEngine::new(store.clone());
        let org = Uuid::new_v4();
        let member = identity(org, None, Role::Member);
        let resource = ResourceRef::new("memory", Uuid::new_v4(), org);

        store
            .upsert_grant(ResourceGrant::new(
                org,
                resource.resource_id,
                "memory",
                member.user_id,
                GranteeType::User,
                PermissionLevel::Editor,
                member.user_id,
            ))
            .await
            .unwrap();

        engine
            .authorize(&member, &resource, PermissionLevel::Viewer)
            .await
            .unwrap();
        engine
            .authorize(&member, &resource, PermissionLevel::Editor)
            .await
            .unwrap();
        assert!(engine
            .authorize(&member, &resource, PermissionLevel::Admin)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_unit_grant_grants_access_when_direct_fails() {
        let store = Arc::new(InMemoryGrantStore::new());
        let engine = PermissionEngine::new(store.clone());
        let org = Uuid::new_v4();
        let unit = Uuid::new_v4();
        let member = identity(org, Some(unit), Role::Member);
        let resource = ResourceRef::new("memory", Uuid::new_v4(), org);

        // Direct grant too weak, unit grant strong enough
        store
            .upsert_grant(ResourceGrant::new(
                org,
                resource.resource_id,
                "memory",
                member.user_id,
                GranteeType::User,
                PermissionLevel::Viewer,
                member.user_id,
            ))
            .await
            .unwrap();
        store
            .upsert_grant(ResourceGrant::new(
                org,
                resource.resource_id,
                "memory",
                unit,
                GranteeType::OrganizationalUnit,
                PermissionLevel::Editor,
                member.user_id,
            ))
            .await
            .unwrap();

        engine
            .authorize(&member, &resource, PermissionLevel::Editor)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_effective_level_is_max_of_paths() {
        let store = Arc::new(InMemoryGrantStore::new());
        let engine = PermissionEngine::new(store.clone());
        let org = Uuid::new_v4();
        let unit = Uuid::new_v4();
        let member = identity(org, Some(unit), Role::Member);
        let resource = ResourceRef::new("memory", Uuid::new_v4(), org);

        assert_eq!(engine.effective_level(&member, &resource).await.unwrap(), None);

        store
            .upsert_grant(ResourceGrant::new(
                org,
                resource.resource_id,
                "memory",
                member.user_id,
                GranteeType::User,
                PermissionLevel::Viewer,
                member.user_id,
            ))
            .await
            .unwrap();
        store
            .upsert_grant(ResourceGrant::new(
                org,
                resource.resource_id,
                "memory",
                unit,
                GranteeType::OrganizationalUnit,
                PermissionLevel::Editor,
                member.user_id,
            ))
            .await
            .unwrap();

        assert_eq!(
            engine.effective_level(&member, &resource).await.unwrap(),
            Some(PermissionLevel::Editor)
        );
    }

    #[tokio::test]
    async fn test_share_requires_admin_on_resource() {
        let engine = engine();
        let org = Uuid::new_v4();
        let member = identity(org, None, Role::Member);
        let resource = ResourceRef::new("memory", Uuid::new_v4(), org);

        let result = engine
            .share(
                &member,
                &resource,
                Uuid::new_v4(),
                GranteeType::User,
                PermissionLevel::Viewer,
            )
            .await;
        assert!(matches!(result, Err(AclError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_accessible_ids_none_for_admin() {
        let engine = engine();
        let org = Uuid::new_v4();
        let admin = identity(org, None, Role::OrgAdmin);

        let ids = engine.accessible_resource_ids(&admin, "memory").await.unwrap();
        assert!(ids.is_none());
    }

    #[tokio::test]
    async fn test_accessible_ids_requires_organization() {
        let engine = engine();
        let mut member = identity(Uuid::new_v4(), None, Role::Member);
        member.organization_id = None;

        let result = engine.accessible_resource_ids(&member, "memory").await;
        assert!(matches!(result, Err(AclError::OrganizationRequired)));
    }
}
