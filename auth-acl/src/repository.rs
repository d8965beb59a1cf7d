use crate::{
    error::Result,
    models::{GrantKey, ResourceGrant},
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashSet;
use uuid::Uuid;

pub mod postgres;

pub use postgres::PostgresGrantStore;

/// Storage boundary for permission grants.
///
/// The engine only reads and writes grants through this interface; the
/// upsert must be an atomic conditional write in every implementation so
/// concurrent shares on the same key cannot produce duplicate rows.
#[async_trait]
pub trait GrantStore: Send + Sync {
    /// Look up the single grant stored under a key.
    async fn find_grant(&self, key: &GrantKey) -> Result<Option<ResourceGrant>>;

    /// Resource ids granted to any of the given grantees, for one
    /// resource type within one organization.
    async fn list_accessible_resource_ids(
        &self,
        organization_id: Uuid,
        resource_type: &str,
        grantee_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>>;

    /// Insert the grant, or update level/granter/timestamp when a grant
    /// already exists under the same key.
    async fn upsert_grant(&self, grant: ResourceGrant) -> Result<()>;

    /// Delete the grant under a key. Succeeds when no such grant exists.
    async fn delete_grant(&self, key: &GrantKey) -> Result<()>;

    /// Delete every grant referencing a resource (cascade on resource
    /// deletion).
    async fn delete_all_for_resource(&self, resource_id: Uuid, resource_type: &str) -> Result<()>;
}

/// In-memory grant store for testing and development.
pub struct InMemoryGrantStore {
    grants: DashMap<String, ResourceGrant>,
}

impl InMemoryGrantStore {
    pub fn new() -> Self {
        Self {
            grants: DashMap::new(),
        }
    }

    fn grant_key(key: &GrantKey) -> String {
        format!(
            "{}_{}_{}_{}",
            key.resource_type, key.resource_id, key.grantee_type, key.grantee_id
        )
    }

    /// Number of grants currently stored.
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

impl Default for InMemoryGrantStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GrantStore for InMemoryGrantStore {
    async fn find_grant(&self, key: &GrantKey) -> Result<Option<ResourceGrant>> {
        Ok(self
            .grants
            .get(&Self::grant_key(key))
            .map(|entry| entry.value().clone()))
    }

    async fn list_accessible_resource_ids(
        &self,
        organization_id: Uuid,
        resource_type: &str,
        grantee_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>> {
        let ids: HashSet<Uuid> = self
            .grants
            .iter()
            .filter(|entry| {
                let grant = entry.value();
                grant.organization_id == organization_id
                    && grant.resource_type == resource_type
                    && grantee_ids.contains(&grant.grantee_id)
            })
            .map(|entry| entry.value().resource_id)
            .collect();

        Ok(ids)
    }

    async fn upsert_grant(&self, grant: ResourceGrant) -> Result<()> {
        self.grants.insert(Self::grant_key(&grant.key()), grant);
        Ok(())
    }

    async fn delete_grant(&self, key: &GrantKey) -> Result<()> {
        self.grants.remove(&Self::grant_key(key));
        Ok(())
    }

    async fn delete_all_for_resource(&self, resource_id: Uuid, resource_type: &str) -> Result<()> {
        self.grants.retain(|_, grant| {
            !(grant.resource_id == resource_id && grant.resource_type == resource_type)
        });
        Ok(())
    }
}

// Exercised further by the engine integration tests.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GranteeType, PermissionLevel};

    fn grant(org: Uuid, resource: Uuid, grantee: Uuid, level: PermissionLevel) -> ResourceGrant {
        ResourceGrant::new(
            org,
            resource,
            "memory",
            grantee,
            GranteeType::User,
            level,
            grantee,
        )
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_grant() {
        let store = InMemoryGrantStore::new();
        let org = Uuid::new_v4();
        let resource = Uuid::new_v4();
        let user = Uuid::new_v4();

        store
            .upsert_grant(grant(org, resource, user, PermissionLevel::Viewer))
            .await
            .unwrap();
        store
            .upsert_grant(grant(org, resource, user, PermissionLevel::Editor))
            .await
            .unwrap();

        assert_eq!(store.len(), 1);

        let key = GrantKey::new(resource, "memory", user, GranteeType::User);
        let found = store.find_grant(&key).await.unwrap().unwrap();
        assert_eq!(found.permission_level, PermissionLevel::Editor);
    }

    #[tokio::test]
    async fn test_delete_grant_is_idempotent() {
        let store = InMemoryGrantStore::new();
        let key = GrantKey::new(Uuid::new_v4(), "memory", Uuid::new_v4(), GranteeType::User);

        // Deleting a grant that never existed is not an error.
        store.delete_grant(&key).await.unwrap();
        assert!(store.find_grant(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_all_for_resource() {
        let store = InMemoryGrantStore::new();
        let org = Uuid::new_v4();
        let resource = Uuid::new_v4();
        let other = Uuid::new_v4();

        for _ in 0..3 {
            store
                .upsert_grant(grant(org, resource, Uuid::new_v4(), PermissionLevel::Viewer))
                .await
                .unwrap();
        }
        store
            .upsert_grant(grant(org, other, Uuid::new_v4(), PermissionLevel::Viewer))
            .await
            .unwrap();

        store.delete_all_for_resource(resource, "memory").await.unwrap();

        assert_eq!(store.len(), 1);
        let remaining = store
            .list_accessible_resource_ids(org, "memory", &[])
            .await
            .unwrap();
        assert!(remaining.is_empty());
    }

    #[tokio::test]
    async fn test_accessible_ids_unions_grantees() {
        let store = InMemoryGrantStore::new();
        let org = Uuid::new_v4();
        let user = Uuid::new_v4();
        let unit = Uuid::new_v4();
        let r1 = Uuid::new_v4();
        let r2 = Uuid::new_v4();

        store
            .upsert_grant(grant(org, r1, user, PermissionLevel::Viewer))
            .await
            .unwrap();
        store
            .upsert_grant(ResourceGrant::new(
                org,
                r2,
                "memory",
                unit,
                GranteeType::OrganizationalUnit,
                PermissionLevel::Viewer,
                user,
            ))
            .await
            .unwrap();

        let ids = store
            .list_accessible_resource_ids(org, "memory", &[user, unit])
            .await
            .unwrap();
        assert_eq!(ids, HashSet::from([r1, r2]));

        let only_user = store
            .list_accessible_resource_ids(org, "memory", &[user])
            .await
            .unwrap();
        assert_eq!(only_user, HashSet::from([r1]));
    }
}
