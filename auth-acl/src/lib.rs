//! Resource-grant ACL engine for MemVault Engine
//!
//! This module implements per-resource access control:
//! - Permission levels with a strict ordering (viewer < editor < admin)
//! - Grants issued to users, organizational units, or whole organizations
//! - Short-circuiting authorization checks with an admin bypass
//! - Upsert-based sharing and idempotent revocation
//! - Accessible-resource-id sets for list/search filtering
//!
//! # Core Concepts
//!
//! - **Resource**: anything with a type tag and a UUID, owned by an
//!   organization (e.g. a memory record)
//! - **Grantee**: the entity a permission is issued to
//! - **Grant**: a row binding a grantee to a resource at a permission level
//!
//! # Example
//!
//! ```rust,no_run
//! use auth_acl::{PermissionEngine, PermissionLevel, ResourceRef};
//! use auth_acl::repository::InMemoryGrantStore;
//! use std::sync::Arc;
//!
//! # async fn example(identity: auth_identity::IdentityContext) -> Result<(), auth_acl::AclError> {
//! let engine = PermissionEngine::new(Arc::new(InMemoryGrantStore::new()));
//!
//! let resource = ResourceRef::new("memory", uuid::Uuid::new_v4(), uuid::Uuid::new_v4());
//! engine.authorize(&identity, &resource, PermissionLevel::Viewer).await?;
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod models;
pub mod repository;

pub use engine::*;
pub use error::*;
pub use models::*;
