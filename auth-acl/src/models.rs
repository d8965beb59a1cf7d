use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Ordinal permission tier controlling which operations a grantee may
/// perform on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    Viewer,
    Editor,
    Admin,
}

impl PermissionLevel {
    /// Numeric rank; higher subsumes lower.
    pub fn rank(&self) -> u8 {
        match self {
            PermissionLevel::Viewer => 1,
            PermissionLevel::Editor => 2,
            PermissionLevel::Admin => 3,
        }
    }

    /// A granted level satisfies a requirement when its rank is at least
    /// the required rank.
    pub fn satisfies(&self, required: PermissionLevel) -> bool {
        self.rank() >= required.rank()
    }

    /// Parse a stored level label. Unknown labels yield `None` and never
    /// satisfy any requirement.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "viewer" => Some(PermissionLevel::Viewer),
            "editor" => Some(PermissionLevel::Editor),
            "admin" => Some(PermissionLevel::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionLevel::Viewer => "viewer",
            PermissionLevel::Editor => "editor",
            PermissionLevel::Admin => "admin",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kind of entity a permission is issued to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GranteeType {
    User,
    OrganizationalUnit,
    Organization,
}

impl GranteeType {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "user" => Some(GranteeType::User),
            "organizational_unit" => Some(GranteeType::OrganizationalUnit),
            "organization" => Some(GranteeType::Organization),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GranteeType::User => "user",
            GranteeType::OrganizationalUnit => "organizational_unit",
            GranteeType::Organization => "organization",
        }
    }
}

impl fmt::Display for GranteeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity of a grant row: at most one grant exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrantKey {
    pub resource_id: Uuid,
    pub resource_type: String,
    pub grantee_id: Uuid,
    pub grantee_type: GranteeType,
}

impl GrantKey {
    pub fn new(
        resource_id: Uuid,
        resource_type: &str,
        grantee_id: Uuid,
        grantee_type: GranteeType,
    ) -> Self {
        Self {
            resource_id,
            resource_type: resource_type.to_string(),
            grantee_id,
            grantee_type,
        }
    }
}

impl fmt::Display for GrantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}#{}:{}",
            self.resource_type, self.resource_id, self.grantee_type, self.grantee_id
        )
    }
}

/// A permission grant binding a grantee to a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceGrant {
    pub organization_id: Uuid,
    pub resource_id: Uuid,
    pub resource_type: String,
    pub grantee_id: Uuid,
    pub grantee_type: GranteeType,
    pub permission_level: PermissionLevel,
    pub granted_by: Uuid,
    pub granted_at: DateTime<Utc>,
}

impl ResourceGrant {
    pub fn new(
        organization_id: Uuid,
        resource_id: Uuid,
        resource_type: &str,
        grantee_id: Uuid,
        grantee_type: GranteeType,
        permission_level: PermissionLevel,
        granted_by: Uuid,
    ) -> Self {
        Self {
            organization_id,
            resource_id,
            resource_type: resource_type.to_string(),
            grantee_id,
            grantee_type,
            permission_level,
            granted_by,
            granted_at: Utc::now(),
        }
    }

    /// The lookup key this grant is stored under.
    pub fn key(&self) -> GrantKey {
        GrantKey::new(
            self.resource_id,
            &self.resource_type,
            self.grantee_id,
            self.grantee_type,
        )
    }
}

impl fmt::Display for ResourceGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.key(), self.permission_level)
    }
}

/// A resource as seen by the permission engine: type tag, id, and the
/// organization that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    pub resource_type: String,
    pub resource_id: Uuid,
    pub organization_id: Uuid,
}

impl ResourceRef {
    pub fn new(resource_type: &str, resource_id: Uuid, organization_id: Uuid) -> Self {
        Self {
            resource_type: resource_type.to_string(),
            resource_id,
            organization_id,
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.resource_id)
    }
}
