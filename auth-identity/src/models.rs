use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Role of a user within their organization.
///
/// Admin roles (`org_admin`, `super_admin`) bypass explicit grant checks
/// in the permission engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Member,
    OrgAdmin,
    SuperAdmin,
}

impl Role {
    /// Check if this role carries admin privileges (org_admin or super_admin).
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::OrgAdmin | Role::SuperAdmin)
    }

    /// Check if this role is super admin.
    pub fn is_super_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::OrgAdmin => "org_admin",
            Role::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Verified token subject returned by the identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSubject {
    pub subject_id: Uuid,
    pub email: String,
}

/// Profile record for a verified subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub organization_id: Option<Uuid>,
    pub organizational_unit_id: Option<Uuid>,
    #[serde(default)]
    pub role: Role,
    pub display_name: Option<String>,
}

/// Authenticated request identity with organization context.
///
/// Built once per request by the [`crate::ContextResolver`] and treated as
/// immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityContext {
    pub user_id: Uuid,
    pub email: String,
    pub organization_id: Option<Uuid>,
    pub organizational_unit_id: Option<Uuid>,
    pub role: Role,
    pub display_name: Option<String>,
}

impl IdentityContext {
    /// Combine a verified token subject with its profile record.
    pub fn from_parts(subject: TokenSubject, profile: Profile) -> Self {
        Self {
            user_id: subject.subject_id,
            email: subject.email,
            organization_id: profile.organization_id,
            organizational_unit_id: profile.organizational_unit_id,
            role: profile.role,
            display_name: profile.display_name,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }

    /// Display name when set, otherwise the account email.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_admin_flags() {
        assert!(!Role::Member.is_admin());
        assert!(Role::OrgAdmin.is_admin());
        assert!(Role::SuperAdmin.is_admin());
        assert!(!Role::OrgAdmin.is_super_admin());
        assert!(Role::SuperAdmin.is_super_admin());
    }

    #[test]
    fn test_role_serde_snake_case() {
        let role: Role = serde_json::from_str("\"org_admin\"").unwrap();
        assert_eq!(role, Role::OrgAdmin);
        assert_eq!(serde_json::to_string(&Role::SuperAdmin).unwrap(), "\"super_admin\"");
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        // Fail closed: an unrecognized role label never deserializes.
        assert!(serde_json::from_str::<Role>("\"owner\"").is_err());
    }

    #[test]
    fn test_context_label_falls_back_to_email() {
        let ctx = IdentityContext::from_parts(
            TokenSubject {
                subject_id: Uuid::new_v4(),
                email: "alice@example.com".to_string(),
            },
            Profile {
                organization_id: None,
                organizational_unit_id: None,
                role: Role::Member,
                display_name: None,
            },
        );
        assert_eq!(ctx.label(), "alice@example.com");
    }
}
