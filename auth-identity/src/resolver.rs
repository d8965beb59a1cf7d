use crate::{
    error::{IdentityError, Result},
    models::IdentityContext,
    provider::IdentityProvider,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Resolves bearer credentials into an [`IdentityContext`].
///
/// Constructed once at process start and shared read-only; the provider
/// behind it owns all external-service state.
pub struct ContextResolver {
    provider: Arc<dyn IdentityProvider>,
}

impl ContextResolver {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Resolve a bearer token into a verified identity with organization
    /// context.
    ///
    /// Fails with an unauthorized-class error when the token is absent,
    /// rejected by the identity service, or no profile record exists for
    /// the verified subject.
    pub async fn resolve(&self, bearer_token: &str) -> Result<IdentityContext> {
        if bearer_token.trim().is_empty() {
            return Err(IdentityError::MissingCredentials);
        }

        let subject = self.provider.verify_token(bearer_token).await?;

        let profile = self
            .provider
            .fetch_profile(subject.subject_id)
            .await?
            .ok_or(IdentityError::ProfileNotFound)?;

        let identity = IdentityContext::from_parts(subject, profile);
        debug!(user_id = %identity.user_id, role = %identity.role, "Identity resolved");

        Ok(identity)
    }

    /// Require that the identity belongs to an organization.
    pub fn require_organization(&self, identity: &IdentityContext) -> Result<Uuid> {
        identity
            .organization_id
            .ok_or(IdentityError::OrganizationRequired)
    }

    /// Require admin privileges (org_admin or super_admin).
    pub fn require_admin(&self, identity: &IdentityContext) -> Result<()> {
        if identity.is_admin() {
            Ok(())
        } else {
            Err(IdentityError::AdminRequired)
        }
    }

    /// Require super admin privileges.
    pub fn require_super_admin(&self, identity: &IdentityContext) -> Result<()> {
        if identity.is_super_admin() {
            Ok(())
        } else {
            Err(IdentityError::SuperAdminRequired)
        }
    }
}
