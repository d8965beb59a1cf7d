use crate::{
    config::IdentityConfig,
    error::{IdentityError, Result},
    models::{Profile, TokenSubject},
};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;
use tracing::{debug, error};
use uuid::Uuid;

/// Boundary to the external identity service.
///
/// Verification and profile storage live in the external service; this
/// trait is the only surface the rest of the engine sees.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify a bearer token and return the subject it belongs to.
    async fn verify_token(&self, token: &str) -> Result<TokenSubject>;

    /// Fetch the profile record for a verified subject, if one exists.
    async fn fetch_profile(&self, subject_id: Uuid) -> Result<Option<Profile>>;
}

/// In-memory identity provider for testing and development.
pub struct InMemoryIdentityProvider {
    tokens: DashMap<String, TokenSubject>,
    profiles: DashMap<Uuid, Profile>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self {
            tokens: DashMap::new(),
            profiles: DashMap::new(),
        }
    }

    /// Register a token for a subject.
    pub fn register_token(&self, token: &str, subject: TokenSubject) {
        self.tokens.insert(token.to_string(), subject);
    }

    /// Register a profile for a subject id.
    pub fn register_profile(&self, subject_id: Uuid, profile: Profile) {
        self.profiles.insert(subject_id, profile);
    }

    /// Register a complete account (token + profile) in one call.
    pub fn register_account(&self, token: &str, subject: TokenSubject, profile: Profile) {
        self.profiles.insert(subject.subject_id, profile);
        self.tokens.insert(token.to_string(), subject);
    }
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<TokenSubject> {
        self.tokens
            .get(token)
            .map(|entry| entry.value().clone())
            .ok_or(IdentityError::InvalidToken)
    }

    async fn fetch_profile(&self, subject_id: Uuid) -> Result<Option<Profile>> {
        Ok(self.profiles.get(&subject_id).map(|entry| entry.value().clone()))
    }
}

/// HTTP-backed identity provider talking to the managed identity service.
pub struct HttpIdentityProvider {
    http: reqwest::Client,
    config: IdentityConfig,
}

/// User payload returned by the identity service's token endpoint.
#[derive(Debug, Deserialize)]
struct VerifiedUser {
    id: Uuid,
    email: String,
}

impl HttpIdentityProvider {
    pub fn new(config: IdentityConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| IdentityError::Provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<TokenSubject> {
        let url = format!("{}/auth/v1/user", self.config.service_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header("apikey", &self.config.anon_key)
            .send()
            .await
            .map_err(|e| {
                error!("Token verification request failed: {}", e);
                IdentityError::Provider(format!("Identity service unreachable: {}", e))
            })?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::FORBIDDEN
        {
            return Err(IdentityError::InvalidToken);
        }

        if !response.status().is_success() {
            return Err(IdentityError::Provider(format!(
                "Identity service returned {}",
                response.status()
            )));
        }

        let user: VerifiedUser = response
            .json()
            .await
            .map_err(|e| IdentityError::Provider(format!("Malformed user payload: {}", e)))?;

        debug!(subject_id = %user.id, "Token verified");

        Ok(TokenSubject {
            subject_id: user.id,
            email: user.email,
        })
    }

    async fn fetch_profile(&self, subject_id: Uuid) -> Result<Option<Profile>> {
        let url = format!(
            "{}/rest/v1/profiles?id=eq.{}&select=organization_id,organizational_unit_id,role,display_name",
            self.config.service_url, subject_id
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.config.lookup_key())
            .header("apikey", self.config.lookup_key())
            .send()
            .await
            .map_err(|e| {
                error!("Profile lookup request failed: {}", e);
                IdentityError::Provider(format!("Identity service unreachable: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(IdentityError::Provider(format!(
                "Profile lookup returned {}",
                response.status()
            )));
        }

        let mut rows: Vec<Profile> = response
            .json()
            .await
            .map_err(|e| IdentityError::Provider(format!("Malformed profile payload: {}", e)))?;

        Ok(if rows.is_empty() { None } else { Some(rows.remove(0)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[tokio::test]
    async fn test_in_memory_verify_and_fetch() {
        let provider = InMemoryIdentityProvider::new();
        let subject_id = Uuid::new_v4();

        provider.register_account(
            "token-1",
            TokenSubject {
                subject_id,
                email: "alice@example.com".to_string(),
            },
            Profile {
                organization_id: Some(Uuid::new_v4()),
                organizational_unit_id: None,
                role: Role::Member,
                display_name: Some("Alice".to_string()),
            },
        );

        let subject = provider.verify_token("token-1").await.unwrap();
        assert_eq!(subject.subject_id, subject_id);

        let profile = provider.fetch_profile(subject_id).await.unwrap();
        assert!(profile.is_some());
    }

    #[tokio::test]
    async fn test_in_memory_rejects_unknown_token() {
        let provider = InMemoryIdentityProvider::new();
        let result = provider.verify_token("nope").await;
        assert!(matches!(result, Err(IdentityError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_in_memory_profile_absent() {
        let provider = InMemoryIdentityProvider::new();
        let profile = provider.fetch_profile(Uuid::new_v4()).await.unwrap();
        assert!(profile.is_none());
    }
}
