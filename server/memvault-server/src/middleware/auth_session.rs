//! Authentication session extraction
//!
//! `AuthSession` resolves the `Authorization: Bearer` header into a
//! verified [`IdentityContext`] via the server's context resolver, so
//! handlers never touch raw tokens.

use crate::error::ApiError;
use crate::server::MemVaultServer;
use async_trait::async_trait;
use auth_identity::IdentityContext;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts};

/// Authenticated session extracted from the request.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub identity: IdentityContext,
    /// Client address as reported by the nearest proxy, when present.
    pub client_addr: Option<String>,
}

impl AuthSession {
    /// The caller's organization id; all memory routes require one.
    pub fn require_organization(&self) -> Result<uuid::Uuid, ApiError> {
        self.identity
            .organization_id
            .ok_or_else(|| ApiError::authorization("Organization membership required"))
    }
}

/// Extract and validate the bearer token from the Authorization header
fn extract_token(parts: &Parts) -> Result<String, ApiError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::authentication("Missing Authorization header"))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| {
            ApiError::authentication("Invalid Authorization header format. Expected: Bearer <token>")
        })
        .map(|s| s.to_string())
}

fn extract_client_addr(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|addr| addr.trim().to_string())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthSession
where
    MemVaultServer: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let server = MemVaultServer::from_ref(state);

        let token = extract_token(parts)?;
        let identity = server.resolver.resolve(&token).await?;

        Ok(AuthSession {
            identity,
            client_addr: extract_client_addr(parts),
        })
    }
}
