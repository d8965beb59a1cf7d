use crate::error::{IdentityError, Result};
use serde::{Deserialize, Serialize};

/// Connection settings for the external identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Base URL of the identity service (e.g. `https://id.example.com`).
    pub service_url: String,
    /// Public API key sent with every request.
    pub anon_key: String,
    /// Privileged key used for profile lookups; falls back to `anon_key`
    /// when unset.
    pub service_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl IdentityConfig {
    /// Load configuration from `MEMVAULT_IDENTITY_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let service_url = std::env::var("MEMVAULT_IDENTITY_URL").map_err(|_| {
            IdentityError::Configuration("MEMVAULT_IDENTITY_URL is not set".to_string())
        })?;
        let anon_key = std::env::var("MEMVAULT_IDENTITY_ANON_KEY").map_err(|_| {
            IdentityError::Configuration("MEMVAULT_IDENTITY_ANON_KEY is not set".to_string())
        })?;
        let service_key = std::env::var("MEMVAULT_IDENTITY_SERVICE_KEY").ok();

        Ok(Self {
            service_url: service_url.trim_end_matches('/').to_string(),
            anon_key,
            service_key,
            timeout_seconds: 10,
        })
    }

    /// Key used for privileged profile lookups.
    pub fn lookup_key(&self) -> &str {
        self.service_key.as_deref().unwrap_or(&self.anon_key)
    }
}
