use anyhow::Result;
use audit_engine::{
    sink::{InMemoryAuditSink, PostgresAuditSink},
    AuditTrail,
};
use auth_acl::{
    repository::{GrantStore, InMemoryGrantStore, PostgresGrantStore},
    PermissionEngine,
};
use auth_identity::{
    provider::{HttpIdentityProvider, InMemoryIdentityProvider},
    ContextResolver, IdentityConfig,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::services::MemoryService;
use crate::storage::{DocumentStore, InMemoryDocumentStore};

/// Main MemVault server state
///
/// Every collaborator is constructed once at process start and shared
/// read-only; nothing here is a process-wide singleton.
#[derive(Clone)]
pub struct MemVaultServer {
    /// Server configuration
    pub config: ServerConfig,
    /// Bearer-token resolver
    pub resolver: Arc<ContextResolver>,
    /// Permission engine (shared with the memory facade)
    pub permissions: Arc<PermissionEngine>,
    /// Memory resource facade
    pub memories: Arc<MemoryService>,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server name
    pub name: String,
    /// Maximum concurrent connections
    pub max_connections: usize,
    /// Request timeout in seconds
    pub request_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "MemVault Engine".to_string(),
            max_connections: 1000,
            request_timeout: 30,
        }
    }
}

impl MemVaultServer {
    /// Assemble a server from explicitly constructed collaborators.
    pub fn new(
        config: ServerConfig,
        resolver: Arc<ContextResolver>,
        grants: Arc<dyn GrantStore>,
        documents: Arc<dyn DocumentStore>,
        audit: Arc<AuditTrail>,
    ) -> Self {
        let permissions = Arc::new(PermissionEngine::new(grants));
        let memories = Arc::new(MemoryService::new(
            permissions.clone(),
            documents,
            audit,
        ));

        Self {
            config,
            resolver,
            permissions,
            memories,
        }
    }

    /// Fully in-memory server for tests and local development.
    pub fn in_memory(resolver: Arc<ContextResolver>) -> Self {
        Self::new(
            ServerConfig::default(),
            resolver,
            Arc::new(InMemoryGrantStore::new()),
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(AuditTrail::new(Arc::new(InMemoryAuditSink::new()))),
        )
    }

    /// Build a server from the environment.
    ///
    /// Uses the HTTP identity provider when `MEMVAULT_IDENTITY_URL` is
    /// set and PostgreSQL-backed grant/audit stores when `DATABASE_URL`
    /// is set; otherwise falls back to in-memory collaborators suitable
    /// only for development.
    pub async fn from_env() -> Result<Self> {
        let resolver: Arc<ContextResolver> = match IdentityConfig::from_env() {
            Ok(identity_config) => {
                info!("Using HTTP identity provider at {}", identity_config.service_url);
                Arc::new(ContextResolver::new(Arc::new(HttpIdentityProvider::new(
                    identity_config,
                )?)))
            }
            Err(e) => {
                warn!("Identity service not configured ({}); using in-memory provider", e);
                Arc::new(ContextResolver::new(Arc::new(InMemoryIdentityProvider::new())))
            }
        };

        let (grants, audit): (Arc<dyn GrantStore>, Arc<AuditTrail>) =
            match std::env::var("DATABASE_URL") {
                Ok(database_url) => {
                    info!("Using PostgreSQL grant and audit stores");
                    let pool = sqlx::PgPool::connect(&database_url).await?;
                    (
                        Arc::new(PostgresGrantStore::new(pool.clone())),
                        Arc::new(AuditTrail::new(Arc::new(PostgresAuditSink::new(pool)))),
                    )
                }
                Err(_) => {
                    warn!("DATABASE_URL not set; using in-memory grant and audit stores");
                    (
                        Arc::new(InMemoryGrantStore::new()),
                        Arc::new(AuditTrail::new(Arc::new(InMemoryAuditSink::new()))),
                    )
                }
            };

        // The production document index is an external service; the
        // in-memory store stands in for it at this boundary.
        let documents: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());

        Ok(Self::new(
            ServerConfig::default(),
            resolver,
            grants,
            documents,
            audit,
        ))
    }

    /// Get server configuration
    pub fn get_config(&self) -> &ServerConfig {
        &self.config
    }
}
