//! Identity resolution module for MemVault Engine
//!
//! This module converts bearer credentials into a verified request
//! identity with organization context:
//! - Token verification against the external identity service
//! - Profile lookup (organization, organizational unit, role)
//! - Immutable per-request `IdentityContext`
//! - Role gates (organization membership, admin, super admin)
//!
//! # Example
//!
//! ```rust,no_run
//! use auth_identity::{ContextResolver, provider::InMemoryIdentityProvider};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Arc::new(InMemoryIdentityProvider::new());
//!     let resolver = ContextResolver::new(provider);
//!
//!     let identity = resolver.resolve("some-bearer-token").await?;
//!     let org_id = resolver.require_organization(&identity)?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod resolver;

pub use config::*;
pub use error::*;
pub use models::*;
pub use resolver::*;
