//! Document storage boundary
//!
//! The production document index is an external vendor system; this
//! module owns the trait the facade talks to and an in-memory
//! implementation used for tests and development.

pub mod filter;
pub mod memory_store;

pub use filter::{Condition, DocumentQuery};
pub use memory_store::InMemoryDocumentStore;

use crate::models::Memory;
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Document storage error: {0}")]
    Backend(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage boundary for memory documents.
///
/// Reads are organization-scoped at the interface level: a fetch never
/// returns a document from another organization.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store a new document.
    async fn insert(&self, memory: Memory) -> StorageResult<()>;

    /// Fetch a document by id within an organization.
    async fn fetch(&self, organization_id: Uuid, id: Uuid) -> StorageResult<Option<Memory>>;

    /// Replace a stored document.
    async fn update(&self, memory: Memory) -> StorageResult<()>;

    /// Remove a document. Returns whether a document was removed.
    async fn remove(&self, organization_id: Uuid, id: Uuid) -> StorageResult<bool>;

    /// Query documents matching a typed filter, newest first, windowed
    /// by the query's limit/offset.
    async fn query(&self, query: &DocumentQuery) -> StorageResult<Vec<Memory>>;

    /// Count documents matching a typed filter, ignoring the window.
    async fn count(&self, query: &DocumentQuery) -> StorageResult<u64>;
}
