use crate::{entry::AuditEntry, error::Result};
use async_trait::async_trait;
use std::sync::Mutex;

pub mod postgres;

pub use postgres::PostgresAuditSink;

/// Storage boundary for audit entries.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append one entry to the trail.
    async fn append(&self, entry: AuditEntry) -> Result<()>;
}

/// In-memory audit sink for testing and development.
pub struct InMemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of all recorded entries.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryAuditSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn append(&self, entry: AuditEntry) -> Result<()> {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
        Ok(())
    }
}
