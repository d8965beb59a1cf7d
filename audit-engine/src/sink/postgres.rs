//! PostgreSQL-backed audit sink
//!
//! Appends entries to an `audit_logs` table. The trail is append-only;
//! nothing in this crate updates or deletes rows.

use crate::{
    entry::AuditEntry,
    error::{AuditError, Result},
    sink::AuditSink,
};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

/// PostgreSQL-backed audit sink.
pub struct PostgresAuditSink {
    pool: PgPool,
}

impl PostgresAuditSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PostgresAuditSink {
    async fn append(&self, entry: AuditEntry) -> Result<()> {
        debug!(action = %entry.action, "Appending audit entry");

        sqlx::query(
            r#"
            INSERT INTO audit_logs (
                id, organization_id, user_id, action,
                resource_type, resource_id, details, ip_address, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(entry.id)
        .bind(entry.organization_id)
        .bind(entry.user_id)
        .bind(&entry.action)
        .bind(&entry.resource_type)
        .bind(entry.resource_id)
        .bind(&entry.details)
        .bind(&entry.ip_address)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AuditError::Storage(format!("Failed to append audit entry: {}", e)))?;

        Ok(())
    }
}
