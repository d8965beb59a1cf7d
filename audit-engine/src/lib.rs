//! Audit trail for MemVault Engine
//!
//! Append-only audit logging of authenticated actions:
//! - One `AuditEntry` per state-changing operation
//! - Pluggable sinks (in-memory, PostgreSQL)
//! - Best-effort writes: a failed append is logged and swallowed, never
//!   surfaced to the operation that triggered it
//!
//! # Example
//!
//! ```rust
//! use audit_engine::{AuditEntry, AuditTrail, sink::InMemoryAuditSink};
//! use std::sync::Arc;
//! use uuid::Uuid;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let trail = AuditTrail::new(Arc::new(InMemoryAuditSink::new()));
//!
//! let entry = AuditEntry::new(Uuid::new_v4(), Uuid::new_v4(), "memory_created")
//!     .with_resource("memory", Uuid::new_v4());
//! trail.record(entry).await;
//! # }
//! ```

pub mod entry;
pub mod error;
pub mod sink;
pub mod trail;

pub use entry::*;
pub use error::*;
pub use trail::*;
