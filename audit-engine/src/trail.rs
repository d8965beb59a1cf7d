use crate::{entry::AuditEntry, sink::AuditSink};
use std::sync::Arc;
use tracing::warn;

/// Fire-and-forget wrapper around an [`AuditSink`].
///
/// The primary operation has already committed by the time `record` is
/// called; an append failure must never propagate back, so it is logged
/// and dropped here.
pub struct AuditTrail {
    sink: Arc<dyn AuditSink>,
}

impl AuditTrail {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Append an entry, best-effort.
    pub async fn record(&self, entry: AuditEntry) {
        let action = entry.action.clone();
        if let Err(e) = self.sink.append(entry).await {
            warn!(action = %action, error = %e, "Failed to append audit entry");
        }
    }
}
