//! The audit-sink port.
//!
//! Every executed search appends exactly one [`SearchAuditRecord`]; the sink
//! owns entries after the write and never hands back mutable access.

use crate::models::audit::SearchAuditRecord;
use crate::store::StoreResult;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Append-only sink for search audit entries.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append one entry.
    async fn record(&self, entry: SearchAuditRecord) -> StoreResult<()>;
}

/// In-memory audit sink, for tests and single-process deployments.
#[derive(Clone, Default)]
pub struct MemoryAuditSink {
    entries: Arc<Mutex<Vec<SearchAuditRecord>>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded entries.
    pub fn entries(&self) -> Vec<SearchAuditRecord> {
        self.entries.lock().clone()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, entry: SearchAuditRecord) -> StoreResult<()> {
        self.entries.lock().push(entry);
        Ok(())
    }
}

/// Sink that drops entries after emitting a tracing event. Useful when the
/// audit table lives in an external system wired up elsewhere.
#[derive(Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, entry: SearchAuditRecord) -> StoreResult<()> {
        tracing::info!(
            query = %entry.query_string,
            requester = %entry.requester_id,
            execution_time_ms = entry.execution_time_ms,
            result_count = entry.result_count,
            cache_status = %entry.cache_status,
            "search executed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::audit::CacheStatus;

    #[tokio::test]
    async fn test_memory_sink_appends() {
        let sink = MemoryAuditSink::new();
        sink.record(SearchAuditRecord::new(
            "level:error",
            Some("u-1"),
            5,
            3,
            CacheStatus::Miss,
        ))
        .await
        .unwrap();

        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].requester_id, "u-1");
    }
}
