use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

/// Whether a search was served from the result cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum CacheStatus {
    Hit,
    Miss,
}

/// Append-only audit entry, one per executed search.
///
/// Written once by the executor and never mutated; the audit sink owns the
/// entry after the write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchAuditRecord {
    /// Unique identifier
    pub id: Uuid,

    /// The query string exactly as submitted
    pub query_string: String,

    /// Requester identity, or "anonymous"
    pub requester_id: String,

    /// Wall-clock execution time
    pub execution_time_ms: u64,

    /// Total matching records reported to the caller
    pub result_count: u64,

    /// Cache hit or miss
    pub cache_status: CacheStatus,

    /// When the search executed
    pub timestamp: DateTime<Utc>,
}

impl SearchAuditRecord {
    /// Create an entry stamped with the current time.
    pub fn new(
        query_string: impl Into<String>,
        requester_id: Option<&str>,
        execution_time_ms: u64,
        result_count: u64,
        cache_status: CacheStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            query_string: query_string.into(),
            requester_id: requester_id.unwrap_or("anonymous").to_string(),
            execution_time_ms,
            result_count,
            cache_status,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_requester_defaults_to_anonymous() {
        let entry = SearchAuditRecord::new("level:error", None, 12, 3, CacheStatus::Miss);
        assert_eq!(entry.requester_id, "anonymous");
        assert_eq!(entry.cache_status, CacheStatus::Miss);
    }
}
