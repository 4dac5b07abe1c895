//! The backing-store port.
//!
//! The production log store (filtering, sorting, counting, pagination) lives
//! outside this crate; everything here talks to it through [`LogStore`]. The
//! in-memory implementation doubles as the reference interpreter for
//! [`Filter`](crate::translate::Filter) expressions in tests.

pub mod memory;

pub use memory::MemoryLogStore;

use crate::models::record::LogRecord;
use crate::translate::{FieldRef, Filter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors from the backing store. Both variants are retryable from the
/// caller's perspective; retry policy belongs to an outer resilience layer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("log store unavailable: {0}")]
    Unavailable(String),

    #[error("log store operation timed out after {0}s")]
    Timeout(u64),
}

/// A grouped count along one facet dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetBucket {
    pub value: String,
    pub count: u64,
}

/// A grouped count for one hour of the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineBucket {
    pub hour: DateTime<Utc>,
    pub count: u64,
}

/// Categorical dimensions the store can group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetDimension {
    Service,
    Level,
}

/// Capability surface required from the backing store.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Count all records matching the filter.
    async fn count(&self, filter: &Filter) -> StoreResult<u64>;

    /// Fetch one page of matching records, ordered newest first.
    async fn fetch(&self, filter: &Filter, offset: u64, limit: u64) -> StoreResult<Vec<LogRecord>>;

    /// Grouped counts over a categorical dimension, ordered by count
    /// descending.
    async fn facet_counts(
        &self,
        filter: &Filter,
        dimension: FacetDimension,
    ) -> StoreResult<Vec<FacetBucket>>;

    /// Hourly counts for the most recent `buckets` non-empty hours, newest
    /// first.
    async fn hourly_counts(
        &self,
        filter: &Filter,
        buckets: usize,
    ) -> StoreResult<Vec<TimelineBucket>>;

    /// A bounded sample of distinct values observed for a field.
    async fn distinct_values(&self, field: &FieldRef, limit: usize) -> StoreResult<Vec<String>>;
}
