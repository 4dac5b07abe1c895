//! The result-cache port.
//!
//! Cached search results are stale-but-bounded: a cached page may lag records
//! ingested within the last TTL window. That bound is a deliberate trade-off
//! and part of the caller-facing contract. The cache is also allowed to fail
//! independently of the primary data path; the executor treats any cache
//! error as a miss.

pub mod memory;
pub mod redis;

pub use memory::MokaCache;
pub use redis::RedisCache;

use async_trait::async_trait;
use std::time::Duration;

/// Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Errors from the cache layer. Never fatal to a search.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

/// Capability surface required from the cache layer. Both operations must be
/// safe under concurrent access; concurrent writers for the same key are a
/// benign last-writer-wins race.
#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Look up a serialized result.
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Store a serialized result with a time-to-live.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()>;
}
