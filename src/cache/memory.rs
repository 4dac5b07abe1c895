//! In-process result cache backed by Moka.

use crate::cache::{CacheResult, ResultCache};
use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;

/// Moka-backed cache.
///
/// Moka applies one time-to-live to the whole cache, fixed at construction;
/// the per-call `ttl` argument is honored by construction-time agreement (the
/// executor always passes the same configured TTL).
#[derive(Clone)]
pub struct MokaCache {
    cache: Cache<String, Vec<u8>>,
}

impl MokaCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }
}

#[async_trait]
impl ResultCache for MokaCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        Ok(self.cache.get(key).await)
    }

    async fn set(&self, key: &str, value: Vec<u8>, _ttl: Duration) -> CacheResult<()> {
        self.cache.insert(key.to_string(), value).await;
        Ok(())
    }
}
