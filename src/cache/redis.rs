//! Redis-backed result cache for multi-instance deployments.

use crate::cache::{CacheError, CacheResult, ResultCache};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::time::Duration;

/// Result cache on a shared Redis instance, so replicas of the search
/// service see each other's cached pages.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

impl RedisCache {
    /// Connect and verify the server responds.
    pub async fn new(redis_url: &str) -> CacheResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| CacheError::Unavailable(format!("failed to create Redis client: {e}")))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Unavailable(format!("failed to connect to Redis: {e}")))?;

        let mut test_conn = connection.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut test_conn)
            .await
            .map_err(|e| CacheError::Unavailable(format!("Redis connection test failed: {e}")))?;

        tracing::info!("Initialized Redis result cache");

        Ok(Self { connection })
    }
}

#[async_trait]
impl ResultCache for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let mut conn = self.connection.clone();
        conn.get(key)
            .await
            .map_err(|e| CacheError::Unavailable(e.to_string()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.connection.clone();
        let seconds = ttl.as_secs().max(1) as u64;
        conn.set_ex(key, value, seconds)
            .await
            .map_err(|e| CacheError::Unavailable(e.to_string()))
    }
}
