//! The search executor.
//!
//! Orchestrates one search request end to end: cache probe, parse (with the
//! documented free-text degradation), translation, bounded store calls,
//! result assembly, cache write and audit write. All collaborators are
//! injected at construction so tests can substitute in-memory doubles and
//! deployments can swap implementations without touching the algorithm.

use crate::audit::AuditSink;
use crate::cache::ResultCache;
use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::facets::{FacetEngine, FacetResult};
use crate::models::audit::{CacheStatus, SearchAuditRecord};
use crate::models::result::{QueryInfo, SearchResult};
use crate::query::{self, QueryAst};
use crate::store::{LogStore, StoreError, StoreResult};
use crate::suggest::SuggestionEngine;
use crate::translate::translate;
use sha2::{Digest, Sha256};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

/// Search service over an injected store, cache and audit sink.
pub struct SearchService {
    store: Arc<dyn LogStore>,
    cache: Arc<dyn ResultCache>,
    audit: Arc<dyn AuditSink>,
    config: SearchConfig,
    facet_engine: FacetEngine,
    suggestion_engine: SuggestionEngine,
}

impl SearchService {
    /// Create a new service.
    pub fn new(
        store: Arc<dyn LogStore>,
        cache: Arc<dyn ResultCache>,
        audit: Arc<dyn AuditSink>,
        config: SearchConfig,
    ) -> Self {
        let facet_engine = FacetEngine::new(Arc::clone(&store), &config);
        let suggestion_engine = SuggestionEngine::new(Arc::clone(&store), config.suggestion_limit);

        Self {
            store,
            cache,
            audit,
            config,
            facet_engine,
            suggestion_engine,
        }
    }

    /// Execute a search.
    ///
    /// `page` is 1-based and clamped to at least 1; a zero `page_size` takes
    /// the configured default, larger values are capped at the configured
    /// maximum. Results within one TTL window of an identical request are
    /// served from cache and may lag freshly ingested records by up to the
    /// TTL; that staleness bound is part of the contract.
    pub async fn search(
        &self,
        query_string: &str,
        page: u32,
        page_size: u32,
        requester_id: Option<&str>,
    ) -> Result<SearchResult> {
        let started = Instant::now();
        let page = page.max(1);
        let page_size = if page_size == 0 {
            self.config.default_page_size
        } else {
            page_size.min(self.config.max_page_size)
        };

        let cache_key = cache_key(query_string, page, page_size);

        if self.config.cache_enabled {
            match self.cache.get(&cache_key).await {
                Ok(Some(bytes)) => match serde_json::from_slice::<SearchResult>(&bytes) {
                    Ok(result) => {
                        tracing::debug!(query = %query_string, "search served from cache");
                        self.write_audit(
                            query_string,
                            requester_id,
                            started.elapsed().as_millis() as u64,
                            result.total,
                            CacheStatus::Hit,
                        )
                        .await;
                        return Ok(result);
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "discarding undecodable cache entry");
                    }
                },
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "result cache unavailable, executing uncached");
                }
            }
        }

        let ast = self.parse_or_fallback(query_string);
        let filter = translate(&ast)?;

        let total = self.bounded(self.store.count(&filter)).await?;
        let offset = (page as u64 - 1) * page_size as u64;
        let records = self
            .bounded(self.store.fetch(&filter, offset, page_size as u64))
            .await?;

        let result = SearchResult {
            total,
            page,
            page_size,
            total_pages: (total + page_size as u64 - 1) / page_size as u64,
            records,
            query_info: QueryInfo {
                original: query_string.to_string(),
                ast,
            },
        };

        if self.config.cache_enabled {
            let bytes = serde_json::to_vec(&result)?;
            if let Err(err) = self
                .cache
                .set(&cache_key, bytes, self.config.cache_ttl())
                .await
            {
                tracing::warn!(error = %err, "failed to write search result to cache");
            }
        }

        self.write_audit(
            query_string,
            requester_id,
            started.elapsed().as_millis() as u64,
            result.total,
            CacheStatus::Miss,
        )
        .await;

        Ok(result)
    }

    /// Compute facets for a query, restricted the same way [`search`] would
    /// restrict it.
    ///
    /// [`search`]: SearchService::search
    pub async fn facets(&self, query_string: &str) -> Result<FacetResult> {
        let ast = self.parse_or_fallback(query_string);
        match tokio::time::timeout(self.config.store_timeout(), self.facet_engine.compute(&ast))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(SearchError::Store(StoreError::Timeout(
                self.config.store_timeout_secs,
            ))),
        }
    }

    /// Propose completions for a partial query. Best-effort; a slow or
    /// failing store degrades to no suggestions.
    pub async fn suggest(&self, partial: &str) -> Result<Vec<String>> {
        match tokio::time::timeout(
            self.config.store_timeout(),
            self.suggestion_engine.suggest(partial),
        )
        .await
        {
            Ok(suggestions) => Ok(suggestions),
            Err(_) => {
                tracing::warn!("suggestion lookup timed out");
                Ok(Vec::new())
            }
        }
    }

    /// Parse, degrading to a free-text search over the raw string on
    /// failure. The degradation is deliberate: a malformed query should
    /// never hard-fail from the user's perspective.
    fn parse_or_fallback(&self, query_string: &str) -> QueryAst {
        match query::parse(query_string) {
            Ok(ast) => ast,
            Err(err) => {
                tracing::warn!(
                    query = %query_string,
                    error = %err,
                    "query parse failed, degrading to free-text search"
                );
                QueryAst::TextSearch {
                    value: query_string.to_string(),
                }
            }
        }
    }

    /// Bound a store call with the configured timeout.
    async fn bounded<T>(&self, fut: impl Future<Output = StoreResult<T>>) -> Result<T> {
        match tokio::time::timeout(self.config.store_timeout(), fut).await {
            Ok(result) => result.map_err(SearchError::from),
            Err(_) => Err(SearchError::Store(StoreError::Timeout(
                self.config.store_timeout_secs,
            ))),
        }
    }

    async fn write_audit(
        &self,
        query_string: &str,
        requester_id: Option<&str>,
        execution_time_ms: u64,
        result_count: u64,
        cache_status: CacheStatus,
    ) {
        let entry = SearchAuditRecord::new(
            query_string,
            requester_id,
            execution_time_ms,
            result_count,
            cache_status,
        );
        if let Err(err) = self.audit.record(entry).await {
            tracing::warn!(error = %err, "failed to append search audit entry");
        }
    }
}

/// Deterministic cache key over the request tuple.
fn cache_key(query: &str, page: u32, page_size: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    hasher.update([0x1f]);
    hasher.update(page.to_le_bytes());
    hasher.update([0x1f]);
    hasher.update(page_size.to_le_bytes());
    format!("search:{:x}", hasher.finalize())
}
