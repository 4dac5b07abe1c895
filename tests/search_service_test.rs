//! End-to-end tests for the search executor over the in-memory collaborators.

use chrono::{TimeZone, Utc};
use log_search::audit::MemoryAuditSink;
use log_search::cache::MokaCache;
use log_search::config::{SearchConfig, SearchConfigBuilder};
use log_search::models::{CacheStatus, LogLevel, LogRecord};
use log_search::service::SearchService;
use log_search::store::MemoryLogStore;
use log_search::SearchError;
use std::collections::HashSet;
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("log_search=debug")
        .try_init();
}

/// Helper bundling the service with its injected doubles.
struct Harness {
    service: SearchService,
    store: MemoryLogStore,
    audit: MemoryAuditSink,
}

fn harness(config: SearchConfig) -> Harness {
    init_tracing();
    let store = MemoryLogStore::new();
    let audit = MemoryAuditSink::new();
    let cache = MokaCache::new(1_000, config.cache_ttl());
    let service = SearchService::new(
        Arc::new(store.clone()),
        Arc::new(cache),
        Arc::new(audit.clone()),
        config,
    );
    Harness {
        service,
        store,
        audit,
    }
}

fn record(minute: u32, level: LogLevel, service: &str, message: &str) -> LogRecord {
    LogRecord::new(level, service, message)
        .with_timestamp(Utc.with_ymd_and_hms(2024, 3, 10, 12, minute, 0).unwrap())
}

fn seeded(config: SearchConfig) -> Harness {
    let h = harness(config);
    h.store.insert_all([
        record(1, LogLevel::Debug, "billing", "cache warmed"),
        record(2, LogLevel::Info, "billing", "invoice issued"),
        record(3, LogLevel::Warn, "api-gateway", "slow upstream"),
        record(4, LogLevel::Error, "api-gateway", "connection reset by peer"),
        record(5, LogLevel::Critical, "auth", "token signing key missing"),
    ]);
    h
}

#[tokio::test]
async fn test_empty_query_returns_everything_newest_first() {
    let h = seeded(SearchConfig::default());

    let result = h.service.search("", 1, 20, None).await.unwrap();

    assert_eq!(result.total, 5);
    assert_eq!(result.total_pages, 1);
    assert_eq!(result.records.len(), 5);
    assert_eq!(result.records[0].service, "auth");
    assert_eq!(result.records[4].message, "cache warmed");
}

#[tokio::test]
async fn test_negation_excludes_debug_records() {
    let h = seeded(SearchConfig::default());

    let result = h.service.search("NOT level:debug", 1, 20, None).await.unwrap();

    assert_eq!(result.total, 4);
    assert!(result.records.iter().all(|r| r.level != LogLevel::Debug));
    // Still ordered newest first.
    assert_eq!(result.records[0].level, LogLevel::Critical);
}

#[tokio::test]
async fn test_wildcard_is_anchored_end_to_end() {
    let h = seeded(SearchConfig::default());
    h.store
        .insert(record(6, LogLevel::Info, "my-api-gateway", "noise"));

    let result = h.service.search("service:api-*", 1, 20, None).await.unwrap();

    assert_eq!(result.total, 2);
    assert!(result.records.iter().all(|r| r.service == "api-gateway"));
}

#[tokio::test]
async fn test_range_includes_both_bounds() {
    let h = seeded(SearchConfig::default());

    let query = "timestamp:[\"2024-03-10T12:02:00Z\" TO \"2024-03-10T12:04:00Z\"]";
    let result = h.service.search(query, 1, 20, None).await.unwrap();

    assert_eq!(result.total, 3);
}

#[tokio::test]
async fn test_pagination_is_complete_and_duplicate_free() {
    let h = harness(SearchConfig::default());
    h.store.insert_all((0..23u32).map(|i| {
        LogRecord::new(LogLevel::Info, "svc", format!("event {i}"))
            .with_timestamp(Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, i).unwrap())
    }));

    let first = h.service.search("", 1, 5, None).await.unwrap();
    assert_eq!(first.total, 23);
    assert_eq!(first.total_pages, 5);

    let mut seen = HashSet::new();
    let mut collected = 0u64;
    for page in 1..=first.total_pages {
        let result = h.service.search("", page as u32, 5, None).await.unwrap();
        for r in &result.records {
            assert!(seen.insert(r.id), "duplicate record across pages");
        }
        collected += result.records.len() as u64;
    }
    assert_eq!(collected, first.total);
}

#[tokio::test]
async fn test_cached_result_is_stable_within_ttl() {
    let h = seeded(SearchConfig::default());

    let first = h.service.search("level:error", 1, 20, None).await.unwrap();
    assert_eq!(first.total, 1);

    // New data within the TTL window is invisible to the identical request.
    h.store
        .insert(record(7, LogLevel::Error, "billing", "charge failed"));
    let second = h.service.search("level:error", 1, 20, None).await.unwrap();

    assert_eq!(second, first);

    let statuses: Vec<CacheStatus> = h
        .audit
        .entries()
        .iter()
        .map(|e| e.cache_status)
        .collect();
    assert_eq!(statuses, vec![CacheStatus::Miss, CacheStatus::Hit]);
}

#[tokio::test]
async fn test_disabling_the_cache_gives_fresh_reads() {
    let config = SearchConfigBuilder::new().cache_enabled(false).build();
    let h = seeded(config);

    let first = h.service.search("level:error", 1, 20, None).await.unwrap();
    h.store
        .insert(record(7, LogLevel::Error, "billing", "charge failed"));
    let second = h.service.search("level:error", 1, 20, None).await.unwrap();

    assert_eq!(first.total, 1);
    assert_eq!(second.total, 2);
}

#[tokio::test]
async fn test_malformed_query_degrades_to_text_search() {
    let h = seeded(SearchConfig::default());
    h.store.insert(record(
        8,
        LogLevel::Info,
        "docs",
        "see level:(unterminated for details",
    ));

    // Does not raise; behaves as a free-text search for the literal string.
    let degraded = h
        .service
        .search("level:(unterminated", 1, 20, None)
        .await
        .unwrap();
    let explicit = h
        .service
        .search("\"level:(unterminated\"", 1, 20, None)
        .await
        .unwrap();

    assert_eq!(degraded.total, 1);
    assert_eq!(degraded.total, explicit.total);
    assert_eq!(degraded.records[0].service, "docs");
}

#[tokio::test]
async fn test_unknown_field_surfaces_a_translation_error() {
    let h = seeded(SearchConfig::default());

    let err = h
        .service
        .search("hostname:web-1", 1, 20, None)
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::Translation(_)));
    assert!(!err.is_retryable());
    assert!(err.to_string().contains("hostname"));
}

#[tokio::test]
async fn test_page_arguments_are_clamped() {
    let h = seeded(SearchConfig::default());

    let result = h.service.search("", 0, 0, None).await.unwrap();
    assert_eq!(result.page, 1);
    assert_eq!(result.page_size, 50);

    let config = SearchConfigBuilder::new().max_page_size(3).build();
    let h = seeded(config);
    let result = h.service.search("", 1, 100, None).await.unwrap();
    assert_eq!(result.page_size, 3);
    assert_eq!(result.records.len(), 3);
}

#[tokio::test]
async fn test_every_search_writes_one_audit_entry() {
    let h = seeded(SearchConfig::default());

    h.service
        .search("level:error", 1, 20, Some("ops-oncall"))
        .await
        .unwrap();
    h.service.search("", 1, 20, None).await.unwrap();

    let entries = h.audit.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].requester_id, "ops-oncall");
    assert_eq!(entries[0].query_string, "level:error");
    assert_eq!(entries[0].result_count, 1);
    assert_eq!(entries[1].requester_id, "anonymous");
}

#[tokio::test]
async fn test_precedence_end_to_end() {
    let h = seeded(SearchConfig::default());

    // AND binds tighter: (error AND api-gateway) OR warn
    let result = h
        .service
        .search("level:error AND service:api-gateway OR level:warn", 1, 20, None)
        .await
        .unwrap();
    assert_eq!(result.total, 2);

    // Parentheses regroup: error AND (api-gateway OR warn)
    let result = h
        .service
        .search(
            "level:error AND (service:api-gateway OR level:warn)",
            1,
            20,
            None,
        )
        .await
        .unwrap();
    assert_eq!(result.total, 1);
}

#[tokio::test]
async fn test_facets_over_a_filtered_population() {
    let h = seeded(SearchConfig::default());

    let facets = h.service.facets("service:api-gateway").await.unwrap();

    assert_eq!(facets.services.len(), 1);
    assert_eq!(facets.services[0].count, 2);
    assert!(facets
        .levels
        .iter()
        .any(|b| b.value == "WARN" && b.count == 1));
    assert!(facets
        .levels
        .iter()
        .any(|b| b.value == "CRITICAL" && b.count == 0));
    assert_eq!(facets.timeline.len(), 1);
}

#[tokio::test]
async fn test_suggestions_end_to_end() {
    let h = seeded(SearchConfig::default());

    assert_eq!(
        h.service.suggest("lev").await.unwrap(),
        vec!["level:".to_string()]
    );

    let values = h.service.suggest("service:").await.unwrap();
    assert!(values.contains(&"service:api-gateway".to_string()));
    assert!(values.len() <= 10);
}

#[tokio::test]
async fn test_quoted_operators_are_literal() {
    let h = harness(SearchConfig::default());
    h.store.insert(record(
        1,
        LogLevel::Info,
        "docs",
        "retry AND backoff are both enabled",
    ));

    let result = h
        .service
        .search("\"retry AND backoff\"", 1, 20, None)
        .await
        .unwrap();
    assert_eq!(result.total, 1);
}
