//! Search-query subsystem for structured log records.
//!
//! A small query DSL, its parser, translation into backing-store predicates,
//! and the execution layer built on top:
//!
//! - **Query DSL**: field comparisons, inclusive ranges, anchored wildcards,
//!   quoted phrases, free text, `AND`/`OR`/`NOT` with precedence
//!   `NOT` > `AND` > `OR`
//! - **Typed AST**: a closed set of node variants built by a
//!   recursive-descent parser and a pure normalization pass
//! - **Translation**: AST to composable store filters, preserving operator
//!   precedence and negation scope
//! - **Execution**: pagination, total counts, TTL-bounded result caching and
//!   per-query audit entries
//! - **Facets & suggestions**: grouped counts over fixed dimensions and
//!   best-effort query completions
//!
//! # Architecture
//!
//! ```text
//! query string
//!      │
//!      ▼
//! ┌───────────────┐    ┌───────────────┐    ┌───────────────┐
//! │  Query Parser │ ─► │   Normalizer  │ ─► │   Translator  │
//! │  (lexer + RD) │    │  (raw → AST)  │    │ (AST → Filter)│
//! └───────────────┘    └───────────────┘    └───────┬───────┘
//!                                                   │
//!                  ┌────────────────────────────────┼─────────────┐
//!                  ▼                                ▼             ▼
//!          ┌───────────────┐                ┌─────────────┐ ┌───────────┐
//!          │SearchService  │ ◄─ cache port  │ FacetEngine │ │Suggestion │
//!          │(count, fetch, │ ◄─ audit port  │             │ │Engine     │
//!          │ cache, audit) │ ◄─ store port  └─────────────┘ └───────────┘
//!          └───────────────┘
//! ```
//!
//! The backing log store, the cache store and the audit table are external
//! collaborators reached through the ports in [`store`], [`cache`] and
//! [`audit`]; in-memory implementations ship for tests and single-process
//! use.
//!
//! # Example
//!
//! ```no_run
//! use log_search::audit::MemoryAuditSink;
//! use log_search::cache::MokaCache;
//! use log_search::config::SearchConfig;
//! use log_search::service::SearchService;
//! use log_search::store::MemoryLogStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SearchConfig::default();
//!     let cache = MokaCache::new(1_000, config.cache_ttl());
//!     let service = SearchService::new(
//!         Arc::new(MemoryLogStore::new()),
//!         Arc::new(cache),
//!         Arc::new(MemoryAuditSink::new()),
//!         config,
//!     );
//!
//!     let results = service
//!         .search("level:error AND service:api-*", 1, 20, Some("ops"))
//!         .await?;
//!     println!("{} matching records", results.total);
//!
//!     Ok(())
//! }
//! ```

pub mod audit;
pub mod cache;
pub mod config;
pub mod error;
pub mod facets;
pub mod models;
pub mod query;
pub mod service;
pub mod store;
pub mod suggest;
pub mod translate;

pub use config::{SearchConfig, SearchConfigBuilder};
pub use error::{Result, SearchError};
pub use facets::FacetResult;
pub use models::{CacheStatus, LogLevel, LogRecord, SearchAuditRecord, SearchResult};
pub use query::{parse, CompareOp, ParseError, QueryAst};
pub use service::SearchService;
pub use translate::{translate, Filter, TranslateError};
