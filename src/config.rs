use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Search subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Page size used when the caller passes zero
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Upper bound applied to requested page sizes
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    /// Result-cache time-to-live (seconds)
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Enable the result cache
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Timeout applied to each backing-store call (seconds)
    #[serde(default = "default_store_timeout")]
    pub store_timeout_secs: u64,

    /// Maximum completions returned by the suggestion engine
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,

    /// Number of top services reported by the facet engine
    #[serde(default = "default_facet_service_limit")]
    pub facet_service_limit: usize,

    /// Number of hourly buckets in the facet timeline
    #[serde(default = "default_timeline_buckets")]
    pub timeline_buckets: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            cache_ttl_secs: default_cache_ttl(),
            cache_enabled: true,
            store_timeout_secs: default_store_timeout(),
            suggestion_limit: default_suggestion_limit(),
            facet_service_limit: default_facet_service_limit(),
            timeline_buckets: default_timeline_buckets(),
        }
    }
}

impl SearchConfig {
    /// Load configuration from an optional file plus environment variables.
    ///
    /// The file path comes from `LOG_SEARCH_CONFIG` (missing files are fine);
    /// environment overrides use the `LOG_SEARCH__` prefix, e.g.
    /// `LOG_SEARCH__CACHE_TTL_SECS=120`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("LOG_SEARCH_CONFIG").unwrap_or_else(|_| "config/search.toml".to_string());

        config::Config::builder()
            .add_source(config::File::with_name(&config_path).required(false))
            .add_source(
                config::Environment::with_prefix("LOG_SEARCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Cache TTL as a duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Store timeout as a duration.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}

/// Builder for [`SearchConfig`].
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    pub fn default_page_size(mut self, size: u32) -> Self {
        self.config.default_page_size = size;
        self
    }

    pub fn max_page_size(mut self, size: u32) -> Self {
        self.config.max_page_size = size;
        self
    }

    pub fn cache_ttl_secs(mut self, secs: u64) -> Self {
        self.config.cache_ttl_secs = secs;
        self
    }

    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.config.cache_enabled = enabled;
        self
    }

    pub fn store_timeout_secs(mut self, secs: u64) -> Self {
        self.config.store_timeout_secs = secs;
        self
    }

    pub fn suggestion_limit(mut self, limit: usize) -> Self {
        self.config.suggestion_limit = limit;
        self
    }

    pub fn facet_service_limit(mut self, limit: usize) -> Self {
        self.config.facet_service_limit = limit;
        self
    }

    pub fn timeline_buckets(mut self, buckets: usize) -> Self {
        self.config.timeline_buckets = buckets;
        self
    }

    pub fn build(self) -> SearchConfig {
        self.config
    }
}

impl Default for SearchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// Default value functions
fn default_page_size() -> u32 {
    50
}

fn default_max_page_size() -> u32 {
    1000
}

fn default_cache_ttl() -> u64 {
    60
}

fn default_store_timeout() -> u64 {
    5
}

fn default_suggestion_limit() -> usize {
    10
}

fn default_facet_service_limit() -> usize {
    10
}

fn default_timeline_buckets() -> usize {
    24
}

fn default_true() -> bool {
    true
}
