use crate::cache::CacheError;
use crate::query::ParseError;
use crate::store::StoreError;
use crate::translate::TranslateError;
use thiserror::Error;

/// Crate-level error for search operations.
///
/// The propagation policy is asymmetric on purpose: parse failures and cache
/// failures are recovered inside the executor (free-text fallback, uncached
/// execution), while translation failures and store failures surface here.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Malformed query syntax. Only seen by callers that parse directly;
    /// the executor degrades to a free-text search instead.
    #[error("query parse failed: {0}")]
    Parse(#[from] ParseError),

    /// Valid syntax, invalid semantics. A client error naming the clause.
    #[error("query translation failed: {0}")]
    Translation(#[from] TranslateError),

    /// The backing store is unreachable or timed out. Retryable.
    #[error("log store error: {0}")]
    Store(#[from] StoreError),

    /// The cache layer failed in a way the executor could not absorb.
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// A result payload could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl SearchError {
    /// Stable machine-readable code.
    pub fn error_code(&self) -> &'static str {
        match self {
            SearchError::Parse(_) => "PARSE_ERROR",
            SearchError::Translation(_) => "TRANSLATION_ERROR",
            SearchError::Store(_) => "STORE_UNAVAILABLE",
            SearchError::Cache(_) => "CACHE_UNAVAILABLE",
            SearchError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SearchError::Store(_) | SearchError::Cache(_))
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Serialization(err.to_string())
    }
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = SearchError::Translation(TranslateError::UnknownField {
            field: "bogus".to_string(),
        });
        assert_eq!(err.error_code(), "TRANSLATION_ERROR");
        assert!(!err.is_retryable());

        let err = SearchError::Store(StoreError::Timeout(5));
        assert_eq!(err.error_code(), "STORE_UNAVAILABLE");
        assert!(err.is_retryable());
    }
}
