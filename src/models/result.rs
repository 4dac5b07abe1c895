use crate::models::record::LogRecord;
use crate::query::QueryAst;
use serde::{Deserialize, Serialize};

/// Diagnostic echo of the query that produced a result page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryInfo {
    /// The query string exactly as submitted
    pub original: String,

    /// The AST the query was executed against
    pub ast: QueryAst,
}

/// One page of search results plus pagination metadata.
///
/// The whole structure is serializable so that a cached page and a freshly
/// computed page are byte-identical on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Count of all matching records, ignoring pagination
    pub total: u64,

    /// 1-based page number
    pub page: u32,

    /// Records per page
    pub page_size: u32,

    /// ceil(total / page_size)
    pub total_pages: u64,

    /// The page's records, newest first
    pub records: Vec<LogRecord>,

    /// Original query string and AST, for diagnostics
    pub query_info: QueryInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::LogLevel;

    #[test]
    fn test_result_round_trips_through_json() {
        let result = SearchResult {
            total: 1,
            page: 1,
            page_size: 20,
            total_pages: 1,
            records: vec![LogRecord::new(LogLevel::Error, "api", "boom")],
            query_info: QueryInfo {
                original: "level:error".to_string(),
                ast: crate::query::parse("level:error").unwrap(),
            },
        };

        let bytes = serde_json::to_vec(&result).unwrap();
        let decoded: SearchResult = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, result);
    }
}
