//! The search-query DSL: tokenizer, parser and AST.
//!
//! Queries combine field comparisons, inclusive ranges, anchored wildcards,
//! quoted phrases and free text with `AND`/`OR`/`NOT` (precedence
//! `NOT` > `AND` > `OR`, parentheses override):
//!
//! ```text
//! level:error AND service:api-* AND NOT message:"connection reset"
//! timestamp:[2024-01-01 TO 2024-01-31] OR level>=warn
//! ```
//!
//! [`parse`] is the single entry point. It is deterministic and side-effect
//! free; the empty query parses to [`QueryAst::MatchAll`].

mod ast;
mod error;
mod lexer;
mod normalize;
mod parser;

pub use ast::{CompareOp, QueryAst};
pub use error::ParseError;

/// Parse a query string into its AST.
///
/// Empty or whitespace-only input yields [`QueryAst::MatchAll`]. Any input
/// the grammar cannot reduce is a [`ParseError`]; the caller decides the
/// fallback policy.
pub fn parse(input: &str) -> Result<QueryAst, ParseError> {
    match parser::parse_raw(input)? {
        Some(raw) => Ok(normalize::normalize(raw)),
        None => Ok(QueryAst::MatchAll),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_is_match_all() {
        assert_eq!(parse("").unwrap(), QueryAst::MatchAll);
        assert_eq!(parse("  \t ").unwrap(), QueryAst::MatchAll);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let query = "level:error AND (service:api OR service:web) AND NOT user_id:u-1";
        assert_eq!(parse(query).unwrap(), parse(query).unwrap());
    }

    #[test]
    fn test_precedence_law() {
        // level:error AND service:api OR level:warn
        // == Or(And(level:error, service:api), level:warn)
        let ast = parse("level:error AND service:api OR level:warn").unwrap();
        let expected = QueryAst::or(
            QueryAst::and(
                QueryAst::Field {
                    field: "level".to_string(),
                    op: CompareOp::Eq,
                    value: "error".to_string(),
                },
                QueryAst::Field {
                    field: "service".to_string(),
                    op: CompareOp::Eq,
                    value: "api".to_string(),
                },
            ),
            QueryAst::Field {
                field: "level".to_string(),
                op: CompareOp::Eq,
                value: "warn".to_string(),
            },
        );
        assert_eq!(ast, expected);
    }

    #[test]
    fn test_colon_and_equals_are_equivalent() {
        assert_eq!(parse("level:error").unwrap(), parse("level=error").unwrap());
    }

    #[test]
    fn test_malformed_query_is_an_error() {
        assert!(parse("level:(unterminated").is_err());
        assert!(parse("AND AND").is_err());
    }
}
