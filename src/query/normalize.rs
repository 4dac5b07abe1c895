//! Raw-tree to AST normalization.
//!
//! A pure tree-to-tree transform: every raw node maps to exactly one
//! [`QueryAst`] variant, so it cannot fail on a structurally valid parse.
//!
//! Classification rules for field values:
//! - range shape (`[A TO B]`) becomes [`QueryAst::Range`];
//! - an unquoted value containing `*` becomes [`QueryAst::Wildcard`];
//! - a quoted value is always an exact literal, `*` included;
//! - everything else stays a plain [`QueryAst::Field`] comparison.
//!
//! Standalone terms with no comparator become [`QueryAst::TextSearch`].

use crate::query::ast::QueryAst;
use crate::query::parser::{RawExpr, RawTerm, RawValue};

/// Normalize a raw parse tree into the typed AST.
pub(crate) fn normalize(raw: RawExpr) -> QueryAst {
    match raw {
        RawExpr::Term(term) => normalize_term(term),
        RawExpr::Not(child) => QueryAst::not(normalize(*child)),
        RawExpr::And(left, right) => QueryAst::and(normalize(*left), normalize(*right)),
        RawExpr::Or(left, right) => QueryAst::or(normalize(*left), normalize(*right)),
    }
}

fn normalize_term(term: RawTerm) -> QueryAst {
    match term {
        RawTerm::Bare(value) | RawTerm::Phrase(value) => QueryAst::TextSearch { value },
        RawTerm::FieldCmp { field, op, value } => match value {
            RawValue::Range { start, end } => QueryAst::Range { field, start, end },
            RawValue::Bare(value) if value.contains('*') => {
                QueryAst::Wildcard { field, pattern: value }
            }
            RawValue::Bare(value) | RawValue::Phrase(value) => QueryAst::Field { field, op, value },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ast::CompareOp;
    use crate::query::parser::parse_raw;

    fn normalized(input: &str) -> QueryAst {
        normalize(parse_raw(input).unwrap().unwrap())
    }

    #[test]
    fn test_bare_term_becomes_text_search() {
        assert_eq!(
            normalized("timeout"),
            QueryAst::TextSearch {
                value: "timeout".to_string()
            }
        );
    }

    #[test]
    fn test_range_shape_wins_over_field() {
        assert_eq!(
            normalized("timestamp:[2024-01-01 TO 2024-01-31]"),
            QueryAst::Range {
                field: "timestamp".to_string(),
                start: "2024-01-01".to_string(),
                end: "2024-01-31".to_string(),
            }
        );
    }

    #[test]
    fn test_unquoted_star_becomes_wildcard() {
        assert_eq!(
            normalized("service:api-*"),
            QueryAst::Wildcard {
                field: "service".to_string(),
                pattern: "api-*".to_string(),
            }
        );
    }

    #[test]
    fn test_quoted_star_stays_exact() {
        assert_eq!(
            normalized("service:\"api-*\""),
            QueryAst::Field {
                field: "service".to_string(),
                op: CompareOp::Eq,
                value: "api-*".to_string(),
            }
        );
    }

    #[test]
    fn test_boolean_nodes_stay_binary() {
        let ast = normalized("a AND b AND c");
        match ast {
            QueryAst::And { left, .. } => assert!(matches!(*left, QueryAst::And { .. })),
            other => panic!("expected nested And, got {other:?}"),
        }
    }

    #[test]
    fn test_not_keeps_one_child() {
        assert_eq!(
            normalized("NOT level:debug"),
            QueryAst::not(QueryAst::Field {
                field: "level".to_string(),
                op: CompareOp::Eq,
                value: "debug".to_string(),
            })
        );
    }
}
