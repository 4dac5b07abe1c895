//! The typed query AST.
//!
//! A closed tagged union with unambiguous semantics: every node is one of the
//! variants below, there is no generic container to sniff and unwrap. Parsing
//! is a pure function of the input string, so two parses of the same query
//! always produce structurally equal trees.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator in a field query.
///
/// `:` and `=` are both parsed as [`CompareOp::Eq`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    #[serde(rename = ":")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            CompareOp::Eq => ":",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        };
        f.write_str(symbol)
    }
}

/// A parsed search query.
///
/// Operator precedence is `NOT` > `AND` > `OR`; parentheses in the source
/// query override it. Boolean nodes are strictly binary: `a AND b AND c`
/// parses as `And(And(a, b), c)`, which fixes the reduction order used by
/// the translator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryAst {
    /// Empty query; matches every record
    MatchAll,

    /// Unstructured keyword search over the message text
    TextSearch { value: String },

    /// Direct comparison against a named field
    Field {
        field: String,
        op: CompareOp,
        value: String,
    },

    /// Inclusive two-sided bound; literals are interpreted per field type
    Range {
        field: String,
        start: String,
        end: String,
    },

    /// Anchored pattern: leading `*` = suffix match, trailing `*` = prefix
    /// match, both = substring match
    Wildcard { field: String, pattern: String },

    /// Conjunction of exactly two sub-queries
    And {
        left: Box<QueryAst>,
        right: Box<QueryAst>,
    },

    /// Disjunction of exactly two sub-queries
    Or {
        left: Box<QueryAst>,
        right: Box<QueryAst>,
    },

    /// Negation of exactly one sub-query
    Not { child: Box<QueryAst> },
}

impl QueryAst {
    /// Convenience constructor for a conjunction.
    pub fn and(left: QueryAst, right: QueryAst) -> Self {
        QueryAst::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Convenience constructor for a disjunction.
    pub fn or(left: QueryAst, right: QueryAst) -> Self {
        QueryAst::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Convenience constructor for a negation.
    pub fn not(child: QueryAst) -> Self {
        QueryAst::Not {
            child: Box::new(child),
        }
    }
}
