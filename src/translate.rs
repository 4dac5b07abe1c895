//! Translation of a [`QueryAst`] into a backing-store filter expression.
//!
//! The output [`Filter`] is the native predicate language of the store port:
//! equality/ordering comparisons on typed fields, inclusive two-sided bounds,
//! anchored patterns (never regex) and binary boolean composition. Grouping
//! mirrors the AST's binary nesting exactly, so mixed `AND`/`OR` trees keep
//! their precedence through execution.
//!
//! Valid syntax with invalid semantics (an unknown field, a literal that
//! does not parse under the field's type) is a [`TranslateError`] naming the
//! offending clause. It is surfaced to the caller rather than dropped, since
//! dropping a clause would silently widen the result set.

use crate::models::record::LogLevel;
use crate::query::{CompareOp, QueryAst};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::str::FromStr;

/// Error raised when a syntactically valid query cannot be translated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslateError {
    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    #[error("invalid value '{value}' for field '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// A queryable field of the log schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldRef {
    Timestamp,
    Level,
    Service,
    Message,
    UserId,
    RequestId,
    /// Flat metadata lookup, addressed as `metadata.<key>`
    Metadata(String),
}

/// How literals for a field are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Time,
    Level,
    Text,
}

impl FieldRef {
    /// Resolve a field name from the query DSL.
    pub fn resolve(name: &str) -> Result<Self, TranslateError> {
        match name {
            "timestamp" => Ok(FieldRef::Timestamp),
            "level" => Ok(FieldRef::Level),
            "service" => Ok(FieldRef::Service),
            "message" => Ok(FieldRef::Message),
            "user_id" => Ok(FieldRef::UserId),
            "request_id" => Ok(FieldRef::RequestId),
            _ => match name.strip_prefix("metadata.") {
                Some(key) if !key.is_empty() => Ok(FieldRef::Metadata(key.to_string())),
                _ => Err(TranslateError::UnknownField {
                    field: name.to_string(),
                }),
            },
        }
    }

    /// The literal type of this field.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldRef::Timestamp => FieldKind::Time,
            FieldRef::Level => FieldKind::Level,
            FieldRef::Service
            | FieldRef::Message
            | FieldRef::UserId
            | FieldRef::RequestId
            | FieldRef::Metadata(_) => FieldKind::Text,
        }
    }

    /// The DSL name of this field.
    pub fn name(&self) -> String {
        match self {
            FieldRef::Timestamp => "timestamp".to_string(),
            FieldRef::Level => "level".to_string(),
            FieldRef::Service => "service".to_string(),
            FieldRef::Message => "message".to_string(),
            FieldRef::UserId => "user_id".to_string(),
            FieldRef::RequestId => "request_id".to_string(),
            FieldRef::Metadata(key) => format!("metadata.{key}"),
        }
    }
}

/// A literal parsed under a field's type.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Time(DateTime<Utc>),
    Level(LogLevel),
    Text(String),
}

/// An anchored pattern predicate. Narrower than regex on purpose: widening
/// these to regular expressions would silently change matching behavior for
/// existing queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchoredPattern {
    /// `core*`
    Prefix(String),
    /// `*core`
    Suffix(String),
    /// `*core*`
    Contains(String),
}

impl AnchoredPattern {
    /// Whether the pattern accepts the given text.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            AnchoredPattern::Prefix(core) => text.starts_with(core.as_str()),
            AnchoredPattern::Suffix(core) => text.ends_with(core.as_str()),
            AnchoredPattern::Contains(core) => text.contains(core.as_str()),
        }
    }
}

/// Backing-store-native filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// No restriction
    All,

    /// Keyword search over the message text (case-insensitive substring)
    MessageContains(String),

    /// Direct comparison on a named field
    Compare {
        field: FieldRef,
        op: CompareOp,
        value: FilterValue,
    },

    /// Inclusive two-sided bound
    Between {
        field: FieldRef,
        low: FilterValue,
        high: FilterValue,
    },

    /// Anchored pattern on a text field
    Pattern {
        field: FieldRef,
        pattern: AnchoredPattern,
    },

    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
    Not(Box<Filter>),
}

/// Translate an AST into a store filter.
pub fn translate(ast: &QueryAst) -> Result<Filter, TranslateError> {
    match ast {
        QueryAst::MatchAll => Ok(Filter::All),
        QueryAst::TextSearch { value } => Ok(Filter::MessageContains(value.clone())),
        QueryAst::Field { field, op, value } => {
            let field = FieldRef::resolve(field)?;
            let value = parse_literal(&field, value)?;
            Ok(Filter::Compare { field, op: *op, value })
        }
        QueryAst::Range { field, start, end } => {
            let field = FieldRef::resolve(field)?;
            let low = parse_literal(&field, start)?;
            let high = parse_literal(&field, end)?;
            Ok(Filter::Between { field, low, high })
        }
        QueryAst::Wildcard { field, pattern } => {
            let field = FieldRef::resolve(field)?;
            if field.kind() != FieldKind::Text {
                return Err(TranslateError::InvalidValue {
                    field: field.name(),
                    value: pattern.clone(),
                    reason: "wildcard patterns require a text field".to_string(),
                });
            }
            let pattern = parse_pattern(&field, pattern)?;
            Ok(Filter::Pattern { field, pattern })
        }
        QueryAst::And { left, right } => Ok(Filter::And(
            Box::new(translate(left)?),
            Box::new(translate(right)?),
        )),
        QueryAst::Or { left, right } => Ok(Filter::Or(
            Box::new(translate(left)?),
            Box::new(translate(right)?),
        )),
        QueryAst::Not { child } => Ok(Filter::Not(Box::new(translate(child)?))),
    }
}

fn parse_literal(field: &FieldRef, raw: &str) -> Result<FilterValue, TranslateError> {
    match field.kind() {
        FieldKind::Text => Ok(FilterValue::Text(raw.to_string())),
        FieldKind::Level => LogLevel::from_str(raw).map(FilterValue::Level).map_err(|_| {
            TranslateError::InvalidValue {
                field: field.name(),
                value: raw.to_string(),
                reason: "expected one of DEBUG, INFO, WARN, ERROR, CRITICAL".to_string(),
            }
        }),
        FieldKind::Time => parse_time(raw).map(FilterValue::Time).ok_or_else(|| {
            TranslateError::InvalidValue {
                field: field.name(),
                value: raw.to_string(),
                reason: "expected an ISO-8601 timestamp".to_string(),
            }
        }),
    }
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS`, and the bare-date form
/// `YYYY-MM-DD` (interpreted as midnight UTC).
fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

fn parse_pattern(field: &FieldRef, pattern: &str) -> Result<AnchoredPattern, TranslateError> {
    let invalid = |reason: &str| TranslateError::InvalidValue {
        field: field.name(),
        value: pattern.to_string(),
        reason: reason.to_string(),
    };

    let leading = pattern.starts_with('*');
    let stripped = pattern.strip_prefix('*').unwrap_or(pattern);
    let trailing = stripped.ends_with('*');
    let core = stripped.strip_suffix('*').unwrap_or(stripped);

    if core.is_empty() {
        return Err(invalid("pattern must contain text besides '*'"));
    }
    if core.contains('*') {
        return Err(invalid("only leading and trailing '*' are supported"));
    }

    let core = core.to_string();
    Ok(match (leading, trailing) {
        (true, true) => AnchoredPattern::Contains(core),
        (true, false) => AnchoredPattern::Suffix(core),
        (false, true) => AnchoredPattern::Prefix(core),
        // Unreachable from the normalizer, which only classifies values
        // containing '*'; kept total for direct construction.
        (false, false) => AnchoredPattern::Contains(core),
    })
}
