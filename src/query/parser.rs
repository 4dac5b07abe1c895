//! Recursive-descent parser for the query DSL.
//!
//! Implements the grammar
//!
//! ```text
//! expr        := or_expr
//! or_expr     := and_expr (OR and_expr)*
//! and_expr    := not_expr (AND not_expr)*
//! not_expr    := NOT not_expr | term
//! term        := field_query | quoted_string | bare_term | "(" expr ")"
//! field_query := WORD comparator value
//! value       := quoted_string | range | bare_term
//! range       := "[" value TO value "]"
//! ```
//!
//! The output is a small typed raw tree; classification of field values into
//! ranges, wildcards and plain comparisons happens in the normalizer. `TO` is
//! contextual: it is only a keyword between range bounds, so a bare `to`
//! elsewhere stays an ordinary term.

use crate::query::ast::CompareOp;
use crate::query::error::ParseError;
use crate::query::lexer::{tokenize, SpannedToken, Token};

/// Raw parse tree, prior to normalization.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawExpr {
    Term(RawTerm),
    Not(Box<RawExpr>),
    And(Box<RawExpr>, Box<RawExpr>),
    Or(Box<RawExpr>, Box<RawExpr>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawTerm {
    /// Unquoted standalone word
    Bare(String),

    /// Quoted standalone phrase
    Phrase(String),

    /// `field <op> value`
    FieldCmp {
        field: String,
        op: CompareOp,
        value: RawValue,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawValue {
    /// Unquoted value word (may carry wildcards)
    Bare(String),

    /// Quoted value; always a literal
    Phrase(String),

    /// `[start TO end]`, bounds kept as literal strings
    Range { start: String, end: String },
}

/// Parse a token stream into a raw tree.
///
/// An empty stream yields `None` (the caller maps it to match-all). Any
/// tokens left over after the top-level expression are an error.
pub(crate) fn parse_tokens(tokens: Vec<SpannedToken>) -> Result<Option<RawExpr>, ParseError> {
    if tokens.is_empty() {
        return Ok(None);
    }

    let mut parser = Parser { tokens, at: 0 };
    let expr = parser.or_expr()?;

    if let Some(tok) = parser.peek() {
        return Err(ParseError::TrailingInput { pos: tok.pos });
    }

    Ok(Some(expr))
}

/// Tokenize and parse in one step.
pub(crate) fn parse_raw(input: &str) -> Result<Option<RawExpr>, ParseError> {
    parse_tokens(tokenize(input)?)
}

struct Parser {
    tokens: Vec<SpannedToken>,
    at: usize,
}

impl Parser {
    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.at)
    }

    fn bump(&mut self) -> Option<SpannedToken> {
        let token = self.tokens.get(self.at).cloned();
        if token.is_some() {
            self.at += 1;
        }
        token
    }

    fn expect(&mut self, expected: &'static str, want: &Token) -> Result<(), ParseError> {
        match self.bump() {
            Some(tok) if tok.token == *want => Ok(()),
            Some(tok) => Err(ParseError::UnexpectedToken {
                found: tok.token.describe(),
                expected,
                pos: tok.pos,
            }),
            None => Err(ParseError::UnexpectedEnd { expected }),
        }
    }

    fn or_expr(&mut self) -> Result<RawExpr, ParseError> {
        let mut left = self.and_expr()?;
        while matches!(self.peek(), Some(tok) if tok.token == Token::Or) {
            self.bump();
            let right = self.and_expr()?;
            left = RawExpr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<RawExpr, ParseError> {
        let mut left = self.not_expr()?;
        while matches!(self.peek(), Some(tok) if tok.token == Token::And) {
            self.bump();
            let right = self.not_expr()?;
            left = RawExpr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn not_expr(&mut self) -> Result<RawExpr, ParseError> {
        if matches!(self.peek(), Some(tok) if tok.token == Token::Not) {
            self.bump();
            let child = self.not_expr()?;
            return Ok(RawExpr::Not(Box::new(child)));
        }
        self.term()
    }

    fn term(&mut self) -> Result<RawExpr, ParseError> {
        let tok = match self.bump() {
            Some(tok) => tok,
            None => return Err(ParseError::UnexpectedEnd { expected: "a term" }),
        };

        match tok.token {
            Token::LParen => {
                let inner = self.or_expr()?;
                self.expect("')'", &Token::RParen)?;
                Ok(inner)
            }
            Token::Quoted(phrase) => Ok(RawExpr::Term(RawTerm::Phrase(phrase))),
            Token::Word(word) => {
                // A comparator after a word makes it a field query.
                if let Some(SpannedToken {
                    token: Token::Compare(op),
                    ..
                }) = self.peek()
                {
                    let op = *op;
                    self.bump();
                    let value = self.value()?;
                    Ok(RawExpr::Term(RawTerm::FieldCmp {
                        field: word,
                        op,
                        value,
                    }))
                } else {
                    Ok(RawExpr::Term(RawTerm::Bare(word)))
                }
            }
            other => Err(ParseError::UnexpectedToken {
                found: other.describe(),
                expected: "a term",
                pos: tok.pos,
            }),
        }
    }

    fn value(&mut self) -> Result<RawValue, ParseError> {
        let tok = match self.bump() {
            Some(tok) => tok,
            None => return Err(ParseError::UnexpectedEnd { expected: "a value" }),
        };

        match tok.token {
            Token::Quoted(phrase) => Ok(RawValue::Phrase(phrase)),
            Token::Word(word) => Ok(RawValue::Bare(word)),
            Token::LBracket => {
                let start = self.range_bound()?;
                self.range_to()?;
                let end = self.range_bound()?;
                self.expect("']'", &Token::RBracket)?;
                Ok(RawValue::Range { start, end })
            }
            other => Err(ParseError::UnexpectedToken {
                found: other.describe(),
                expected: "a value",
                pos: tok.pos,
            }),
        }
    }

    fn range_bound(&mut self) -> Result<String, ParseError> {
        match self.bump() {
            Some(SpannedToken {
                token: Token::Word(word),
                ..
            }) => Ok(word),
            Some(SpannedToken {
                token: Token::Quoted(phrase),
                ..
            }) => Ok(phrase),
            Some(tok) => Err(ParseError::UnexpectedToken {
                found: tok.token.describe(),
                expected: "a range bound",
                pos: tok.pos,
            }),
            None => Err(ParseError::UnexpectedEnd {
                expected: "a range bound",
            }),
        }
    }

    fn range_to(&mut self) -> Result<(), ParseError> {
        match self.bump() {
            Some(SpannedToken {
                token: Token::Word(word),
                ..
            }) if word.eq_ignore_ascii_case("to") => Ok(()),
            Some(tok) => Err(ParseError::UnexpectedToken {
                found: tok.token.describe(),
                expected: "'TO'",
                pos: tok.pos,
            }),
            None => Err(ParseError::UnexpectedEnd { expected: "'TO'" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(input: &str) -> RawExpr {
        parse_raw(input).unwrap().unwrap()
    }

    #[test]
    fn test_empty_input_yields_none() {
        assert_eq!(parse_raw("").unwrap(), None);
        assert_eq!(parse_raw("   ").unwrap(), None);
    }

    #[test]
    fn test_field_query() {
        assert_eq!(
            parsed("level:error"),
            RawExpr::Term(RawTerm::FieldCmp {
                field: "level".to_string(),
                op: CompareOp::Eq,
                value: RawValue::Bare("error".to_string()),
            })
        );
    }

    #[test]
    fn test_range_value() {
        assert_eq!(
            parsed("timestamp:[2024-01-01 TO 2024-01-31]"),
            RawExpr::Term(RawTerm::FieldCmp {
                field: "timestamp".to_string(),
                op: CompareOp::Eq,
                value: RawValue::Range {
                    start: "2024-01-01".to_string(),
                    end: "2024-01-31".to_string(),
                },
            })
        );
    }

    #[test]
    fn test_quoted_range_bounds() {
        let expr = parsed("timestamp:[\"2024-01-01T00:00:00Z\" TO \"2024-01-02T00:00:00Z\"]");
        match expr {
            RawExpr::Term(RawTerm::FieldCmp {
                value: RawValue::Range { start, end },
                ..
            }) => {
                assert_eq!(start, "2024-01-01T00:00:00Z");
                assert_eq!(end, "2024-01-02T00:00:00Z");
            }
            other => panic!("expected range, got {other:?}"),
        }
    }

    #[test]
    fn test_and_chain_associates_left() {
        let a = RawExpr::Term(RawTerm::Bare("a".to_string()));
        let b = RawExpr::Term(RawTerm::Bare("b".to_string()));
        let c = RawExpr::Term(RawTerm::Bare("c".to_string()));
        assert_eq!(
            parsed("a AND b AND c"),
            RawExpr::And(
                Box::new(RawExpr::And(Box::new(a), Box::new(b))),
                Box::new(c)
            )
        );
    }

    #[test]
    fn test_precedence_not_over_and_over_or() {
        // NOT a AND b OR c == Or(And(Not(a), b), c)
        let a = RawExpr::Term(RawTerm::Bare("a".to_string()));
        let b = RawExpr::Term(RawTerm::Bare("b".to_string()));
        let c = RawExpr::Term(RawTerm::Bare("c".to_string()));
        assert_eq!(
            parsed("NOT a AND b OR c"),
            RawExpr::Or(
                Box::new(RawExpr::And(
                    Box::new(RawExpr::Not(Box::new(a))),
                    Box::new(b)
                )),
                Box::new(c)
            )
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        // a AND (b OR c)
        let b = RawExpr::Term(RawTerm::Bare("b".to_string()));
        let c = RawExpr::Term(RawTerm::Bare("c".to_string()));
        match parsed("a AND (b OR c)") {
            RawExpr::And(_, right) => {
                assert_eq!(*right, RawExpr::Or(Box::new(b), Box::new(c)));
            }
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn test_bare_to_is_not_a_keyword() {
        assert_eq!(parsed("to"), RawExpr::Term(RawTerm::Bare("to".to_string())));
    }

    #[test]
    fn test_trailing_input_fails() {
        // Two adjacent terms cannot be reduced without an operator.
        assert_eq!(
            parse_raw("level:error extra"),
            Err(ParseError::TrailingInput { pos: 12 })
        );
    }

    #[test]
    fn test_unterminated_group_fails() {
        assert!(parse_raw("(level:error").is_err());
        assert!(parse_raw("level:(unterminated").is_err());
    }

    #[test]
    fn test_dangling_operator_fails() {
        assert!(parse_raw("level:error AND").is_err());
        assert!(parse_raw("OR level:error").is_err());
        assert!(parse_raw("NOT").is_err());
    }

    #[test]
    fn test_missing_range_to_fails() {
        assert!(parse_raw("timestamp:[a b]").is_err());
        assert!(parse_raw("timestamp:[a TO b").is_err());
    }
}
