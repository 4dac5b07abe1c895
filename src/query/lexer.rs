//! Tokenizer for the query DSL.
//!
//! Quoted strings are atomic: comparators and boolean keywords inside quotes
//! are literal text. Bare words cover values, numbers, wildcard patterns and
//! field names alike; the parser decides which role a word plays.

use crate::query::error::ParseError;

/// A single token with the byte offset it started at.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SpannedToken {
    pub token: Token,
    pub pos: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    /// Bare word: alphanumerics plus `_`, `-`, `.`, `*`
    Word(String),

    /// Content of a double-quoted string, escapes resolved
    Quoted(String),

    /// A comparator (`:`, `=`, `>`, `<`, `>=`, `<=`, `!=`)
    Compare(crate::query::ast::CompareOp),

    /// Boolean keywords, matched case-insensitively
    And,
    Or,
    Not,

    LParen,
    RParen,
    LBracket,
    RBracket,
}

impl Token {
    /// Short description used in error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Word(w) => format!("'{w}'"),
            Token::Quoted(q) => format!("\"{q}\""),
            Token::Compare(op) => format!("'{op}'"),
            Token::And => "'AND'".to_string(),
            Token::Or => "'OR'".to_string(),
            Token::Not => "'NOT'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
        }
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '-' | '.' | '*')
}

/// Tokenize a query string.
pub(crate) fn tokenize(input: &str) -> Result<Vec<SpannedToken>, ParseError> {
    use crate::query::ast::CompareOp;

    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(SpannedToken { token: Token::LParen, pos });
            }
            ')' => {
                chars.next();
                tokens.push(SpannedToken { token: Token::RParen, pos });
            }
            '[' => {
                chars.next();
                tokens.push(SpannedToken { token: Token::LBracket, pos });
            }
            ']' => {
                chars.next();
                tokens.push(SpannedToken { token: Token::RBracket, pos });
            }
            ':' => {
                chars.next();
                tokens.push(SpannedToken { token: Token::Compare(CompareOp::Eq), pos });
            }
            '=' => {
                chars.next();
                tokens.push(SpannedToken { token: Token::Compare(CompareOp::Eq), pos });
            }
            '>' | '<' | '!' => {
                chars.next();
                let eq_follows = matches!(chars.peek(), Some((_, '=')));
                if eq_follows {
                    chars.next();
                }
                let op = match (ch, eq_follows) {
                    ('>', false) => CompareOp::Gt,
                    ('>', true) => CompareOp::Gte,
                    ('<', false) => CompareOp::Lt,
                    ('<', true) => CompareOp::Lte,
                    ('!', true) => CompareOp::Ne,
                    // '!' without '='
                    _ => return Err(ParseError::UnexpectedChar { ch, pos }),
                };
                tokens.push(SpannedToken { token: Token::Compare(op), pos });
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    match c {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => match chars.next() {
                            Some((_, escaped)) => value.push(escaped),
                            None => break,
                        },
                        other => value.push(other),
                    }
                }
                if !closed {
                    return Err(ParseError::UnterminatedQuote { pos });
                }
                tokens.push(SpannedToken { token: Token::Quoted(value), pos });
            }
            c if is_word_char(c) => {
                let mut word = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if !is_word_char(c) {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                let token = match word.to_ascii_uppercase().as_str() {
                    "AND" => Token::And,
                    "OR" => Token::Or,
                    "NOT" => Token::Not,
                    _ => Token::Word(word),
                };
                tokens.push(SpannedToken { token, pos });
            }
            other => return Err(ParseError::UnexpectedChar { ch: other, pos }),
        }
    }

    Ok(tokens)
}
