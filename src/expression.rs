//! SPDX license expression parsing.
//!
//! Only what the resolver needs: validate the grammar and return the atomic
//! license terms an expression mentions. A term is an identifier with an
//! optional `+` suffix, optionally followed by `WITH <exception>`:
//!
//! ```text
//! Ruby AND (SAX-PD OR LGPL-2.0-only WITH FLTK-exception)
//!   => ["LGPL-2.0-only WITH FLTK-exception", "Ruby", "SAX-PD"]
//! ```

use std::collections::BTreeSet;

use crate::error::ParseError;

/// Seam to whatever understands license expressions.
pub trait ExpressionParser: Send + Sync {
    /// Flattened, deduplicated license terms referenced by `expression`.
    fn extract_identifiers(&self, expression: &str) -> Result<Vec<String>, ParseError>;
}

/// Strict SPDX expression grammar: operators are upper-case and
/// whitespace-delimited, `AND` binds tighter than `OR`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpdxExpressionParser;

impl ExpressionParser for SpdxExpressionParser {
    fn extract_identifiers(&self, expression: &str) -> Result<Vec<String>, ParseError> {
        let tokens = tokenize(expression)?;
        if tokens.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut parser = Parser { tokens: &tokens, pos: 0, terms: BTreeSet::new() };
        parser.parse_or()?;
        if let Some(token) = parser.peek() {
            return Err(match token.kind {
                Kind::RParen => ParseError::UnbalancedParen { offset: token.offset },
                _ => unexpected("an operator", token),
            });
        }

        Ok(parser.terms.into_iter().collect())
    }
}

// ─── Tokenizer ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Kind {
    Identifier { text: String, or_later: bool },
    And,
    Or,
    With,
    LParen,
    RParen,
}

#[derive(Debug, Clone)]
struct Token {
    kind: Kind,
    offset: usize,
}

impl Token {
    fn text(&self) -> String {
        match &self.kind {
            Kind::Identifier { text, or_later } => {
                if *or_later {
                    format!("{}+", text)
                } else {
                    text.clone()
                }
            }
            Kind::And => "AND".to_string(),
            Kind::Or => "OR".to_string(),
            Kind::With => "WITH".to_string(),
            Kind::LParen => "(".to_string(),
            Kind::RParen => ")".to_string(),
        }
    }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == ':'
}

fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token { kind: Kind::LParen, offset });
            }
            ')' => {
                chars.next();
                tokens.push(Token { kind: Kind::RParen, offset });
            }
            '+' => return Err(ParseError::MisplacedPlus { offset }),
            c if is_id_char(c) => {
                let mut text = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if !is_id_char(c) {
                        break;
                    }
                    text.push(c);
                    chars.next();
                }

                let mut or_later = false;
                if let Some(&(plus_offset, '+')) = chars.peek() {
                    chars.next();
                    match chars.peek() {
                        None => {}
                        Some(&(_, c)) if c.is_whitespace() || c == ')' => {}
                        Some(_) => return Err(ParseError::MisplacedPlus { offset: plus_offset }),
                    }
                    or_later = true;
                }

                let kind = match text.as_str() {
                    "AND" if !or_later => Kind::And,
                    "OR" if !or_later => Kind::Or,
                    "WITH" if !or_later => Kind::With,
                    _ => Kind::Identifier { text, or_later },
                };
                tokens.push(Token { kind, offset });
            }
            ch => return Err(ParseError::UnexpectedChar { ch, offset }),
        }
    }

    Ok(tokens)
}

// ─── Parser ────────────────────────────────────────────────────────

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    terms: BTreeSet<String>,
}

fn unexpected(expected: &'static str, token: &Token) -> ParseError {
    ParseError::UnexpectedToken {
        expected,
        found: token.text(),
        offset: token.offset,
    }
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    // or-expr  := and-expr ("OR" and-expr)*
    fn parse_or(&mut self) -> Result<(), ParseError> {
        self.parse_and()?;
        while matches!(self.peek().map(|t| &t.kind), Some(Kind::Or)) {
            self.pos += 1;
            self.parse_and()?;
        }
        Ok(())
    }

    // and-expr := primary ("AND" primary)*
    fn parse_and(&mut self) -> Result<(), ParseError> {
        self.parse_primary()?;
        while matches!(self.peek().map(|t| &t.kind), Some(Kind::And)) {
            self.pos += 1;
            self.parse_primary()?;
        }
        Ok(())
    }

    // primary  := "(" or-expr ")" | license-id ["WITH" exception-id]
    fn parse_primary(&mut self) -> Result<(), ParseError> {
        let token = self
            .next()
            .ok_or(ParseError::UnexpectedEnd { expected: "a license identifier" })?;

        match &token.kind {
            Kind::LParen => {
                self.parse_or()?;
                match self.next() {
                    Some(Token { kind: Kind::RParen, .. }) => Ok(()),
                    Some(other) => Err(unexpected("')'", other)),
                    None => Err(ParseError::UnbalancedParen { offset: token.offset }),
                }
            }
            Kind::Identifier { .. } => {
                let license = token.text();
                if matches!(self.peek().map(|t| &t.kind), Some(Kind::With)) {
                    self.pos += 1;
                    let exception = self
                        .next()
                        .ok_or(ParseError::UnexpectedEnd { expected: "an exception identifier" })?;
                    match &exception.kind {
                        Kind::Identifier { text, or_later: false } => {
                            self.terms.insert(format!("{} WITH {}", license, text));
                        }
                        _ => return Err(unexpected("an exception identifier", exception)),
                    }
                } else {
                    self.terms.insert(license);
                }
                Ok(())
            }
            Kind::RParen => Err(ParseError::UnbalancedParen { offset: token.offset }),
            _ => Err(unexpected("a license identifier", token)),
        }
    }
}
