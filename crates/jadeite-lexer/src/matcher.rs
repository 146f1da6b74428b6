//! Token matchers and the ordered grammar that applies them.
//!
//! Each matcher is attempted transactionally against a [`CharCursor`]: on
//! success the cursor stays advanced past the token, on failure it is left
//! exactly where it was. The order of the [`Grammar`] list is the token
//! precedence: the first matcher that succeeds at a position wins.

use crate::cursor::CharCursor;
use crate::token::{Token, TokenKind};
use crate::LexerError;

/// A single token recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Delimited string without escapes. Fails if the closing delimiter is missing.
    QuotedString { delimiter: char },
    /// Fixed literal, matched anywhere (also inside words).
    Symbol { kind: TokenKind, literal: Vec<char> },
    /// Fixed literal that must not be followed by another word character.
    Keyword { kind: TokenKind, literal: Vec<char> },
    /// Run of spaces and tabs. Line feeds are left to the `NewLine` symbol.
    WhiteSpace,
    /// Everything else, up to whitespace or the start of a symbol.
    Word,
}

impl Matcher {
    pub fn quoted(delimiter: &str) -> Result<Self, LexerError> {
        let mut chars = delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(delimiter), None) => Ok(Matcher::QuotedString { delimiter }),
            _ => Err(LexerError::MalformedLiteral {
                literal: delimiter.to_string(),
                message: "a string delimiter must be exactly one character".into(),
            }),
        }
    }

    pub fn symbol(kind: TokenKind, literal: &str) -> Result<Self, LexerError> {
        Ok(Matcher::Symbol {
            kind,
            literal: checked_literal(literal)?,
        })
    }

    pub fn keyword(kind: TokenKind, literal: &str) -> Result<Self, LexerError> {
        Ok(Matcher::Keyword {
            kind,
            literal: checked_literal(literal)?,
        })
    }

    /// Attempt a match, consuming the token on success and nothing on failure.
    ///
    /// `symbols` are the symbol matchers used as word and keyword delimiters.
    pub fn try_match(&self, cursor: &mut CharCursor<'_>, symbols: &[Matcher]) -> Option<Token> {
        if cursor.is_at_end() {
            return None;
        }
        cursor.attempt(|c| self.match_here(c, symbols))
    }

    fn match_here(&self, cursor: &mut CharCursor<'_>, symbols: &[Matcher]) -> Option<Token> {
        let start = cursor.position();

        match self {
            Matcher::QuotedString { delimiter } => {
                if cursor.current() != Some(*delimiter) {
                    return None;
                }
                cursor.consume();

                let mut text = String::new();
                while let Some(ch) = cursor.current() {
                    if ch == *delimiter {
                        cursor.consume();
                        return Some(Token::new(TokenKind::QuotedString, text, start));
                    }
                    text.push(ch);
                    cursor.consume();
                }
                None
            }

            Matcher::Symbol { kind, literal } => {
                consume_literal(cursor, literal)?;
                Some(Token::new(*kind, literal.iter().collect::<String>(), start))
            }

            Matcher::Keyword { kind, literal } => {
                consume_literal(cursor, literal)?;
                let delimited = match cursor.current() {
                    None => true,
                    Some(ch) if ch.is_whitespace() => true,
                    Some(_) => starts_symbol(cursor, symbols),
                };
                delimited.then(|| Token::new(*kind, literal.iter().collect::<String>(), start))
            }

            Matcher::WhiteSpace => {
                let begin = start.index;
                while cursor.current().is_some_and(is_inline_whitespace) {
                    cursor.consume();
                }
                let text = cursor.since(begin);
                (!text.is_empty()).then(|| Token::new(TokenKind::WhiteSpace, text, start))
            }

            Matcher::Word => {
                let begin = start.index;
                while let Some(ch) = cursor.current() {
                    if ch.is_whitespace() || starts_symbol(cursor, symbols) {
                        break;
                    }
                    cursor.consume();
                }
                let text = cursor.since(begin);
                (!text.is_empty()).then(|| Token::new(TokenKind::Word, text, start))
            }
        }
    }
}

fn checked_literal(literal: &str) -> Result<Vec<char>, LexerError> {
    if literal.is_empty() {
        return Err(LexerError::MalformedLiteral {
            literal: String::new(),
            message: "the literal cannot be an empty string".into(),
        });
    }
    Ok(literal.chars().collect())
}

fn consume_literal(cursor: &mut CharCursor<'_>, literal: &[char]) -> Option<()> {
    for expected in literal {
        if cursor.current() != Some(*expected) {
            return None;
        }
        cursor.consume();
    }
    Some(())
}

/// Whether any symbol matches at the cursor. Never moves the cursor.
fn starts_symbol(cursor: &mut CharCursor<'_>, symbols: &[Matcher]) -> bool {
    symbols
        .iter()
        .any(|symbol| cursor.lookahead(|c| symbol.match_here(c, symbols)))
}

fn is_inline_whitespace(ch: char) -> bool {
    ch != '\n' && ch.is_whitespace()
}

/// An ordered list of matchers. The order is part of the grammar.
#[derive(Debug, Clone)]
pub struct Grammar {
    matchers: Vec<Matcher>,
    symbols: Vec<Matcher>,
}

impl Grammar {
    /// Build a grammar from matchers in precedence order.
    pub fn new(matchers: Vec<Matcher>) -> Self {
        let symbols = matchers
            .iter()
            .filter(|m| matches!(m, Matcher::Symbol { .. }))
            .cloned()
            .collect();
        Self { matchers, symbols }
    }

    /// The template grammar: quoted strings, symbols, keywords, whitespace, words.
    pub fn standard() -> Result<Self, LexerError> {
        let mut matchers = vec![Matcher::quoted("\"")?, Matcher::quoted("'")?];

        for kind in TokenKind::SYMBOLS {
            matchers.push(Matcher::symbol(*kind, kind.literal().unwrap_or_default())?);
        }
        for kind in TokenKind::KEYWORDS {
            matchers.push(Matcher::keyword(*kind, kind.literal().unwrap_or_default())?);
        }

        matchers.push(Matcher::WhiteSpace);
        matchers.push(Matcher::Word);

        Ok(Self::new(matchers))
    }

    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    /// Try every matcher in order and return the first token produced.
    pub fn next_token(&self, cursor: &mut CharCursor<'_>) -> Option<Token> {
        self.matchers
            .iter()
            .find_map(|matcher| matcher.try_match(cursor, &self.symbols))
    }
}
