//! Token stream: the lexer's cursor abstraction, instantiated over tokens.

use crate::ParseError;
use jadeite_lexer::{Cursor, Token, TokenKind};

/// A backtrackable cursor over a slice of tokens.
///
/// Streams are views: [`TokenStream::get_line`] hands out a new stream over a
/// sub-slice of the same tokens, with its own index and snapshot stack.
/// `source` is the normalized text the tokens were lexed from; raw text is
/// sliced out of it, so quotes and spacing come back exactly as written.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    cursor: Cursor<'a, Token>,
    source: &'a [char],
}

impl<'a> TokenStream<'a> {
    pub fn new(tokens: &'a [Token], source: &'a [char]) -> Self {
        Self {
            cursor: Cursor::new(tokens),
            source,
        }
    }

    pub fn source(&self) -> &'a [char] {
        self.source
    }

    /// Every token of the stream, consumed or not.
    pub fn tokens(&self) -> &'a [Token] {
        self.cursor.items()
    }

    pub fn current(&self) -> Option<&'a Token> {
        self.cursor.current()
    }

    pub fn peek(&self, n: usize) -> Option<&'a Token> {
        self.cursor.peek(n)
    }

    pub fn consume(&mut self) {
        self.cursor.consume();
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    pub fn take_snapshot(&mut self) {
        self.cursor.take_snapshot();
    }

    pub fn commit_snapshot(&mut self) {
        self.cursor.commit_snapshot();
    }

    pub fn rollback_snapshot(&mut self) {
        self.cursor.rollback_snapshot();
    }

    /// Whether the current token has `kind`. False at the end of the stream.
    pub fn is(&self, kind: TokenKind) -> bool {
        self.current().is_some_and(|t| t.kind == kind)
    }

    /// Whether the current token has any of `kinds`. False at the end of the stream.
    pub fn is_any(&self, kinds: &[TokenKind]) -> bool {
        self.current().is_some_and(|t| kinds.contains(&t.kind))
    }

    /// Return the current token and advance.
    pub fn next_token(&mut self) -> Result<&'a Token, ParseError> {
        match self.current() {
            None => Err(ParseError::UnexpectedEnd),
            Some(token) if token.kind == TokenKind::Eof => Err(ParseError::InvalidToken),
            Some(token) => {
                self.consume();
                Ok(token)
            }
        }
    }

    /// Return the current token's text and advance.
    pub fn get(&mut self) -> Result<&'a str, ParseError> {
        self.next_token().map(|t| t.text.as_str())
    }

    /// Like [`get`](Self::get), but the current token must have one of `kinds`.
    pub fn get_any(&mut self, kinds: &[TokenKind]) -> Result<&'a str, ParseError> {
        if !self.is_any(kinds) {
            return Err(self.unexpected());
        }
        self.get()
    }

    /// Consume a token of `kind`, or fail with the token found instead.
    pub fn expect(&mut self, kind: TokenKind) -> Result<&'a Token, ParseError> {
        if !self.is(kind) {
            return Err(self.unexpected());
        }
        self.next_token()
    }

    /// The error describing the current token as unexpected.
    pub fn unexpected(&self) -> ParseError {
        match self.current() {
            None => ParseError::UnexpectedEnd,
            Some(token) if token.kind == TokenKind::Eof => ParseError::InvalidToken,
            Some(token) => ParseError::UnexpectedToken {
                text: token.text.clone(),
                line: token.line(),
                column: token.column(),
            },
        }
    }

    pub fn skip_whitespace(&mut self) {
        while self.is(TokenKind::WhiteSpace) {
            self.consume();
        }
    }

    /// Consume everything left and return its source text.
    pub fn rest_raw(&mut self) -> String {
        let text = self.slice_source(self.cursor.remaining());
        while !self.is_at_end() {
            self.consume();
        }
        text
    }

    /// Source text of the whole stream without moving the cursor.
    pub fn as_raw(&self) -> String {
        self.slice_source(self.tokens())
    }

    /// Source characters from the first token to the last. The line feed of
    /// a trailing `Block` marker is left out.
    fn slice_source(&self, tokens: &[Token]) -> String {
        let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
            return String::new();
        };
        let end = match last.kind {
            TokenKind::Block => last.position.index + 1,
            _ => last.end(),
        };
        self.source
            .get(first.position.index..end)
            .map(|chars| chars.iter().collect())
            .unwrap_or_default()
    }

    /// Consume and return the tokens up to the end of the current line.
    ///
    /// A `NewLine` token ends the line and is consumed without being part of
    /// it. A `Block` token ends the line and stays in it, since the block
    /// marker already contains the line feed.
    pub fn get_line(&mut self) -> TokenStream<'a> {
        let tokens = self.cursor.items();
        let start = self.cursor.index();
        let mut end = start;

        while let Some(token) = self.current() {
            match token.kind {
                TokenKind::NewLine => {
                    self.consume();
                    break;
                }
                TokenKind::Block => {
                    self.consume();
                    end += 1;
                    break;
                }
                _ => {
                    self.consume();
                    end += 1;
                }
            }
        }

        TokenStream::new(&tokens[start..end], self.source)
    }

    /// Split the rest of the stream into lines.
    pub fn get_lines(&mut self) -> Vec<TokenStream<'a>> {
        let mut lines = Vec::new();
        while !self.is_at_end() {
            lines.push(self.get_line());
        }
        lines
    }
}
