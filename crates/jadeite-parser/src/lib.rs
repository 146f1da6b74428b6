//! jadeite Parser
//!
//! Turns template source into a [`Template`] AST. The token stream from
//! `jadeite-lexer` is split into lines, the lines are grouped into a tree by
//! indentation, and each group is parsed by a recursive-descent production.
//!
//! Parsing is all-or-nothing: the first error aborts the whole parse and no
//! partial tree is returned.

pub mod ast;
pub mod lines;
pub mod parser;
pub mod stream;

pub use ast::{
    Attribute, Comment, Conditional, Content, DocType, Element, Marker, Tag, Template,
};
pub use lines::{group_by_indent, indent_of, LineGroup};
pub use parser::Parser;
pub use stream::TokenStream;

use jadeite_lexer::LexerError;

/// Parse template source into a [`Template`].
pub fn parse(source: &str) -> Result<Template, ParseError> {
    Parser::parse(source)
}

/// Parser error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// A production required one token kind and found another.
    #[error("Unexpected {text} at line: {line}, column: {column}.")]
    UnexpectedToken {
        text: String,
        line: usize,
        column: usize,
    },

    /// A production required a token but the line or template ran out.
    #[error("Unexpected end of template.")]
    UnexpectedEnd,

    /// The current token is the end-of-input sentinel.
    #[error("Invalid token.")]
    InvalidToken,

    #[error(transparent)]
    Lexer(#[from] LexerError),
}

impl ParseError {
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::UnexpectedToken { line, .. } => Some(*line),
            ParseError::Lexer(LexerError::UnrecognizedCharacter { line, .. }) => Some(*line),
            _ => None,
        }
    }

    pub fn column(&self) -> Option<usize> {
        match self {
            ParseError::UnexpectedToken { column, .. } => Some(*column),
            ParseError::Lexer(LexerError::UnrecognizedCharacter { column, .. }) => Some(*column),
            _ => None,
        }
    }
}
