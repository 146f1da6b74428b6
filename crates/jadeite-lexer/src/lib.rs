//! jadeite Lexer
//!
//! Tokenizes indentation-significant template source into a flat stream of
//! typed tokens with line/column positions. Recognition is driven by an
//! ordered list of matchers applied through a backtracking character cursor;
//! the order of that list is the token precedence.
//!
//! # Example
//!
//! ```
//! use jadeite_lexer::{Lexer, TokenKind};
//!
//! let tokens = Lexer::tokenize("p.lead Hello").unwrap();
//! assert_eq!(tokens[0].kind, TokenKind::Word);
//! assert_eq!(tokens[1].kind, TokenKind::Dot);
//! ```

pub mod cursor;
pub mod lexer;
pub mod matcher;
pub mod token;

pub use cursor::{CharCursor, Cursor};
pub use lexer::{normalize, Lexer};
pub use matcher::{Grammar, Matcher};
pub use token::{Position, Token, TokenKind};

/// Lexer error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    /// A matcher was configured with an unusable literal.
    #[error("Malformed literal {literal:?}: {message}")]
    MalformedLiteral { literal: String, message: String },

    /// No matcher accepted the character at this position.
    #[error("Lexer error at line {line}, column {column}: unrecognized character {character:?}")]
    UnrecognizedCharacter {
        character: char,
        line: usize,
        column: usize,
    },
}
