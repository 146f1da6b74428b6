use std::fmt;

/// A position in source text: absolute character offset plus 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(index: usize, line: usize, column: usize) -> Self {
        Self {
            index,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Token classification for template source.
///
/// The set is closed. Value-carrying kinds (`WhiteSpace`, `Word`, `QuotedString`)
/// keep their matched text on the [`Token`]; every other kind carries its
/// canonical literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Sentinel. Never produced by the lexer.
    Eof,
    WhiteSpace,
    Word,
    QuotedString,

    // Symbols
    OpenBracket,  // {
    CloseBracket, // }
    Plus,         // +
    InlineValue,  // "= "
    Equals,       // =
    HashTag,      // #
    Comma,        // ,
    OpenParenth,  // (
    CloseParenth, // )
    Comment,      // //
    JadeComment,  // //-
    Bang,         // !
    Pipe,         // |
    Colon,        // :
    Block,        // ".\n"
    Dot,          // .
    NewLine,      // \n

    // Keywords
    Doctype,
    Case,
    When,
    Default,
    If,
    Else,
    Var,
    Each,
    Mixin,
    Include,
    Class,
}

impl TokenKind {
    /// Symbol kinds in lexer precedence order.
    ///
    /// Longer literals sharing a prefix with a shorter one come first.
    pub const SYMBOLS: &'static [TokenKind] = &[
        TokenKind::OpenBracket,
        TokenKind::CloseBracket,
        TokenKind::Plus,
        TokenKind::InlineValue,
        TokenKind::Equals,
        TokenKind::HashTag,
        TokenKind::Comma,
        TokenKind::OpenParenth,
        TokenKind::CloseParenth,
        TokenKind::JadeComment,
        TokenKind::Comment,
        TokenKind::Bang,
        TokenKind::Pipe,
        TokenKind::Colon,
        TokenKind::Block,
        TokenKind::Dot,
        TokenKind::NewLine,
    ];

    /// Keyword kinds in lexer precedence order.
    pub const KEYWORDS: &'static [TokenKind] = &[
        TokenKind::Doctype,
        TokenKind::Case,
        TokenKind::When,
        TokenKind::Default,
        TokenKind::If,
        TokenKind::Else,
        TokenKind::Var,
        TokenKind::Each,
        TokenKind::Mixin,
        TokenKind::Include,
        TokenKind::Class,
    ];

    /// The canonical literal for symbol and keyword kinds.
    pub fn literal(self) -> Option<&'static str> {
        let literal = match self {
            TokenKind::Eof
            | TokenKind::WhiteSpace
            | TokenKind::Word
            | TokenKind::QuotedString => return None,
            TokenKind::OpenBracket => "{",
            TokenKind::CloseBracket => "}",
            TokenKind::Plus => "+",
            TokenKind::InlineValue => "= ",
            TokenKind::Equals => "=",
            TokenKind::HashTag => "#",
            TokenKind::Comma => ",",
            TokenKind::OpenParenth => "(",
            TokenKind::CloseParenth => ")",
            TokenKind::Comment => "//",
            TokenKind::JadeComment => "//-",
            TokenKind::Bang => "!",
            TokenKind::Pipe => "|",
            TokenKind::Colon => ":",
            TokenKind::Block => ".\n",
            TokenKind::Dot => ".",
            TokenKind::NewLine => "\n",
            TokenKind::Doctype => "doctype",
            TokenKind::Case => "case",
            TokenKind::When => "when",
            TokenKind::Default => "default",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Var => "- var",
            TokenKind::Each => "each",
            TokenKind::Mixin => "mixin",
            TokenKind::Include => "include",
            TokenKind::Class => "class",
        };
        Some(literal)
    }

    pub fn is_keyword(self) -> bool {
        Self::KEYWORDS.contains(&self)
    }
}

/// A token produced by the lexer. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }

    /// Number of source characters the token was lexed from.
    ///
    /// Quoted strings add their two delimiters to the inner text.
    pub fn source_len(&self) -> usize {
        let len = self.text.chars().count();
        match self.kind {
            TokenKind::QuotedString => len + 2,
            _ => len,
        }
    }

    /// Character offset just past the token in the source.
    pub fn end(&self) -> usize {
        self.position.index + self.source_len()
    }
}
