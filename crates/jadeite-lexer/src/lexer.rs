use crate::cursor::CharCursor;
use crate::matcher::Grammar;
use crate::token::Token;
use crate::LexerError;

/// Template lexer.
///
/// Applies the [`Grammar`] at every position of the source and yields tokens
/// lazily. The iterator is finite and not restartable: it stops at the end of
/// input, or after yielding one error when no matcher accepts a position.
pub struct Lexer<'a> {
    cursor: CharCursor<'a>,
    grammar: &'a Grammar,
    failed: bool,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over already-normalized characters.
    pub fn new(chars: &'a [char], grammar: &'a Grammar) -> Self {
        Self {
            cursor: CharCursor::new(chars),
            grammar,
            failed: false,
        }
    }

    /// Tokenize a whole source string with the standard grammar.
    ///
    /// Carriage returns are stripped first, so CRLF and LF sources produce
    /// identical token streams.
    pub fn tokenize(source: &str) -> Result<Vec<Token>, LexerError> {
        Self::tokenize_chars(&normalize(source))
    }

    /// Tokenize already-normalized characters with the standard grammar.
    ///
    /// Token positions index into `chars`, so callers holding on to them can
    /// slice the exact source text back out.
    pub fn tokenize_chars(chars: &[char]) -> Result<Vec<Token>, LexerError> {
        let grammar = Grammar::standard()?;
        let tokens = Lexer::new(chars, &grammar).collect::<Result<Vec<_>, _>>()?;
        log::debug!("lexed {} characters into {} tokens", chars.len(), tokens.len());
        Ok(tokens)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor.is_at_end() {
            return None;
        }

        match self.grammar.next_token(&mut self.cursor) {
            Some(token) => {
                log::trace!("{} {:?} {:?}", token.position, token.kind, token.text);
                Some(Ok(token))
            }
            None => {
                self.failed = true;
                let position = self.cursor.position();
                Some(Err(LexerError::UnrecognizedCharacter {
                    character: self.cursor.current().unwrap_or_default(),
                    line: position.line,
                    column: position.column,
                }))
            }
        }
    }
}

/// Strip carriage returns and split into characters.
pub fn normalize(source: &str) -> Vec<char> {
    source.chars().filter(|&c| c != '\r').collect()
}
