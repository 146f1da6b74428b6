//! Template parser.
//!
//! Works line by line: the token stream is cut into lines, the lines are
//! grouped by indentation, and every group is parsed by one production. The
//! production for a line decides what its nested group means: child
//! elements, a text block, a conditional branch or comment body.

use crate::ast::{
    Attribute, Comment, Conditional, Content, DocType, Element, Marker, Tag, Template,
};
use crate::lines::{group_by_indent, indent_of, is_blank, LineGroup};
use crate::stream::TokenStream;
use crate::ParseError;
use jadeite_lexer::{normalize, Lexer, Token, TokenKind};

/// Tag name used when a line starts with a selector instead of a name.
const DEFAULT_TAG: &str = "div";

/// Tokens that can start a tag line.
const TAG_START: &[TokenKind] = &[TokenKind::Word, TokenKind::Dot, TokenKind::HashTag];

/// Recursive-descent template parser over a lexed token slice.
pub struct Parser<'a> {
    tokens: &'a [Token],
    source: &'a [char],
}

impl<'a> Parser<'a> {
    /// Create a parser for tokens lexed from the normalized `source`.
    pub fn new(tokens: &'a [Token], source: &'a [char]) -> Self {
        Self { tokens, source }
    }

    /// Lex and parse template source.
    pub fn parse(source: &str) -> Result<Template, ParseError> {
        let chars = normalize(source);
        let tokens = Lexer::tokenize_chars(&chars)?;
        Parser::new(&tokens, &chars).parse_template()
    }

    /// Parse the whole token slice.
    pub fn parse_template(&self) -> Result<Template, ParseError> {
        let lines = TokenStream::new(self.tokens, self.source).get_lines();

        let (doc_type, body) = match lines.split_first() {
            Some((first, rest)) if first.is(TokenKind::Doctype) => {
                let mut line = first.clone();
                (Some(self.parse_doctype(&mut line)?), rest)
            }
            _ => (None, &lines[..]),
        };

        let groups = group_by_indent(body);
        let elements = self.parse_groups(&groups)?;
        log::debug!(
            "parsed {} lines into {} top-level elements",
            lines.len(),
            elements.len()
        );

        Ok(Template { doc_type, elements })
    }

    /// `doctype <keyword>`
    fn parse_doctype(&self, line: &mut TokenStream<'a>) -> Result<DocType, ParseError> {
        line.expect(TokenKind::Doctype)?;
        line.expect(TokenKind::WhiteSpace)?;
        let rest = line.rest_raw();
        let keyword = rest.trim();
        if keyword.is_empty() {
            return Err(ParseError::UnexpectedEnd);
        }
        Ok(DocType::new(keyword))
    }

    // =========================================================================
    // Groups
    // =========================================================================

    /// Parse sibling groups into elements. Blank lines are skipped; an `if`
    /// claims the `else` sibling that directly follows it at the same indent.
    fn parse_groups(&self, groups: &[LineGroup<'a>]) -> Result<Vec<Element>, ParseError> {
        let mut elements = Vec::new();
        let mut i = 0;

        while i < groups.len() {
            let group = &groups[i];
            i += 1;
            if group.is_blank() {
                continue;
            }

            let mut line = group.line.clone();
            line.skip_whitespace();

            if line.is(TokenKind::If) {
                let mut conditional = self.parse_conditional(&mut line, group)?;
                if let Some(offset) = else_sibling(&groups[i..], group.indent) {
                    conditional.else_branch = self.parse_else(&groups[i + offset])?;
                    i += offset + 1;
                }
                elements.push(Element::Conditional(conditional));
            } else {
                elements.push(self.parse_line(&mut line, group)?);
            }
        }

        Ok(elements)
    }

    /// Parse one non-blank line and its nested group. The line must be
    /// consumed completely.
    fn parse_line(
        &self,
        line: &mut TokenStream<'a>,
        group: &LineGroup<'a>,
    ) -> Result<Element, ParseError> {
        let Some(token) = line.current() else {
            return Err(line.unexpected());
        };

        let element = match token.kind {
            TokenKind::Comment | TokenKind::JadeComment => self.parse_comment(line, group),
            TokenKind::Each => self.parse_marker(line, group).map(Element::Each),
            TokenKind::Mixin => self.parse_marker(line, group).map(Element::Mixin),
            TokenKind::Include => self.parse_marker(line, group).map(Element::Include),
            TokenKind::Word if is_for(line) => self.parse_marker(line, group).map(Element::For),
            TokenKind::Pipe => self.parse_piped_text(line, group),
            TokenKind::Word | TokenKind::Dot | TokenKind::HashTag => {
                self.parse_tag(line, group).map(Element::Tag)
            }
            _ => Err(line.unexpected()),
        }?;

        if !line.is_at_end() {
            return Err(line.unexpected());
        }
        log::trace!("line {}: {}", token.line(), element.kind_name());
        Ok(element)
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// `name? (.class | #id)* (attrs)? (.class | #id)* content?`
    fn parse_tag(&self, line: &mut TokenStream<'a>, group: &LineGroup<'a>) -> Result<Tag, ParseError> {
        let mut tag = Tag::new(DEFAULT_TAG);
        if line.is(TokenKind::Word) {
            tag.name = line.get()?.to_string();
        }

        self.parse_selectors(line, &mut tag)?;
        if line.is(TokenKind::OpenParenth) {
            self.parse_attributes(line, &mut tag)?;
        }
        self.parse_selectors(line, &mut tag)?;

        match line.current().map(|t| t.kind) {
            None => {
                tag.children = self.parse_groups(&group.children)?;
            }
            Some(TokenKind::InlineValue | TokenKind::Equals) => {
                line.consume();
                line.skip_whitespace();
                let expression = line.rest_raw().trim_end().to_string();
                if expression.is_empty() {
                    return Err(ParseError::UnexpectedEnd);
                }
                tag.content = Some(Content::Expression(expression));
                tag.children = self.parse_groups(&group.children)?;
            }
            Some(TokenKind::WhiteSpace) => {
                line.consume();
                let text = line.rest_raw().trim_end().to_string();
                if !text.is_empty() {
                    tag.content = Some(Content::Text(text));
                }
                tag.children = self.parse_groups(&group.children)?;
            }
            Some(TokenKind::Block) => {
                line.consume();
                let text = block_text(group);
                if !text.is_empty() {
                    tag.content = Some(Content::Text(text));
                }
            }
            Some(TokenKind::Colon) => {
                line.consume();
                line.skip_whitespace();
                if !line.is_any(TAG_START) {
                    return Err(line.unexpected());
                }
                // The nested tag receives the indented lines.
                let nested = self.parse_tag(line, group)?;
                tag.children = vec![Element::Tag(nested)];
            }
            Some(_) => return Err(line.unexpected()),
        }

        Ok(tag)
    }

    /// `.class` and `#id` in any order. Only one id per tag.
    fn parse_selectors(&self, line: &mut TokenStream<'a>, tag: &mut Tag) -> Result<(), ParseError> {
        loop {
            if line.is(TokenKind::Dot) {
                line.consume();
                // `p.` at the very end of input: an empty text block.
                if line.is_at_end() {
                    return Ok(());
                }
                tag.classes.push(expect_name(line)?);
            } else if line.is(TokenKind::HashTag) {
                if tag.id.is_some() {
                    return Err(line.unexpected());
                }
                line.consume();
                tag.id = Some(expect_name(line)?);
            } else {
                return Ok(());
            }
        }
    }

    /// `( name="value" [,] ... )`
    fn parse_attributes(&self, line: &mut TokenStream<'a>, tag: &mut Tag) -> Result<(), ParseError> {
        line.expect(TokenKind::OpenParenth)?;

        loop {
            while line.is_any(&[TokenKind::WhiteSpace, TokenKind::Comma]) {
                line.consume();
            }
            if line.is(TokenKind::CloseParenth) {
                line.consume();
                return Ok(());
            }

            let attribute = self.parse_attribute(line)?;
            if attribute.name.eq_ignore_ascii_case("class") {
                tag.classes.push(attribute.value);
            } else {
                tag.attributes.push(attribute);
            }
        }
    }

    /// `name = "value"`
    fn parse_attribute(&self, line: &mut TokenStream<'a>) -> Result<Attribute, ParseError> {
        let name = expect_name(line)?;
        line.skip_whitespace();
        line.get_any(&[TokenKind::Equals, TokenKind::InlineValue])?;
        line.skip_whitespace();
        let value = line.get_any(&[TokenKind::QuotedString])?;
        Ok(Attribute::new(name, value))
    }

    // =========================================================================
    // Conditionals
    // =========================================================================

    /// `if <predicate>` with the nested group as the then-branch.
    fn parse_conditional(
        &self,
        line: &mut TokenStream<'a>,
        group: &LineGroup<'a>,
    ) -> Result<Conditional, ParseError> {
        line.expect(TokenKind::If)?;
        line.expect(TokenKind::WhiteSpace)?;
        let predicate = line.rest_raw().trim_end().to_string();
        if predicate.is_empty() {
            return Err(ParseError::UnexpectedEnd);
        }

        Ok(Conditional {
            predicate,
            then_branch: self.parse_groups(&group.children)?,
            else_branch: Vec::new(),
        })
    }

    /// A bare `else` line; its nested group is the else-branch.
    fn parse_else(&self, group: &LineGroup<'a>) -> Result<Vec<Element>, ParseError> {
        let mut line = group.line.clone();
        line.skip_whitespace();
        line.expect(TokenKind::Else)?;
        line.skip_whitespace();
        if !line.is_at_end() {
            return Err(line.unexpected());
        }
        self.parse_groups(&group.children)
    }

    // =========================================================================
    // Text, comments and markers
    // =========================================================================

    /// `| text`
    fn parse_piped_text(
        &self,
        line: &mut TokenStream<'a>,
        group: &LineGroup<'a>,
    ) -> Result<Element, ParseError> {
        line.expect(TokenKind::Pipe)?;
        if line.is(TokenKind::WhiteSpace) {
            line.consume();
        }

        if let Some(child) = group.children.iter().find(|c| !c.is_blank()) {
            let mut nested = child.line.clone();
            nested.skip_whitespace();
            return Err(nested.unexpected());
        }

        Ok(Element::Text(line.rest_raw().trim_end().to_string()))
    }

    /// `// text` or `//- text`, with nested lines appended to the text.
    fn parse_comment(
        &self,
        line: &mut TokenStream<'a>,
        group: &LineGroup<'a>,
    ) -> Result<Element, ParseError> {
        let buffered = line.is(TokenKind::Comment);
        line.get_any(&[TokenKind::Comment, TokenKind::JadeComment])?;

        let mut text = line.rest_raw().trim_end().to_string();
        let body = block_text(group);
        if !body.is_empty() {
            text.push('\n');
            text.push_str(&body);
        }

        Ok(Element::Comment(Comment { text, buffered }))
    }

    /// `each`, `for`, `mixin`, `include`: the rest of the line is kept
    /// verbatim as the argument and nested lines become the body.
    fn parse_marker(
        &self,
        line: &mut TokenStream<'a>,
        group: &LineGroup<'a>,
    ) -> Result<Marker, ParseError> {
        line.get()?;
        line.skip_whitespace();
        let argument = line.rest_raw().trim_end().to_string();
        if argument.is_empty() {
            return Err(ParseError::UnexpectedEnd);
        }

        Ok(Marker {
            argument,
            children: self.parse_groups(&group.children)?,
        })
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Class, id and attribute names: a word, or a keyword used as a plain name.
fn expect_name(line: &mut TokenStream<'_>) -> Result<String, ParseError> {
    match line.current() {
        Some(token)
            if token.kind == TokenKind::Word
                || (token.kind.is_keyword() && token.kind != TokenKind::Var) =>
        {
            line.consume();
            Ok(token.text.clone())
        }
        _ => Err(line.unexpected()),
    }
}

/// `for` is not a keyword token: a leading word `for` followed by whitespace.
fn is_for(line: &TokenStream<'_>) -> bool {
    line.current().is_some_and(|t| t.text == "for")
        && line.peek(1).is_some_and(|t| t.kind == TokenKind::WhiteSpace)
}

/// Offset of an `else` group directly following (blank lines aside) at `indent`.
fn else_sibling(groups: &[LineGroup<'_>], indent: usize) -> Option<usize> {
    let offset = groups.iter().position(|g| !g.is_blank())?;
    let group = &groups[offset];
    let mut line = group.line.clone();
    line.skip_whitespace();
    (group.indent == indent && line.is(TokenKind::Else)).then_some(offset)
}

/// Nested lines of a group as literal text. The first non-blank line sets
/// the base indent, which is stripped from every physical line, including
/// those inside a quoted string that spans lines.
fn block_text(group: &LineGroup<'_>) -> String {
    let lines = group.descendants();
    let base = lines
        .iter()
        .find(|line| !is_blank(line))
        .map(|line| indent_of(line))
        .unwrap_or(0);

    let mut physical = Vec::new();
    for line in &lines {
        if is_blank(line) {
            physical.push(String::new());
            continue;
        }
        physical.extend(line.as_raw().split('\n').map(|raw| strip_indent(raw, base)));
    }

    physical.join("\n").trim_end().to_string()
}

/// Remove up to `width` leading whitespace characters.
fn strip_indent(raw: &str, width: usize) -> String {
    let skip = raw
        .chars()
        .take(width)
        .take_while(|c| c.is_whitespace())
        .count();
    raw.chars().skip(skip).collect()
}
