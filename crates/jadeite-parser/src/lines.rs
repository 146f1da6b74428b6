//! Line grouping by indentation.
//!
//! The template is split into lines first; each line then owns every
//! following line that is indented deeper than itself. Tags, conditionals and
//! text blocks are all parsed from these groups.

use crate::stream::TokenStream;
use jadeite_lexer::TokenKind;

/// One line plus the deeper-indented lines that follow it.
#[derive(Debug, Clone)]
pub struct LineGroup<'a> {
    pub line: TokenStream<'a>,
    /// Indentation used for grouping. For blank lines this is the indent of
    /// the next non-blank line.
    pub indent: usize,
    pub children: Vec<LineGroup<'a>>,
}

impl<'a> LineGroup<'a> {
    pub fn is_blank(&self) -> bool {
        is_blank(&self.line)
    }

    /// Every nested line in source order.
    pub fn descendants(&self) -> Vec<&TokenStream<'a>> {
        let mut lines = Vec::new();
        for child in &self.children {
            collect_lines(child, &mut lines);
        }
        lines
    }
}

fn collect_lines<'g, 'a>(group: &'g LineGroup<'a>, lines: &mut Vec<&'g TokenStream<'a>>) {
    lines.push(&group.line);
    for child in &group.children {
        collect_lines(child, lines);
    }
}

/// Width of the leading whitespace token of a line, in characters.
pub fn indent_of(line: &TokenStream<'_>) -> usize {
    match line.tokens().first() {
        Some(token) if token.kind == TokenKind::WhiteSpace => token.text.chars().count(),
        _ => 0,
    }
}

/// Whether a line holds nothing but whitespace.
pub fn is_blank(line: &TokenStream<'_>) -> bool {
    line.tokens()
        .iter()
        .all(|token| token.kind == TokenKind::WhiteSpace)
}

/// Group lines into a forest by indentation.
///
/// A line becomes a child of the closest preceding line with a smaller
/// indent. Top-level lines sit under an implicit root that accepts any indent.
pub fn group_by_indent<'a>(lines: &[TokenStream<'a>]) -> Vec<LineGroup<'a>> {
    let indents = grouping_indents(lines);
    let mut pos = 0;
    collect_groups(lines, &indents, &mut pos, None)
}

/// Indent of every line, with blank lines taking the indent of the next
/// non-blank line (or 0 when none follows).
fn grouping_indents(lines: &[TokenStream<'_>]) -> Vec<usize> {
    let mut indents = vec![0; lines.len()];
    let mut next = 0;
    for (i, line) in lines.iter().enumerate().rev() {
        if !is_blank(line) {
            next = indent_of(line);
        }
        indents[i] = next;
    }
    indents
}

fn collect_groups<'a>(
    lines: &[TokenStream<'a>],
    indents: &[usize],
    pos: &mut usize,
    baseline: Option<usize>,
) -> Vec<LineGroup<'a>> {
    let mut groups = Vec::new();
    while *pos < lines.len() {
        let indent = indents[*pos];
        if baseline.is_some_and(|base| indent <= base) {
            break;
        }
        let line = lines[*pos].clone();
        *pos += 1;
        let children = collect_groups(lines, indents, pos, Some(indent));
        groups.push(LineGroup {
            line,
            indent,
            children,
        });
    }
    groups
}
