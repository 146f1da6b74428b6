//! Abstract Syntax Tree for jadeite templates.
//!
//! A template is a forest of [`Element`]s plus an optional document type.
//! Each tree node is exclusively owned by its parent; nothing is shared.

use std::borrow::Cow;

/// A complete parsed template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Template {
    pub doc_type: Option<DocType>,
    pub elements: Vec<Element>,
}

/// The keyword given after `doctype`, such as `html` or `strict`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocType(String);

impl DocType {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self(keyword.into())
    }

    pub fn keyword(&self) -> &str {
        &self.0
    }

    /// The declaration emitted for this doctype.
    ///
    /// Known keywords map to their full XHTML declarations. Anything else is
    /// emitted as `<!DOCTYPE keyword>`.
    pub fn literal(&self) -> Cow<'static, str> {
        let known = match self.0.as_str() {
            "xml" => r#"<?xml version="1.0" encoding="utf-8" ?>"#,
            "transitional" => {
                r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">"#
            }
            "strict" => {
                r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd">"#
            }
            "frameset" => {
                r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Frameset//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-frameset.dtd">"#
            }
            "1.1" => {
                r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">"#
            }
            "basic" => {
                r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML Basic 1.1//EN" "http://www.w3.org/TR/xhtml-basic/xhtml-basic11.dtd">"#
            }
            "mobile" => {
                r#"<!DOCTYPE html PUBLIC "-//WAPFORUM//DTD XHTML Mobile 1.2//EN" "http://www.openmobilealliance.org/tech/DTD/xhtml-mobile12.dtd">"#
            }
            other => return Cow::Owned(format!("<!DOCTYPE {other}>")),
        };
        Cow::Borrowed(known)
    }
}

/// A node of the template tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// An element such as `div#main.hello(data="x") text`.
    Tag(Tag),

    /// A lone attribute, written onto whichever tag is open when rendered.
    Attribute(Attribute),

    /// Literal text: piped lines and text content.
    Text(String),

    /// An expression, kept verbatim for an evaluator to interpret.
    Expression(String),

    /// `if` / `else`.
    Conditional(Conditional),

    /// `// text` or `//- text`.
    Comment(Comment),

    /// `each item in items`.
    Each(Marker),

    /// `for item in items`.
    For(Marker),

    /// `mixin name(args)`.
    Mixin(Marker),

    /// `include path`.
    Include(Marker),
}

impl Element {
    /// Node name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Tag(_) => "tag",
            Element::Attribute(_) => "attribute",
            Element::Text(_) => "text",
            Element::Expression(_) => "expression",
            Element::Conditional(_) => "conditional",
            Element::Comment(_) => "comment",
            Element::Each(_) => "each",
            Element::For(_) => "for",
            Element::Mixin(_) => "mixin",
            Element::Include(_) => "include",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tag {
    pub name: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<Attribute>,
    pub content: Option<Content>,
    pub children: Vec<Element>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Inline content of a tag: at most one of text or expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Expression(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditional {
    /// Source text after `if`, unevaluated.
    pub predicate: String,
    pub then_branch: Vec<Element>,
    pub else_branch: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    /// `//` comments are buffered into the output, `//-` ones are not.
    pub buffered: bool,
}

/// A construct that is parsed but has no rendering: its argument text and body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Marker {
    pub argument: String,
    pub children: Vec<Element>,
}
