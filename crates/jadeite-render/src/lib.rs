//! jadeite Renderer
//!
//! Serializes a parsed [`Template`] into markup through a [`TagWriter`].
//!
//! ```text
//! Template AST → render_with(options) → String
//! ```
//!
//! The defaults reproduce compact output (`<ul><li>one</li><li>two</li></ul>`);
//! [`RenderOptions::pretty`] adds line breaks and two-space indentation.

pub mod html;
pub mod writer;

use std::collections::BTreeSet;

use jadeite_parser::Template;

pub use writer::{encode, TagWriter};

/// Render a template with default options.
pub fn render(template: &Template) -> Result<String, RenderError> {
    render_with(template, &RenderOptions::default())
}

/// Render a template with the given options.
pub fn render_with(template: &Template, options: &RenderOptions) -> Result<String, RenderError> {
    html::generate(template, options)
}

/// Render error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The node parses but has no rendering.
    #[error("Cannot render {node}: not supported")]
    Unsupported { node: String },

    #[error("Attribute {name:?} written outside of a start tag")]
    AttributeOutsideStartTag { name: String },

    #[error("End tag written with no open element")]
    UnbalancedEndTag,
}

/// How `if` / `else` blocks are rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConditionalMode {
    /// Render only the else-branch, never looking at the predicate.
    #[default]
    ElseBranch,

    /// Treat every predicate as true.
    ThenBranch,

    /// A predicate is true when its text names one of these flags.
    /// `!flag` is true when the flag is not defined.
    Flags(BTreeSet<String>),
}

impl ConditionalMode {
    /// Whether the then-branch is chosen for `predicate`.
    pub fn takes_then_branch(&self, predicate: &str) -> bool {
        match self {
            ConditionalMode::ElseBranch => false,
            ConditionalMode::ThenBranch => true,
            ConditionalMode::Flags(flags) => {
                let predicate = predicate.trim();
                match predicate.strip_prefix('!') {
                    Some(negated) => !flags.contains(negated.trim()),
                    None => flags.contains(predicate),
                }
            }
        }
    }
}

/// Renderer configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Written once per nesting level after every line break.
    pub indent_unit: String,
    /// Written before a tag that follows a closed tag.
    pub newline_marker: String,
    /// Escape text and attribute values.
    pub auto_encode: bool,
    pub conditionals: ConditionalMode,
}

impl RenderOptions {
    /// Line breaks and two-space indentation.
    pub fn pretty() -> Self {
        Self {
            indent_unit: "  ".into(),
            newline_marker: "\n".into(),
            ..Self::default()
        }
    }
}
