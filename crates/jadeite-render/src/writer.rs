//! Stateful markup writer.
//!
//! A start tag stays open (`<name` without `>`) until something is written
//! inside it, so attributes can still be appended. An element that is closed
//! while its start tag is still open becomes self-closing.

use std::borrow::Cow;

use crate::{RenderError, RenderOptions};

/// Writes tags, attributes and text into a string buffer.
#[derive(Debug, Clone)]
pub struct TagWriter {
    out: String,
    indent_depth: usize,
    indent_unit: String,
    newline_marker: String,
    auto_encode: bool,
    open_tags: Vec<String>,
    /// `>` of the innermost start tag has not been written yet.
    start_tag_open: bool,
    /// A tag was just closed; the next tag starts on a new line.
    pending_newline: bool,
}

impl TagWriter {
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            out: String::new(),
            indent_depth: 0,
            indent_unit: options.indent_unit.clone(),
            newline_marker: options.newline_marker.clone(),
            auto_encode: options.auto_encode,
            open_tags: Vec::new(),
            start_tag_open: false,
            pending_newline: false,
        }
    }

    pub fn depth(&self) -> usize {
        self.indent_depth
    }

    /// Names of the tags opened and not yet closed, outermost first.
    pub fn open_tags(&self) -> &[String] {
        &self.open_tags
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }

    pub fn write_start_tag(&mut self, name: &str) {
        self.close_start_tag();
        if self.pending_newline {
            self.write_newline();
        }
        self.out.push('<');
        self.out.push_str(name);
        self.open_tags.push(name.to_string());
        self.indent_depth += 1;
        self.start_tag_open = true;
    }

    /// Append ` name="value"` to the open start tag.
    pub fn write_attribute(&mut self, name: &str, value: &str) -> Result<(), RenderError> {
        if !self.start_tag_open {
            return Err(RenderError::AttributeOutsideStartTag {
                name: name.to_string(),
            });
        }
        let value = self.maybe_encode(value);
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        self.out.push_str(&value);
        self.out.push('"');
        Ok(())
    }

    /// Write inline text. Text never starts on a new line.
    pub fn write_text(&mut self, value: &str) {
        self.close_start_tag();
        let value = self.maybe_encode(value);
        self.out.push_str(&value);
        self.pending_newline = false;
    }

    /// Write markup verbatim, never encoded.
    pub fn write_raw(&mut self, value: &str) {
        self.close_start_tag();
        self.out.push_str(value);
        self.pending_newline = false;
    }

    /// Write `<!--text-->` on its own line.
    pub fn write_comment(&mut self, text: &str) {
        self.close_start_tag();
        if self.pending_newline {
            self.write_newline();
        }
        self.out.push_str("<!--");
        self.out.push_str(text);
        self.out.push_str("-->");
        self.pending_newline = true;
    }

    /// Close the innermost open tag.
    pub fn write_end_tag(&mut self) -> Result<(), RenderError> {
        let name = self.open_tags.pop().ok_or(RenderError::UnbalancedEndTag)?;
        self.indent_depth -= 1;

        if self.start_tag_open {
            self.out.push_str("/>");
            self.start_tag_open = false;
        } else {
            if self.pending_newline {
                self.write_newline();
            }
            self.out.push_str("</");
            self.out.push_str(&name);
            self.out.push('>');
        }

        self.pending_newline = true;
        Ok(())
    }

    /// `<name>value</name>`
    pub fn write_element_string(&mut self, name: &str, value: &str) -> Result<(), RenderError> {
        self.write_start_tag(name);
        self.write_text(value);
        self.write_end_tag()
    }

    /// Newline marker followed by the indent for the current depth.
    pub fn write_newline(&mut self) {
        self.out.push_str(&self.newline_marker);
        for _ in 0..self.indent_depth {
            self.out.push_str(&self.indent_unit);
        }
        self.pending_newline = false;
    }

    fn close_start_tag(&mut self) {
        if self.start_tag_open {
            self.out.push('>');
            self.start_tag_open = false;
            self.pending_newline = true;
        }
    }

    fn maybe_encode<'v>(&self, value: &'v str) -> Cow<'v, str> {
        if self.auto_encode {
            encode(value)
        } else {
            Cow::Borrowed(value)
        }
    }
}

/// Escape `&`, `<`, `>` and `"`. Returns the input unchanged when there is
/// nothing to escape.
pub fn encode(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(value);
    }

    let mut encoded = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => encoded.push_str("&amp;"),
            '<' => encoded.push_str("&lt;"),
            '>' => encoded.push_str("&gt;"),
            '"' => encoded.push_str("&quot;"),
            _ => encoded.push(ch),
        }
    }
    Cow::Owned(encoded)
}
