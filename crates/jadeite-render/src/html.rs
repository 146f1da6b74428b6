//! Markup generator.
//!
//! Walks the template AST and drives a [`TagWriter`]. Every element variant
//! is matched explicitly; constructs with no rendering fail with
//! [`RenderError::Unsupported`].

use crate::writer::TagWriter;
use crate::{RenderError, RenderOptions};
use jadeite_parser::ast::{Conditional, Content, Element, Tag, Template};

/// Generate markup for a whole template.
pub fn generate(template: &Template, options: &RenderOptions) -> Result<String, RenderError> {
    let mut writer = TagWriter::new(options);

    if let Some(doc_type) = &template.doc_type {
        writer.write_raw(&doc_type.literal());
    }

    for element in &template.elements {
        generate_element(element, &mut writer, options)?;
    }

    let html = writer.into_string();
    log::debug!(
        "rendered {} top-level elements into {} bytes",
        template.elements.len(),
        html.len()
    );
    Ok(html)
}

fn generate_element(
    element: &Element,
    writer: &mut TagWriter,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    match element {
        Element::Tag(tag) => generate_tag(tag, writer, options),
        Element::Attribute(attribute) => writer.write_attribute(&attribute.name, &attribute.value),
        Element::Text(text) | Element::Expression(text) => {
            writer.write_text(text);
            Ok(())
        }
        Element::Conditional(conditional) => generate_conditional(conditional, writer, options),
        Element::Comment(comment) => {
            if comment.buffered {
                writer.write_comment(&comment.text);
            }
            Ok(())
        }
        Element::Each(_) | Element::For(_) | Element::Mixin(_) | Element::Include(_) => {
            Err(RenderError::Unsupported {
                node: element.kind_name().to_string(),
            })
        }
    }
}

fn generate_tag(tag: &Tag, writer: &mut TagWriter, options: &RenderOptions) -> Result<(), RenderError> {
    let bare = tag.id.is_none()
        && tag.classes.is_empty()
        && tag.attributes.is_empty()
        && tag.children.is_empty();
    if let (true, Some(Content::Text(text) | Content::Expression(text))) = (bare, &tag.content) {
        return writer.write_element_string(&tag.name, text);
    }

    writer.write_start_tag(&tag.name);

    if let Some(id) = &tag.id {
        writer.write_attribute("id", id)?;
    }
    if !tag.classes.is_empty() {
        writer.write_attribute("class", &tag.classes.join(" "))?;
    }
    for attribute in &tag.attributes {
        writer.write_attribute(&attribute.name, &attribute.value)?;
    }

    match &tag.content {
        Some(Content::Text(text) | Content::Expression(text)) => writer.write_text(text),
        None => {}
    }

    for child in &tag.children {
        generate_element(child, writer, options)?;
    }

    writer.write_end_tag()
}

fn generate_conditional(
    conditional: &Conditional,
    writer: &mut TagWriter,
    options: &RenderOptions,
) -> Result<(), RenderError> {
    let take_then = options.conditionals.takes_then_branch(&conditional.predicate);
    log::trace!(
        "if {:?}: rendering {} branch",
        conditional.predicate,
        if take_then { "then" } else { "else" }
    );

    let branch = if take_then {
        &conditional.then_branch
    } else {
        &conditional.else_branch
    };
    for element in branch {
        generate_element(element, writer, options)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{render, render_with, ConditionalMode};
    use jadeite_parser::ast::Attribute;
    use jadeite_parser::{ParseError, Parser};
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Template {
        Parser::parse(source).unwrap()
    }

    /// Helper: parse and render with default options.
    fn render_str(source: &str) -> String {
        render(&parse(source)).unwrap()
    }

    fn render_pretty(source: &str) -> String {
        render_with(&parse(source), &RenderOptions::pretty()).unwrap()
    }

    fn render_mode(source: &str, conditionals: ConditionalMode) -> String {
        let options = RenderOptions {
            conditionals,
            ..RenderOptions::default()
        };
        render_with(&parse(source), &options).unwrap()
    }

    // =========================================================================
    // End-to-end
    // =========================================================================

    #[test]
    fn test_selectors_and_attributes() {
        assert_eq!(
            render_str("div#main.hello(data=\"x\")"),
            r#"<div id="main" class="hello" data="x"/>"#
        );
    }

    #[test]
    fn test_doctype_and_bare_word() {
        let template = parse("doctype html\nhello");
        assert_eq!(template.elements, vec![Element::Tag(Tag::new("hello"))]);
        assert_eq!(render(&template).unwrap(), "<!DOCTYPE html><hello/>");
    }

    #[test]
    fn test_list() {
        assert_eq!(
            render_str("ul\n  li one\n  li two"),
            "<ul><li>one</li><li>two</li></ul>"
        );
    }

    #[test]
    fn test_list_pretty() {
        assert_eq!(
            render_pretty("ul\n  li one\n  li two"),
            "<ul>\n  <li>one</li>\n  <li>two</li>\n</ul>"
        );
    }

    #[test]
    fn test_empty_template() {
        let template = parse("");
        assert_eq!(template, Template::default());
        assert_eq!(render(&template).unwrap(), "");
    }

    #[test]
    fn test_class_attribute_values() {
        assert_eq!(render_str("div(class=\"\")"), r#"<div class=""/>"#);
        assert_eq!(
            render_str("div.a(class=\"b  c\")"),
            r#"<div class="a b  c"/>"#
        );
    }

    #[test]
    fn test_missing_attribute_value_fails_to_parse() {
        assert_eq!(
            Parser::parse("div(name=)").unwrap_err(),
            ParseError::UnexpectedToken {
                text: ")".into(),
                line: 1,
                column: 10,
            }
        );
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(render_str("p 'unterminated"), "<p>'unterminated</p>");
    }

    /// Pretty and compact renderings of a tag-only template describe the same
    /// tree, and rendering is deterministic.
    #[test]
    fn test_structure_is_stable() {
        let source = "html\n  body#main.a.b(data=\"1\")\n    div\n    span(title=\"t\")\n  footer";
        let compact = render_str(source);
        assert_eq!(
            compact,
            r#"<html><body id="main" class="a b" data="1"><div/><span title="t"/></body><footer/></html>"#
        );
        assert_eq!(render_str(source), compact);

        let flattened: String = render_pretty(source).lines().map(str::trim).collect();
        assert_eq!(flattened, compact);
    }

    // =========================================================================
    // Doctypes
    // =========================================================================

    #[test]
    fn test_known_doctype() {
        assert_eq!(
            render_str("doctype xml\nroot"),
            r#"<?xml version="1.0" encoding="utf-8" ?><root/>"#
        );
        assert!(render_str("doctype transitional").contains("XHTML 1.0 Transitional"));
        assert!(render_str("doctype 1.1").contains("xhtml11.dtd"));
    }

    // =========================================================================
    // Content
    // =========================================================================

    #[test]
    fn test_expression_is_written_verbatim() {
        assert_eq!(render_str("p= user.name"), "<p>user.name</p>");
    }

    #[test]
    fn test_block_text() {
        assert_eq!(render_str("pre.\n  a\n    b"), "<pre>a\n  b</pre>");
    }

    #[test]
    fn test_block_text_with_quote_across_lines() {
        assert_eq!(render_str("p.\n  'hello\n  world'"), "<p>'hello\nworld'</p>");
    }

    #[test]
    fn test_quotes_render_as_written() {
        assert_eq!(render_str("p Say 'hi' now"), "<p>Say 'hi' now</p>");
        assert_eq!(render_str("p= greet('bob')"), "<p>greet('bob')</p>");
        assert_eq!(
            render_mode("if role == 'admin'\n  p yes", ConditionalMode::ThenBranch),
            "<p>yes</p>"
        );
    }

    #[test]
    fn test_leaf_and_decorated_tags_with_text() {
        assert_eq!(render_pretty("b bold"), "<b>bold</b>");
        assert_eq!(render_pretty("b.x bold"), r#"<b class="x">bold</b>"#);
        assert_eq!(
            render_pretty("div\n  b one\n  i two"),
            "<div>\n  <b>one</b>\n  <i>two</i>\n</div>"
        );
    }

    #[test]
    fn test_content_then_children() {
        assert_eq!(
            render_str("p Hello\n  b world"),
            "<p>Hello<b>world</b></p>"
        );
    }

    #[test]
    fn test_piped_text() {
        assert_eq!(render_str("p\n  | one\n  | two"), "<p>onetwo</p>");
    }

    #[test]
    fn test_colon_shorthand() {
        assert_eq!(
            render_str("li: a(href=\"/\") Home"),
            r#"<li><a href="/">Home</a></li>"#
        );
    }

    #[test]
    fn test_auto_encode() {
        let options = RenderOptions {
            auto_encode: true,
            ..RenderOptions::default()
        };
        let html = render_with(&parse("p(title='\"x\"') a < b & c"), &options).unwrap();
        assert_eq!(html, r#"<p title="&quot;x&quot;">a &lt; b &amp; c</p>"#);
    }

    #[test]
    fn test_lone_attribute_element() {
        let template = Template {
            doc_type: None,
            elements: vec![Element::Tag(Tag {
                children: vec![Element::Attribute(Attribute::new("lang", "en"))],
                ..Tag::new("html")
            })],
        };
        assert_eq!(render(&template).unwrap(), r#"<html lang="en"/>"#);

        let stray = Template {
            doc_type: None,
            elements: vec![Element::Attribute(Attribute::new("lang", "en"))],
        };
        assert!(matches!(
            render(&stray),
            Err(RenderError::AttributeOutsideStartTag { .. })
        ));
    }

    // =========================================================================
    // Conditionals
    // =========================================================================

    const CONDITIONAL: &str = "div\n  if admin\n    p yes\n  else\n    p no";

    #[test]
    fn test_conditional_renders_else_branch_by_default() {
        assert_eq!(render_str(CONDITIONAL), "<div><p>no</p></div>");
    }

    #[test]
    fn test_conditional_without_else_renders_nothing_by_default() {
        assert_eq!(render_str("div\n  if admin\n    p yes"), "<div/>");
    }

    #[test]
    fn test_conditional_then_branch() {
        assert_eq!(
            render_mode(CONDITIONAL, ConditionalMode::ThenBranch),
            "<div><p>yes</p></div>"
        );
    }

    #[test]
    fn test_conditional_flags() {
        let defined = ConditionalMode::Flags(["admin".to_string()].into_iter().collect());
        assert_eq!(render_mode(CONDITIONAL, defined), "<div><p>yes</p></div>");

        let undefined = ConditionalMode::Flags(Default::default());
        assert_eq!(render_mode(CONDITIONAL, undefined), "<div><p>no</p></div>");
    }

    // =========================================================================
    // Comments and unsupported nodes
    // =========================================================================

    #[test]
    fn test_comments() {
        assert_eq!(
            render_str("div\n  // shown\n  //- hidden"),
            "<div><!-- shown--></div>"
        );
    }

    #[test]
    fn test_unsupported_nodes() {
        for (source, node) in [
            ("each x in xs\n  li= x", "each"),
            ("for x in xs", "for"),
            ("mixin card(title)", "mixin"),
            ("include header", "include"),
        ] {
            assert_eq!(
                render(&parse(source)),
                Err(RenderError::Unsupported { node: node.into() }),
                "{source}"
            );
        }
    }
}
