//! Markup normalization and XPath evaluation.
//!
//! XPath engines expect well-formed XML; real-world HTML rarely is. The
//! pipeline therefore parses the markup tolerantly, re-serializes it as
//! well-formed XHTML, and evaluates the expression against that document.
//! Expressions carrying a namespace prefix are routed to a namespaced
//! serialization with the `xhtml` prefix bound to the standard XHTML
//! namespace URI; unprefixed expressions evaluate against a serialization
//! with no default namespace, so plain `//div` matches.

use pluck_core::Error;
use scraper::{ElementRef, Html, Node};
use sxd_document::dom::{self, ChildOfElement};
use sxd_document::parser as xml_parser;
use sxd_xpath::nodeset::Node as XPathNode;
use sxd_xpath::{Context, Factory, Value};

/// Standard XHTML namespace URI.
pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

const NS_PREFIX: &str = "xhtml";

/// Evaluate an XPath expression against raw HTML.
///
/// Each matched node yields one value: attributes and text nodes yield
/// their trimmed value, anything else its trimmed string-value. A
/// non-nodeset result (string, number, boolean) yields a single-element
/// sequence of its string form.
pub fn extract_xpath(html: &str, expression: &str) -> Result<Vec<String>, Error> {
    // The engine aborts on an unbound prefix rather than reporting it, so
    // prefixed expressions must be detected up front and bound before
    // evaluation ever runs.
    if has_name_prefix(expression) {
        tracing::debug!(expression, "prefixed expression, binding xhtml namespace");
        let namespaced = normalize_to_xhtml(html, true);
        return evaluate(&namespaced, expression, Some((NS_PREFIX, XHTML_NS)));
    }
    let xhtml = normalize_to_xhtml(html, false);
    evaluate(&xhtml, expression, None)
}

/// True when the expression contains a namespace-prefixed name test.
///
/// A single `:` outside a string literal marks a prefix; the `::` axis
/// separator and colons inside literals (URLs, mostly) do not.
fn has_name_prefix(expression: &str) -> bool {
    let bytes = expression.as_bytes();
    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate() {
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'\'' | b'"' => quote = Some(b),
                b':' => {
                    let part_of_axis =
                        bytes.get(i + 1) == Some(&b':') || (i > 0 && bytes[i - 1] == b':');
                    if !part_of_axis {
                        return true;
                    }
                }
                _ => {}
            },
        }
    }
    false
}

/// Re-serialize tolerantly parsed HTML as well-formed XHTML.
///
/// Comments, doctypes, and processing instructions are dropped; text and
/// attribute values are XML-escaped; childless elements self-close. When
/// `namespaced`, the root element is stamped with the XHTML default
/// namespace.
pub fn normalize_to_xhtml(html: &str, namespaced: bool) -> String {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let mut out = String::with_capacity(html.len() + 64);
    write_element(root, namespaced, &mut out);
    out
}

fn write_element(element: ElementRef<'_>, with_xmlns: bool, out: &mut String) {
    let name = element.value().name();

    out.push('<');
    out.push_str(name);

    if with_xmlns {
        out.push_str(" xmlns=\"");
        out.push_str(XHTML_NS);
        out.push('"');
    }

    for (attr_name, attr_value) in element.value().attrs() {
        if !is_xml_name(attr_name) || attr_name == "xmlns" {
            continue;
        }
        // Prefixed attribute names (e.g. SVG's xlink:href) would need a
        // namespace declaration the source never carried; only the
        // predefined xml: prefix survives.
        if attr_name.contains(':') && !attr_name.starts_with("xml:") {
            continue;
        }
        out.push(' ');
        out.push_str(attr_name);
        out.push_str("=\"");
        escape_into(attr_value, true, out);
        out.push('"');
    }

    if element.children().next().is_none() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in element.children() {
        match child.value() {
            Node::Text(text) => escape_into(text, false, out),
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    write_element(child_el, false, out);
                }
            }
            // Comments, doctypes, and PIs have no bearing on extraction.
            _ => {}
        }
    }
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn escape_into(raw: &str, in_attribute: bool, out: &mut String) {
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            // Control characters are invalid in XML 1.0.
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {}
            c => out.push(c),
        }
    }
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

fn evaluate(
    xhtml: &str, expression: &str, namespace: Option<(&str, &str)>,
) -> Result<Vec<String>, Error> {
    let package = xml_parser::parse(xhtml)
        .map_err(|e| Error::Extract(format!("malformed document: {e}")))?;
    let document = package.as_document();

    let factory = Factory::new();
    let xpath = factory
        .build(expression)
        .map_err(|e| Error::Extract(format!("invalid xpath: {e}")))?
        .ok_or_else(|| Error::Extract("empty xpath expression".into()))?;

    let mut context = Context::new();
    if let Some((prefix, uri)) = namespace {
        context.set_namespace(prefix, uri);
    }

    let value = xpath
        .evaluate(&context, document.root())
        .map_err(|e| Error::Extract(format!("xpath evaluation failed: {e}")))?;

    Ok(value_to_strings(value))
}

fn value_to_strings(value: Value<'_>) -> Vec<String> {
    match value {
        Value::Nodeset(nodeset) => {
            let mut values = Vec::new();
            let mut seen_runs: Vec<dom::Text<'_>> = Vec::new();
            for node in nodeset.document_order() {
                match node {
                    XPathNode::Attribute(attribute) => {
                        values.push(attribute.value().trim().to_string());
                    }
                    XPathNode::Text(text) => {
                        let (head, joined) = text_run(text);
                        if !seen_runs.contains(&head) {
                            seen_runs.push(head);
                            values.push(joined);
                        }
                    }
                    other => values.push(other.string_value().trim().to_string()),
                }
            }
            values
        }
        Value::String(s) => vec![s],
        Value::Number(n) => vec![n.to_string()],
        Value::Boolean(b) => vec![b.to_string()],
    }
}

/// Join a run of adjacent sibling text nodes into one value.
///
/// The XML parser materializes each entity reference as its own text
/// node, so one logical stretch of text arrives as several siblings.
/// Trimming happens only at the run's outer edges, keeping interior
/// spacing intact. Returns the run's first node so callers can emit each
/// run once.
fn text_run(text: dom::Text<'_>) -> (dom::Text<'_>, String) {
    let Some(parent) = text.parent() else {
        return (text, text.text().trim().to_string());
    };
    let children = parent.children();
    let position = children
        .iter()
        .position(|child| matches!(child, ChildOfElement::Text(t) if *t == text));
    let Some(mut index) = position else {
        return (text, text.text().trim().to_string());
    };

    while index > 0 && matches!(children[index - 1], ChildOfElement::Text(_)) {
        index -= 1;
    }
    let head = match children[index] {
        ChildOfElement::Text(t) => t,
        _ => text,
    };

    let mut joined = String::new();
    for child in &children[index..] {
        match child {
            ChildOfElement::Text(t) => joined.push_str(t.text()),
            _ => break,
        }
    }
    (head, joined.trim().to_string())
}
