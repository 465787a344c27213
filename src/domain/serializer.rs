//! Indented XML text output.
//!
//! Output shape:
//! - the start element: open and close tag on their own lines
//! - leaf with value: `<tag>text</tag>` on one line
//! - leaf without value: `<tag></tag>` on one line (never self-closing)
//! - element with children: open line, children, close line
//!
//! Indentation is counted from the element passed in, so a subtree renders
//! as a standalone document. No XML declaration unless asked for.

use std::borrow::Cow;
use std::io::{self, Write};

use crate::domain::arena::{NodeRef, XmlArena};
use crate::domain::error::DomainResult;
use crate::domain::NodeId;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// The pieces one element renders to: `(indent, open tag, text, close tag)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlTags {
    pub indent: String,
    pub open: String,
    pub text: Option<String>,
    pub close: String,
}

impl From<XmlTags> for (String, String, Option<String>, String) {
    fn from(tags: XmlTags) -> Self {
        (tags.indent, tags.open, tags.text, tags.close)
    }
}

/// Formatting options. The default renders two-space indentation, no
/// declaration and no escaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlWriter {
    pub indent_width: usize,
    pub declaration: bool,
    /// Escape markup characters in attribute values and text. Off by
    /// default: values are written verbatim.
    pub escape: bool,
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self {
            indent_width: 2,
            declaration: false,
            escape: false,
        }
    }
}

impl XmlWriter {
    /// Tags for `node` rendered at nesting `level`.
    pub fn tags(&self, node: NodeRef<'_>, level: usize) -> XmlTags {
        let tag = node.tag();
        let open = match node.attribute() {
            Some(attr) => format!(
                r#"<{} {}="{}">"#,
                tag,
                attr.name,
                self.escaped(&attr.value, escape_attribute)
            ),
            None => format!("<{}>", tag),
        };
        XmlTags {
            indent: " ".repeat(self.indent_width * level),
            open,
            text: node
                .value()
                .map(|v| self.escaped(&v.to_string(), escape_text).into_owned()),
            close: format!("</{}>", tag),
        }
    }

    fn escaped<'s>(&self, s: &'s str, escape: fn(&str) -> Cow<'_, str>) -> Cow<'s, str> {
        if self.escape {
            escape(s)
        } else {
            Cow::Borrowed(s)
        }
    }

    /// Lines of output for the subtree at `node`, in emission order.
    pub fn lines<'a>(&self, node: NodeRef<'a>) -> XmlLines<'a> {
        XmlLines {
            writer: *self,
            declaration: self.declaration,
            stack: vec![Step::Start(node)],
        }
    }

    /// Writes the subtree at `node`. I/O errors are returned as-is.
    pub fn write<W: Write>(&self, node: NodeRef<'_>, out: &mut W) -> io::Result<()> {
        for line in self.lines(node) {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }

    pub fn to_string(&self, node: NodeRef<'_>) -> String {
        let mut xml = String::new();
        for line in self.lines(node) {
            xml.push_str(&line);
            xml.push('\n');
        }
        xml
    }
}

enum Step<'a> {
    Start(NodeRef<'a>),
    Open(NodeRef<'a>, usize),
    Close(String),
}

/// Pre-order line iterator; close tags are queued behind each element's children.
pub struct XmlLines<'a> {
    writer: XmlWriter,
    declaration: bool,
    stack: Vec<Step<'a>>,
}

impl<'a> XmlLines<'a> {
    fn push_children(&mut self, node: NodeRef<'a>, level: usize) {
        self.stack
            .extend(node.children().rev().map(|child| Step::Open(child, level)));
    }
}

impl<'a> Iterator for XmlLines<'a> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.declaration {
            self.declaration = false;
            return Some(XML_DECLARATION.to_string());
        }
        match self.stack.pop()? {
            Step::Start(node) => {
                let tags = self.writer.tags(node, 0);
                self.stack.push(Step::Close(tags.close));
                self.push_children(node, 1);
                Some(tags.open)
            }
            Step::Open(node, level) => {
                let tags = self.writer.tags(node, level);
                if node.has_children() {
                    self.stack
                        .push(Step::Close(format!("{}{}", tags.indent, tags.close)));
                    self.push_children(node, level + 1);
                    Some(format!("{}{}", tags.indent, tags.open))
                } else {
                    Some(format!(
                        "{}{}{}{}",
                        tags.indent,
                        tags.open,
                        tags.text.unwrap_or_default(),
                        tags.close
                    ))
                }
            }
            Step::Close(line) => Some(line),
        }
    }
}

fn escape_text(s: &str) -> Cow<'_, str> {
    escape_chars(s, false)
}

fn escape_attribute(s: &str) -> Cow<'_, str> {
    escape_chars(s, true)
}

fn escape_chars(s: &str, quotes: bool) -> Cow<'_, str> {
    let needs = |c: char| matches!(c, '&' | '<' | '>') || (quotes && c == '"');
    if !s.chars().any(needs) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quotes => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

impl NodeRef<'_> {
    /// Tags at this element's depth in its tree, two spaces per level.
    pub fn make_xml_tags(&self) -> XmlTags {
        XmlWriter::default().tags(*self, self.depth())
    }

    pub fn to_xml<W: Write>(&self, out: &mut W) -> io::Result<()> {
        XmlWriter::default().write(*self, out)
    }

    pub fn to_xml_string(&self) -> String {
        XmlWriter::default().to_string(*self)
    }
}

impl XmlArena {
    pub fn make_xml_tags(&self, id: NodeId) -> DomainResult<XmlTags> {
        Ok(self.node(id)?.make_xml_tags())
    }

    pub fn to_xml_string(&self, root: NodeId) -> DomainResult<String> {
        Ok(self.node(root)?.to_xml_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ElementSpec, NodePath};

    fn scenario() -> (XmlArena, NodeId, NodeId) {
        let mut arena = XmlArena::new();
        let root = arena.new_node("bookstore", true);
        let book = arena
            .make_child(root, ElementSpec::new("book").attribute("category", "cooking"))
            .unwrap();
        let title = arena
            .make_child(book, ElementSpec::new("title").value("Matthew"))
            .unwrap();
        (arena, root, title)
    }

    #[test]
    fn test_root_tags() {
        let (arena, root, _) = scenario();
        let tags = arena.make_xml_tags(root).unwrap();
        assert_eq!(
            <(String, String, Option<String>, String)>::from(tags),
            ("".into(), "<bookstore>".into(), None, "</bookstore>".into())
        );
    }

    #[test]
    fn test_grandchild_tags() {
        let (arena, _, title) = scenario();
        let tags = arena.make_xml_tags(title).unwrap();
        assert_eq!(tags.indent, "    ");
        assert_eq!(tags.open, "<title>");
        assert_eq!(tags.text.as_deref(), Some("Matthew"));
        assert_eq!(tags.close, "</title>");
    }

    #[test]
    fn test_to_xml_scenario() {
        let (arena, root, _) = scenario();
        let xml = arena.to_xml_string(root).unwrap();
        assert_eq!(
            xml,
            "<bookstore>\n  <book category=\"cooking\">\n    <title>Matthew</title>\n  </book>\n</bookstore>\n"
        );
    }

    #[test]
    fn test_empty_leaf_has_separate_close_tag() {
        let mut arena = XmlArena::new();
        let root = arena.new_node("bookstore", true);
        arena.make_child(root, "book").unwrap();
        assert_eq!(
            arena.to_xml_string(root).unwrap(),
            "<bookstore>\n  <book></book>\n</bookstore>\n"
        );
    }

    #[test]
    fn test_lone_root_renders_two_lines() {
        let mut arena = XmlArena::new();
        let root = arena.new_node(ElementSpec::new("bookstore").value("ignored"), true);
        assert_eq!(
            arena.to_xml_string(root).unwrap(),
            "<bookstore>\n</bookstore>\n"
        );
    }

    #[test]
    fn test_subtree_indentation_starts_at_zero() {
        let (arena, root, _) = scenario();
        let book = arena.get_from_path(root, &NodePath::from([0])).unwrap();
        assert_eq!(
            arena.to_xml_string(book).unwrap(),
            "<book category=\"cooking\">\n  <title>Matthew</title>\n</book>\n"
        );
    }

    #[test]
    fn test_declaration_and_indent_width() {
        let (arena, root, _) = scenario();
        let writer = XmlWriter {
            indent_width: 4,
            declaration: true,
            escape: false,
        };
        let xml = writer.to_string(arena.node(root).unwrap());
        let lines: Vec<&str> = xml.lines().collect();
        assert_eq!(lines[0], XML_DECLARATION);
        assert_eq!(lines[2], "    <book category=\"cooking\">");
        assert_eq!(lines[3], "        <title>Matthew</title>");
    }

    #[test]
    fn test_values_written_verbatim_by_default() {
        let mut arena = XmlArena::new();
        let root = arena.new_node("r", true);
        arena
            .make_child(root, ElementSpec::new("t").attribute("q", "a\"b").value("x < y & z"))
            .unwrap();
        assert_eq!(
            arena.to_xml_string(root).unwrap(),
            "<r>\n  <t q=\"a\"b\">x < y & z</t>\n</r>\n"
        );
    }

    #[test]
    fn test_escape_enabled() {
        let mut arena = XmlArena::new();
        let root = arena.new_node("r", true);
        arena
            .make_child(root, ElementSpec::new("t").attribute("q", "a\"b").value("x < y & z"))
            .unwrap();
        let writer = XmlWriter {
            escape: true,
            ..XmlWriter::default()
        };
        assert_eq!(
            writer.to_string(arena.node(root).unwrap()),
            "<r>\n  <t q=\"a&quot;b\">x &lt; y &amp; z</t>\n</r>\n"
        );
    }

    #[test]
    fn test_write_propagates_io_error() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let (arena, root, _) = scenario();
        let err = arena.node(root).unwrap().to_xml(&mut Broken).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }
}
