//! HTML serialization, used to dump assembled trees.

use crate::document::Document;
use crate::node::{NodeData, NodeId, NodeType};
use crate::tree::DomTree;

/// Options for HTML serialization.
#[derive(Clone, Debug)]
pub struct SerializeOptions {
    /// Put each element on its own line, indented by depth.
    pub pretty: bool,
    pub indent: String,
    pub include_doctype: bool,
}

impl SerializeOptions {
    pub fn new() -> Self {
        Self {
            pretty: false,
            indent: "  ".to_string(),
            include_doctype: true,
        }
    }

    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a whole document.
pub fn serialize_document(document: &Document, options: &SerializeOptions) -> String {
    let mut writer = HtmlWriter::new(&document.tree, options);
    if options.include_doctype {
        writer.out.push_str("<!DOCTYPE html>");
        writer.newline();
    }
    writer.children(document.tree.root(), 0, true);
    writer.out
}

/// Serialize the outer HTML of a node, compact.
pub fn serialize_node(tree: &DomTree, node: NodeId) -> String {
    let options = SerializeOptions::new();
    let mut writer = HtmlWriter::new(tree, &options);
    writer.node(node, 0, true);
    writer.out
}

struct HtmlWriter<'a> {
    tree: &'a DomTree,
    options: &'a SerializeOptions,
    out: String,
}

impl<'a> HtmlWriter<'a> {
    fn new(tree: &'a DomTree, options: &'a SerializeOptions) -> Self {
        Self {
            tree,
            options,
            out: String::new(),
        }
    }

    fn newline(&mut self) {
        if self.options.pretty {
            self.out.push('\n');
        }
    }

    fn indent(&mut self, depth: usize) {
        if self.options.pretty {
            for _ in 0..depth {
                self.out.push_str(&self.options.indent);
            }
        }
    }

    fn children(&mut self, node: NodeId, depth: usize, escape: bool) {
        for child in self.tree.children(node) {
            self.node(child, depth, escape);
        }
    }

    fn node(&mut self, node: NodeId, depth: usize, escape: bool) {
        let Some(current) = self.tree.get(node) else {
            return;
        };

        match &current.data {
            NodeData::Document => self.children(node, depth, escape),
            NodeData::Text { content } if escape => self.out.push_str(&escape_html_text(content)),
            NodeData::Text { content } => self.out.push_str(content),
            NodeData::Element(elem) => {
                self.indent(depth);
                self.out.push('<');
                self.out.push_str(elem.tag_name.as_str());
                for (name, value) in elem.attributes.iter() {
                    self.out.push(' ');
                    self.out.push_str(name);
                    // Boolean attributes such as `muted` print bare.
                    if !value.is_empty() {
                        self.out.push_str("=\"");
                        self.out.push_str(&escape_html_attribute(value));
                        self.out.push('"');
                    }
                }
                self.out.push('>');

                if !elem.is_void() {
                    let inline = current.children.iter().all(|&c| {
                        self.tree
                            .get(c)
                            .is_some_and(|c| c.node_type == NodeType::Text)
                    });
                    if !inline {
                        self.newline();
                    }
                    self.children(node, depth + 1, !elem.is_raw_text());
                    if !inline {
                        self.indent(depth);
                    }
                    self.out.push_str("</");
                    self.out.push_str(elem.tag_name.as_str());
                    self.out.push('>');
                }
                self.newline();
            }
        }
    }
}

/// Escape HTML text content.
pub fn escape_html_text(text: &str) -> String {
    escape(text, false)
}

/// Escape HTML attribute value.
pub fn escape_html_attribute(value: &str) -> String {
    escape(value, true)
}

fn escape(input: &str, quotes: bool) -> String {
    let mut result = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if quotes => result.push_str("&quot;"),
            '\'' if quotes => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
