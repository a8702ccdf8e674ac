//! Markup text output.
//!
//! Emits a [`Document`] back as markup. Text and attribute values are
//! entity-escaped; non-void elements always get explicit open and close tags
//! even when empty, so downstream consumers never see self-closing syntax
//! outside the void set. No XML declaration is ever emitted.

use crate::tag_config::is_void_tag;
use crate::tree::{Document, NodeId, NodeType};

/// Serialize the whole document.
pub fn serialize(doc: &Document) -> String {
    let mut out = String::new();
    for &child in doc.children(doc.root()) {
        write_node(doc, child, &mut out);
    }
    out
}

/// Serialize a single node and its subtree.
pub fn serialize_node(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, &mut out);
    out
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    match doc.node_type(id) {
        NodeType::Document => {
            for &child in doc.children(id) {
                write_node(doc, child, out);
            }
        }
        NodeType::Element => {
            let tag = doc.tag_name(id).unwrap_or_default();
            out.push('<');
            out.push_str(tag);
            for attr in doc.attrs(id) {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                escape_into(&attr.value, true, out);
                out.push('"');
            }
            out.push('>');
            // Void elements have no children and no closing tag.
            if is_void_tag(tag) {
                return;
            }
            for &child in doc.children(id) {
                write_node(doc, child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        NodeType::Text => {
            escape_into(doc.text(id).unwrap_or_default(), false, out);
        }
        NodeType::Comment => {
            out.push_str("<!--");
            out.push_str(doc.text(id).unwrap_or_default());
            out.push_str("-->");
        }
    }
}

fn escape_into(text: &str, in_attr: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attr => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
