//! The node arena and its mutation/query operations.
//!
//! Nodes live in a single `Vec` owned by [`Document`] and refer to each other
//! by index, so handles stay valid while directives rewrite the tree around
//! them. A node removed from its parent is *detached*: it keeps its slot in
//! the arena (and its own subtree) but is no longer reachable from the root.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Handle to a node inside a [`Document`].
///
/// Ids are only meaningful for the document that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Node type discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    Document = 0,
    Element = 1,
    Text = 2,
    Comment = 3,
}

/// A single element attribute. The raw spelling of the name is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: CompactString,
    pub value: CompactString,
}

#[derive(Debug)]
enum NodeData {
    Document,
    Element {
        tag_name: CompactString,
        attrs: Vec<Attribute>,
    },
    Text {
        content: CompactString,
    },
    Comment {
        content: CompactString,
    },
}

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// A mutable markup tree.
///
/// The root is a document node; top-level elements and text are its
/// children. Sibling order is significant and preserved by every operation
/// unless the caller explicitly reorders nodes.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
            }],
        }
    }

    /// The document root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node_type(&self, id: NodeId) -> NodeType {
        match self.nodes[id.index()].data {
            NodeData::Document => NodeType::Document,
            NodeData::Element { .. } => NodeType::Element,
            NodeData::Text { .. } => NodeType::Text,
            NodeData::Comment { .. } => NodeType::Comment,
        }
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, tag_name: impl Into<CompactString>) -> NodeId {
        self.push(NodeData::Element {
            tag_name: tag_name.into(),
            attrs: Vec::new(),
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, content: impl Into<CompactString>) -> NodeId {
        self.push(NodeData::Text {
            content: content.into(),
        })
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, content: impl Into<CompactString>) -> NodeId {
        self.push(NodeData::Comment {
            content: content.into(),
        })
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// The next sibling of `id`, if it is attached and not last.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.nodes[id.index()].parent?;
        let siblings = &self.nodes[parent.index()].children;
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings.get(pos + 1).copied()
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = Some(parent);
    }

    /// Insert `new_child` into `parent`'s child list immediately before
    /// `reference`. With no reference (or a reference that is not a child of
    /// `parent`) the node is appended at the end.
    pub fn insert_before(&mut self, parent: NodeId, new_child: NodeId, reference: Option<NodeId>) {
        self.detach(new_child);
        let children = &self.nodes[parent.index()].children;
        let pos = reference
            .and_then(|r| children.iter().position(|&c| c == r))
            .unwrap_or(children.len());
        self.nodes[parent.index()].children.insert(pos, new_child);
        self.nodes[new_child.index()].parent = Some(parent);
    }

    /// Remove `child` from `parent`. Returns false if `child` is not
    /// currently a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.nodes[child.index()].parent != Some(parent) {
            return false;
        }
        self.nodes[parent.index()].children.retain(|&c| c != child);
        self.nodes[child.index()].parent = None;
        true
    }

    /// Detach `id` from its parent, if it has one. The subtree below `id`
    /// is unaffected.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.index()].parent {
            self.remove_child(parent, id);
        }
    }

    /// Detach every child of `parent`.
    pub fn remove_children(&mut self, parent: NodeId) {
        let children = std::mem::take(&mut self.nodes[parent.index()].children);
        for child in children {
            self.nodes[child.index()].parent = None;
        }
    }

    /// Tag name of an element node, in its original spelling.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.index()].data {
            NodeData::Element { tag_name, .. } => Some(tag_name),
            _ => None,
        }
    }

    /// Payload of a text or comment node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.index()].data {
            NodeData::Text { content } | NodeData::Comment { content } => Some(content),
            _ => None,
        }
    }

    /// Replace the whole payload of a text node. No-op on other node types.
    pub fn set_text(&mut self, id: NodeId, new_content: impl Into<CompactString>) {
        if let NodeData::Text { content } = &mut self.nodes[id.index()].data {
            *content = new_content.into();
        }
    }

    /// Attributes of an element, in insertion order. Empty for non-elements.
    pub fn attrs(&self, id: NodeId) -> &[Attribute] {
        match &self.nodes[id.index()].data {
            NodeData::Element { attrs, .. } => attrs,
            _ => &[],
        }
    }

    /// Value of the attribute with the exact raw name `name`.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing an existing one with the same raw name
    /// in place.
    pub fn set_attr(
        &mut self,
        id: NodeId,
        name: impl Into<CompactString>,
        value: impl Into<CompactString>,
    ) {
        if let NodeData::Element { attrs, .. } = &mut self.nodes[id.index()].data {
            let name = name.into();
            let value = value.into();
            match attrs.iter_mut().find(|a| a.name == name) {
                Some(attr) => attr.value = value,
                None => attrs.push(Attribute { name, value }),
            }
        }
    }

    /// Remove the attribute with the exact raw name `name`.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> bool {
        if let NodeData::Element { attrs, .. } = &mut self.nodes[id.index()].data {
            let before = attrs.len();
            attrs.retain(|a| a.name != name);
            return attrs.len() != before;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_children() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let text = doc.create_text("hi");
        doc.append_child(doc.root(), div);
        doc.append_child(div, text);

        assert_eq!(doc.children(doc.root()), &[div]);
        assert_eq!(doc.children(div), &[text]);
        assert_eq!(doc.parent(text), Some(div));
        assert_eq!(doc.node_type(div), NodeType::Element);
        assert_eq!(doc.tag_name(div), Some("div"));
        assert_eq!(doc.text(text), Some("hi"));
    }

    #[test]
    fn test_insert_before_and_sibling_order() {
        let mut doc = Document::new();
        let parent = doc.create_element("ul");
        let a = doc.create_element("li");
        let b = doc.create_element("li");
        let c = doc.create_element("li");
        doc.append_child(parent, a);
        doc.append_child(parent, c);
        doc.insert_before(parent, b, Some(c));

        assert_eq!(doc.children(parent), &[a, b, c]);
        assert_eq!(doc.next_sibling(a), Some(b));
        assert_eq!(doc.next_sibling(c), None);
    }

    #[test]
    fn test_insert_before_without_reference_appends() {
        let mut doc = Document::new();
        let parent = doc.create_element("div");
        let a = doc.create_text("a");
        let b = doc.create_text("b");
        doc.append_child(parent, a);
        doc.insert_before(parent, b, None);
        assert_eq!(doc.children(parent), &[a, b]);
    }

    #[test]
    fn test_append_reparents() {
        let mut doc = Document::new();
        let first = doc.create_element("div");
        let second = doc.create_element("span");
        let child = doc.create_text("x");
        doc.append_child(first, child);
        doc.append_child(second, child);

        assert!(doc.children(first).is_empty());
        assert_eq!(doc.children(second), &[child]);
        assert_eq!(doc.parent(child), Some(second));
    }

    #[test]
    fn test_detach_keeps_subtree() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let p = doc.create_element("p");
        let text = doc.create_text("hello");
        doc.append_child(doc.root(), div);
        doc.append_child(div, p);
        doc.append_child(p, text);

        doc.detach(p);
        assert!(doc.children(div).is_empty());
        assert_eq!(doc.parent(p), None);
        assert_eq!(doc.children(p), &[text]);
    }

    #[test]
    fn test_remove_child_of_other_parent() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let child = doc.create_text("x");
        doc.append_child(a, child);
        assert!(!doc.remove_child(b, child));
        assert_eq!(doc.parent(child), Some(a));
    }

    #[test]
    fn test_remove_children() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let a = doc.create_text("a");
        let b = doc.create_comment("b");
        doc.append_child(div, a);
        doc.append_child(div, b);
        doc.remove_children(div);
        assert!(doc.children(div).is_empty());
        assert_eq!(doc.parent(a), None);
        assert_eq!(doc.parent(b), None);
    }

    #[test]
    fn test_attributes_preserve_order() {
        let mut doc = Document::new();
        let el = doc.create_element("input");
        doc.set_attr(el, "type", "text");
        doc.set_attr(el, "ng-model", "name");
        doc.set_attr(el, "type", "email");

        let names: Vec<_> = doc.attrs(el).iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["type", "ng-model"]);
        assert_eq!(doc.attr(el, "type"), Some("email"));
        assert!(doc.remove_attr(el, "type"));
        assert!(!doc.remove_attr(el, "type"));
        assert_eq!(doc.attr(el, "type"), None);
    }

    #[test]
    fn test_set_text_replaces_whole_payload() {
        let mut doc = Document::new();
        let t = doc.create_text("before");
        doc.set_text(t, "after");
        assert_eq!(doc.text(t), Some("after"));
    }
}
