//! Arena-allocated DOM tree.
//!
//! Nodes live in one vector and link to each other by index. The tree is
//! only built by the parser and never mutated afterwards, which keeps every
//! [`NodeId`] valid for the lifetime of the [`ArenaDom`].

use std::collections::HashMap;

use html5ever::{LocalName, Namespace, QualName};

/// Index of a node in its [`ArenaDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// HTML attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

/// Payload of a node.
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Doctype {
        name: String,
    },
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
        /// Whitespace-separated `class` tokens, split once for selector matching.
        classes: Vec<String>,
    },
    Text(String),
    Comment(String),
}

/// A node and its tree links.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element { .. })
    }
}

/// Arena-based DOM tree.
#[derive(Debug)]
pub struct ArenaDom {
    nodes: Vec<Node>,
    /// First element carrying each `id`, in insertion order.
    ids: HashMap<String, NodeId>,
}

impl Default for ArenaDom {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaDom {
    /// An empty tree holding only the document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
            ids: HashMap::new(),
        }
    }

    pub fn document(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds only the document node.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        id
    }

    // ------------------------------------------------------------------
    // Construction (used by the tree sink)
    // ------------------------------------------------------------------

    pub(crate) fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        let classes = attrs
            .iter()
            .find(|a| a.name.local.as_ref() == "class")
            .map(|a| a.value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        let html_id = attrs
            .iter()
            .find(|a| a.name.local.as_ref() == "id")
            .map(|a| a.value.clone());

        let id = self.alloc(NodeData::Element {
            name,
            attrs,
            classes,
        });
        if let Some(html_id) = html_id {
            self.ids.entry(html_id).or_insert(id);
        }
        id
    }

    pub(crate) fn create_text(&mut self, text: String) -> NodeId {
        self.alloc(NodeData::Text(text))
    }

    pub(crate) fn create_comment(&mut self, text: String) -> NodeId {
        self.alloc(NodeData::Comment(text))
    }

    pub(crate) fn create_doctype(&mut self, name: String) -> NodeId {
        self.alloc(NodeData::Doctype { name })
    }

    /// Append `child` as the last child of `parent`.
    pub(crate) fn append(&mut self, parent: NodeId, child: NodeId) {
        let last = self.get(parent).and_then(|n| n.last_child);

        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
            node.prev_sibling = last;
            node.next_sibling = None;
        }
        match last {
            Some(last) => {
                if let Some(node) = self.get_mut(last) {
                    node.next_sibling = Some(child);
                }
            }
            None => {
                if let Some(node) = self.get_mut(parent) {
                    node.first_child = Some(child);
                }
            }
        }
        if let Some(node) = self.get_mut(parent) {
            node.last_child = Some(child);
        }
    }

    /// Append text, merging with a trailing text node.
    pub(crate) fn append_text(&mut self, parent: NodeId, text: &str) {
        let last = self.get(parent).and_then(|n| n.last_child);
        if let Some(last) = last
            && let Some(Node {
                data: NodeData::Text(existing),
                ..
            }) = self.get_mut(last)
        {
            existing.push_str(text);
            return;
        }
        let node = self.create_text(text.to_string());
        self.append(parent, node);
    }

    /// Insert `node` immediately before `sibling`.
    pub(crate) fn insert_before(&mut self, sibling: NodeId, node: NodeId) {
        let Some((parent, prev)) = self.get(sibling).map(|n| (n.parent, n.prev_sibling)) else {
            return;
        };

        if let Some(new) = self.get_mut(node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = Some(sibling);
        }
        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = Some(node);
        }
        match prev {
            Some(prev) => {
                if let Some(p) = self.get_mut(prev) {
                    p.next_sibling = Some(node);
                }
            }
            None => {
                if let Some(p) = parent.and_then(|parent| self.get_mut(parent)) {
                    p.first_child = Some(node);
                }
            }
        }
    }

    /// Insert text before `sibling`, merging with a preceding text node.
    pub(crate) fn insert_text_before(&mut self, sibling: NodeId, text: &str) {
        let prev = self.get(sibling).and_then(|n| n.prev_sibling);
        if let Some(prev) = prev
            && let Some(Node {
                data: NodeData::Text(existing),
                ..
            }) = self.get_mut(prev)
        {
            existing.push_str(text);
            return;
        }
        let node = self.create_text(text.to_string());
        self.insert_before(sibling, node);
    }

    /// Unlink `node` from its parent and siblings.
    pub(crate) fn detach(&mut self, node: NodeId) {
        let Some((parent, prev, next)) = self
            .get(node)
            .map(|n| (n.parent, n.prev_sibling, n.next_sibling))
        else {
            return;
        };

        match prev {
            Some(prev) => {
                if let Some(p) = self.get_mut(prev) {
                    p.next_sibling = next;
                }
            }
            None => {
                if let Some(p) = parent.and_then(|parent| self.get_mut(parent)) {
                    p.first_child = next;
                }
            }
        }
        match next {
            Some(next) => {
                if let Some(n) = self.get_mut(next) {
                    n.prev_sibling = prev;
                }
            }
            None => {
                if let Some(p) = parent.and_then(|parent| self.get_mut(parent)) {
                    p.last_child = prev;
                }
            }
        }

        if let Some(n) = self.get_mut(node) {
            n.parent = None;
            n.prev_sibling = None;
            n.next_sibling = None;
        }
    }

    /// Add attributes the element does not already carry.
    pub(crate) fn add_attrs_if_missing(&mut self, node: NodeId, new_attrs: Vec<Attribute>) {
        if let Some(Node {
            data: NodeData::Element { attrs, .. },
            ..
        }) = self.get_mut(node)
        {
            for attr in new_attrs {
                if !attrs.iter().any(|a| a.name == attr.name) {
                    attrs.push(attr);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    /// Children of a node, in document order.
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        Children {
            dom: self,
            next: self.get(parent).and_then(|n| n.first_child),
        }
    }

    /// Ancestors of a node, nearest first, excluding the node itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |&id| self.parent(id))
    }

    /// Descendants of a node in document order, excluding the node itself.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack: Vec<NodeId> = self.children(id).collect();
        stack.reverse();
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            let start = stack.len();
            stack.extend(self.children(next));
            stack[start..].reverse();
            Some(next)
        })
    }

    /// Element carrying `id`; the first one wins when ids repeat.
    pub fn get_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    // ------------------------------------------------------------------
    // Element accessors
    // ------------------------------------------------------------------

    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_element)
    }

    pub fn element_name(&self, id: NodeId) -> Option<&LocalName> {
        match &self.get(id)?.data {
            NodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        }
    }

    pub fn element_namespace(&self, id: NodeId) -> Option<&Namespace> {
        match &self.get(id)?.data {
            NodeData::Element { name, .. } => Some(&name.ns),
            _ => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.get(id)?.data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name.local.as_ref() == name)
                .map(|a| a.value.as_str()),
            _ => None,
        }
    }

    pub fn attrs(&self, id: NodeId) -> &[Attribute] {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Element { attrs, .. }) => attrs,
            _ => &[],
        }
    }

    pub fn classes(&self, id: NodeId) -> &[String] {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Element { classes, .. }) => classes,
            _ => &[],
        }
    }

    /// True when the node is an element with the given local name.
    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.element_name(id).is_some_and(|n| n.as_ref() == tag)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut text = String::new();
        for node in self.descendants(id) {
            if let Some(Node {
                data: NodeData::Text(t),
                ..
            }) = self.get(node)
            {
                text.push_str(t);
            }
        }
        text
    }
}

/// Iterator over the children of a node.
pub struct Children<'a> {
    dom: &'a ArenaDom,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.dom.get(id).and_then(|n| n.next_sibling);
        Some(id)
    }
}
