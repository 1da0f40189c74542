#![forbid(unsafe_code)]

//! In-memory document.
//!
//! [`MemoryDocument`] implements [`Surface`] over a small node arena so the
//! controller can run without a browser. It records everything the
//! controller does (styles, attributes, injected CSS, listeners) for
//! inspection by tests and the [`PageSimulator`](crate::simulator::PageSimulator).

use crate::style::InlineStyle;
use crate::surface::{Binding, Rect, Surface, Tag};

/// Handle to a node in a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One element in the arena.
#[derive(Debug, Clone, Default)]
pub struct MemoryNode {
    tag: String,
    classes: Vec<String>,
    text: String,
    style: Vec<(String, String)>,
    attributes: Vec<(String, String)>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    rect: Rect,
}

impl MemoryNode {
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Inline style value for `property`.
    #[must_use]
    pub fn style(&self, property: &str) -> Option<&str> {
        lookup(&self.style, property)
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        lookup(&self.attributes, name)
    }

    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn upsert(pairs: &mut Vec<(String, String)>, key: &str, value: &str) {
    match pairs.iter_mut().find(|(k, _)| k == key) {
        Some(slot) => value.clone_into(&mut slot.1),
        None => pairs.push((key.to_owned(), value.to_owned())),
    }
}

/// Arena-backed document with a `<body>` root.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<MemoryNode>,
    body: NodeId,
    stylesheets: Vec<String>,
    root_style: Vec<(String, String)>,
    listeners: Vec<(Option<NodeId>, Binding)>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// An empty document containing only `<body>`.
    #[must_use]
    pub fn new() -> Self {
        let body = MemoryNode {
            tag: "body".to_owned(),
            ..MemoryNode::default()
        };
        Self {
            nodes: vec![body],
            body: NodeId(0),
            stylesheets: Vec::new(),
            root_style: Vec::new(),
            listeners: Vec::new(),
        }
    }

    /// The stock page: a `.container` holding an `h1.hello-text` and a
    /// `p.subtitle`, with plausible bounding boxes.
    #[must_use]
    pub fn greeting_page() -> Self {
        let mut doc = Self::new();
        let body = doc.body();
        let container = doc.add_element(body, "div", "container");
        doc.set_rect(container, Rect::new(0.0, 0.0, 800.0, 600.0));
        let hello = doc.add_element(container, "h1", "hello-text");
        doc.set_text_raw(hello, "Hello World!");
        doc.set_rect(hello, Rect::new(250.0, 200.0, 300.0, 60.0));
        let subtitle = doc.add_element(container, "p", "subtitle");
        doc.set_text_raw(subtitle, "Welcome to my simple web page");
        doc.set_rect(subtitle, Rect::new(250.0, 280.0, 300.0, 24.0));
        doc
    }

    #[must_use]
    pub const fn body(&self) -> NodeId {
        self.body
    }

    /// Create an element with `class` and append it to `parent`.
    pub fn add_element(&mut self, parent: NodeId, tag: &str, class: &str) -> NodeId {
        let id = self.push_node(tag);
        self.set_class(&id, class);
        self.append_child(&parent, &id);
        id
    }

    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        self.nodes[id.0].rect = rect;
    }

    /// Set text without going through the controller-facing trait.
    pub fn set_text_raw(&mut self, id: NodeId, text: &str) {
        text.clone_into(&mut self.nodes[id.0].text);
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &MemoryNode {
        &self.nodes[id.0]
    }

    /// Whether `id` is connected to the body.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if n == self.body {
                return true;
            }
            cur = self.nodes[n.0].parent;
        }
        false
    }

    /// Attached nodes carrying `class`, in document order.
    #[must_use]
    pub fn find_all(&self, class: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.body];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            if node.has_class(class) {
                out.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Injected stylesheet texts, in insertion order.
    #[must_use]
    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }

    /// Inline style on the root element.
    #[must_use]
    pub fn root_style(&self, property: &str) -> Option<&str> {
        lookup(&self.root_style, property)
    }

    /// Every registered listener, in registration order.
    #[must_use]
    pub fn listeners(&self) -> &[(Option<NodeId>, Binding)] {
        &self.listeners
    }

    /// Whether a listener for `binding` exists on `target`.
    #[must_use]
    pub fn has_listener(&self, target: Option<NodeId>, binding: Binding) -> bool {
        self.listeners.iter().any(|&(t, b)| t == target && b == binding)
    }

    /// Number of nodes ever created, attached or not.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn push_node(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(MemoryNode {
            tag: tag.to_owned(),
            ..MemoryNode::default()
        });
        id
    }

    fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.nodes[id.0].parent.take() else {
            return false;
        };
        self.nodes[parent.0].children.retain(|&c| c != id);
        true
    }
}

impl Surface for MemoryDocument {
    type Node = NodeId;

    fn query_class(&self, class: &str) -> Option<NodeId> {
        self.find_all(class).into_iter().next()
    }

    fn create_element(&mut self, tag: Tag) -> Option<NodeId> {
        Some(self.push_node(tag.as_str()))
    }

    fn set_class(&mut self, node: &NodeId, class: &str) {
        self.nodes[node.0].classes = class.split_whitespace().map(str::to_owned).collect();
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.detach(*child);
        self.nodes[child.0].parent = Some(*parent);
        self.nodes[parent.0].children.push(*child);
    }

    fn remove_node(&mut self, node: &NodeId) -> bool {
        self.detach(*node)
    }

    fn text(&self, node: &NodeId) -> String {
        self.nodes[node.0].text.clone()
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        self.set_text_raw(*node, text);
    }

    fn set_style_property(&mut self, node: &NodeId, property: &str, value: &str) {
        upsert(&mut self.nodes[node.0].style, property, value);
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        upsert(&mut self.nodes[node.0].attributes, name, value);
    }

    fn bounding_rect(&self, node: &NodeId) -> Rect {
        self.nodes[node.0].rect
    }

    fn append_stylesheet(&mut self, css: &str) {
        self.stylesheets.push(css.to_owned());
    }

    fn set_root_style(&mut self, style: &InlineStyle) {
        for (property, value) in style.iter() {
            upsert(&mut self.root_style, property, value);
        }
    }

    fn listen(&mut self, target: Option<&NodeId>, binding: Binding) {
        self.listeners.push((target.copied(), binding));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::surface::Role;

    #[test]
    fn greeting_page_has_three_elements() {
        let doc = MemoryDocument::greeting_page();
        let hello = doc.query_class("hello-text").unwrap();
        assert_eq!(doc.node(hello).tag(), "h1");
        assert_eq!(doc.node(hello).text(), "Hello World!");
        assert!(doc.query_class("subtitle").is_some());
        assert!(doc.query_class("container").is_some());
        assert!(doc.query_class("missing").is_none());
    }

    #[test]
    fn query_ignores_detached_nodes() {
        let mut doc = MemoryDocument::new();
        let loose = doc.create_element(Tag::Div).unwrap();
        doc.set_class(&loose, "hello-text");
        assert!(doc.query_class("hello-text").is_none());
        let body = doc.body();
        doc.append_child(&body, &loose);
        assert_eq!(doc.query_class("hello-text"), Some(loose));
    }

    #[test]
    fn find_all_is_document_order() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let a = doc.add_element(body, "div", "x");
        let a1 = doc.add_element(a, "span", "x");
        let b = doc.add_element(body, "div", "x");
        assert_eq!(doc.find_all("x"), vec![a, a1, b]);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut doc = MemoryDocument::greeting_page();
        let container = doc.query_class("container").unwrap();
        let child = doc.create_element(Tag::Span).unwrap();
        doc.append_child(&container, &child);
        assert!(doc.is_attached(child));
        assert!(doc.remove_node(&child));
        assert!(!doc.remove_node(&child));
        assert!(!doc.is_attached(child));
        assert!(!doc.node(container).children().contains(&child));
    }

    #[test]
    fn set_text_keeps_element_children() {
        let mut doc = MemoryDocument::greeting_page();
        let hello = doc.query_class("hello-text").unwrap();
        let ripple = doc.create_element(Tag::Span).unwrap();
        doc.append_child(&hello, &ripple);
        doc.set_text(&hello, "Ciao Mondo!");
        assert_eq!(doc.text(&hello), "Ciao Mondo!");
        assert!(doc.is_attached(ripple));
    }

    #[test]
    fn styles_and_attributes_upsert() {
        let mut doc = MemoryDocument::greeting_page();
        let hello = doc.query_class("hello-text").unwrap();
        doc.set_style_property(&hello, "color", "red");
        doc.set_style_property(&hello, "color", "blue");
        doc.set_attribute(&hello, "role", "button");
        assert_eq!(doc.node(hello).style("color"), Some("blue"));
        assert_eq!(doc.node(hello).attribute("role"), Some("button"));
    }

    #[test]
    fn listeners_are_recorded() {
        let mut doc = MemoryDocument::greeting_page();
        let hello = doc.query_class("hello-text").unwrap();
        let click = Binding::new(Role::Primary, EventKind::Click);
        doc.listen(Some(&hello), click);
        assert!(doc.has_listener(Some(hello), click));
        assert!(!doc.has_listener(None, click));
    }
}
