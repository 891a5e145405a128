//! Node - a retained UI node with DOM-like primitives.
//!
//! A [`Node`] is a cheap, clonable handle. Clones refer to the same node;
//! equality is identity.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::types::Value;
use super::events::{ListenerId, ListenerRegistry, NativeEvent};

// =============================================================================
// Node Data
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum NodeKind {
    Element(String),
    Text(String),
}

struct NodeData {
    kind: NodeKind,
    attributes: BTreeMap<String, String>,
    properties: BTreeMap<String, Value>,
    /// Class list in insertion order, no duplicates.
    classes: Vec<String>,
    style: BTreeMap<String, String>,
    children: Vec<Node>,
    parent: Weak<RefCell<NodeData>>,
    listeners: ListenerRegistry,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attributes: BTreeMap::new(),
            properties: BTreeMap::new(),
            classes: Vec::new(),
            style: BTreeMap::new(),
            children: Vec::new(),
            parent: Weak::new(),
            listeners: ListenerRegistry::default(),
        }
    }
}

// =============================================================================
// Node Handle
// =============================================================================

/// Handle to a native node.
#[derive(Clone)]
pub struct Node(Rc<RefCell<NodeData>>);

impl Node {
    /// Create a detached element node of the given kind.
    pub fn element(tag: &str) -> Self {
        Node(Rc::new(RefCell::new(NodeData::new(NodeKind::Element(tag.to_string())))))
    }

    /// Create a detached text node.
    pub fn text(content: &str) -> Self {
        Node(Rc::new(RefCell::new(NodeData::new(NodeKind::Text(content.to_string())))))
    }

    /// Tag name for elements, `None` for text nodes.
    pub fn tag(&self) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element(tag) => Some(tag.clone()),
            NodeKind::Text(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.0.borrow().kind, NodeKind::Text(_))
    }

    /// Concatenated text of this node and all descendants.
    pub fn text_content(&self) -> String {
        let data = self.0.borrow();
        match &data.kind {
            NodeKind::Text(content) => content.clone(),
            NodeKind::Element(_) => data.children.iter().map(Node::text_content).collect(),
        }
    }

    /// Replace the content of a text node. No-op on elements.
    pub fn set_text(&self, content: &str) {
        if let NodeKind::Text(text) = &mut self.0.borrow_mut().kind {
            *text = content.to_string();
        }
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // -------------------------------------------------------------------------
    // Attributes
    // -------------------------------------------------------------------------

    pub fn set_attribute(&self, name: &str, value: impl Into<String>) {
        self.0.borrow_mut().attributes.insert(name.to_string(), value.into());
    }

    pub fn remove_attribute(&self, name: &str) {
        self.0.borrow_mut().attributes.remove(name);
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.0.borrow().attributes.contains_key(name)
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    pub fn set_property(&self, name: &str, value: Value) {
        self.0.borrow_mut().properties.insert(name.to_string(), value);
    }

    /// Read a property (`Value::Null` if never set).
    pub fn property(&self, name: &str) -> Value {
        self.0.borrow().properties.get(name).cloned().unwrap_or_default()
    }

    /// The `id` property as a string, if set.
    pub fn id(&self) -> Option<String> {
        self.property("id").as_str().map(str::to_string)
    }

    // -------------------------------------------------------------------------
    // Classes
    // -------------------------------------------------------------------------

    pub fn add_class(&self, name: &str) {
        let mut data = self.0.borrow_mut();
        if !data.classes.iter().any(|c| c == name) {
            data.classes.push(name.to_string());
        }
    }

    pub fn remove_class(&self, name: &str) {
        self.0.borrow_mut().classes.retain(|c| c != name);
    }

    /// Add or remove a class depending on `on`.
    pub fn toggle_class(&self, name: &str, on: bool) {
        if on {
            self.add_class(name);
        } else {
            self.remove_class(name);
        }
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == name)
    }

    pub fn classes(&self) -> Vec<String> {
        self.0.borrow().classes.clone()
    }

    // -------------------------------------------------------------------------
    // Style
    // -------------------------------------------------------------------------

    pub fn set_style(&self, name: &str, value: impl Into<String>) {
        self.0.borrow_mut().style.insert(name.to_string(), value.into());
    }

    pub fn style(&self, name: &str) -> Option<String> {
        self.0.borrow().style.get(name).cloned()
    }

    // -------------------------------------------------------------------------
    // Tree
    // -------------------------------------------------------------------------

    /// Append `child` as the last child, detaching it from any previous parent.
    pub fn append_child(&self, child: &Node) {
        if let Some(old_parent) = child.parent() {
            old_parent.remove_child(child);
        }
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.push(child.clone());
    }

    pub fn remove_child(&self, child: &Node) {
        let mut data = self.0.borrow_mut();
        let before = data.children.len();
        data.children.retain(|c| !c.ptr_eq(child));
        if data.children.len() != before {
            child.0.borrow_mut().parent = Weak::new();
        }
    }

    pub fn parent(&self) -> Option<Node> {
        self.0.borrow().parent.upgrade().map(Node)
    }

    pub fn children(&self) -> Vec<Node> {
        self.0.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Subscribe a native listener. Returns the id needed to remove it.
    pub fn add_event_listener<F>(&self, name: &str, listener: F) -> ListenerId
    where
        F: Fn(&NativeEvent) + 'static,
    {
        self.0.borrow_mut().listeners.add(name, Rc::new(listener))
    }

    pub fn remove_event_listener(&self, id: ListenerId) {
        self.0.borrow_mut().listeners.remove(id);
    }

    /// Number of listeners registered for `name` on this node.
    pub fn listener_count(&self, name: &str) -> usize {
        self.0.borrow().listeners.count(name)
    }

    pub fn downgrade(&self) -> WeakNode {
        WeakNode(Rc::downgrade(&self.0))
    }

    /// Dispatch an event at this node, then up the ancestor chain if it bubbles.
    pub fn dispatch_event(&self, mut event: NativeEvent) {
        if event.target.is_none() {
            event.target = Some(self.downgrade());
        }

        let mut current = Some(self.clone());
        while let Some(node) = current {
            // Release the borrow before calling out: listeners may mutate the node.
            let listeners = node.0.borrow().listeners.matching(&event.name);
            for listener in listeners {
                listener(&event);
            }
            if !event.bubbles {
                break;
            }
            current = node.parent();
        }
    }
}

/// Non-owning handle to a node, as carried by dispatched events.
#[derive(Clone, Default)]
pub struct WeakNode(Weak<RefCell<NodeData>>);

impl WeakNode {
    /// The node, if it is still alive.
    pub fn upgrade(&self) -> Option<Node> {
        self.0.upgrade().map(Node)
    }
}

impl PartialEq for WeakNode {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for WeakNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(node) => write!(f, "Weak{node:?}"),
            None => f.write_str("WeakNode(dropped)"),
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.borrow().kind {
            NodeKind::Element(tag) => write!(f, "Node(<{tag}>)"),
            NodeKind::Text(content) => write!(f, "Node({content:?})"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_attributes_and_properties() {
        let node = Node::element("input");
        node.set_attribute("type", "text");
        node.set_property("value", Value::from("abc"));

        assert_eq!(node.tag().as_deref(), Some("input"));
        assert_eq!(node.attribute("type").as_deref(), Some("text"));
        assert_eq!(node.property("value"), Value::from("abc"));
        assert_eq!(node.property("missing"), Value::Null);

        node.remove_attribute("type");
        assert!(!node.has_attribute("type"));
    }

    #[test]
    fn test_class_list() {
        let node = Node::element("div");
        node.add_class("a");
        node.add_class("a");
        node.toggle_class("b", true);
        assert_eq!(node.classes(), vec!["a".to_string(), "b".to_string()]);

        node.toggle_class("a", false);
        assert!(!node.has_class("a"));
        assert!(node.has_class("b"));
    }

    #[test]
    fn test_append_moves_between_parents() {
        let first = Node::element("ul");
        let second = Node::element("ol");
        let item = Node::element("li");

        first.append_child(&item);
        assert_eq!(item.parent(), Some(first.clone()));

        second.append_child(&item);
        assert_eq!(first.child_count(), 0);
        assert_eq!(second.child_count(), 1);
        assert_eq!(item.parent(), Some(second));
    }

    #[test]
    fn test_text_content() {
        let p = Node::element("p");
        p.append_child(&Node::text("Hello, "));
        let strong = Node::element("strong");
        strong.append_child(&Node::text("world"));
        p.append_child(&strong);

        assert_eq!(p.text_content(), "Hello, world");
        assert!(p.children()[0].is_text());

        p.children()[0].set_text("Goodbye, ");
        assert_eq!(p.text_content(), "Goodbye, world");
    }

    #[test]
    fn test_dispatch_bubbles_to_parent() {
        let parent = Node::element("div");
        let child = Node::element("button");
        parent.append_child(&child);

        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let target_seen = Rc::new(RefCell::new(None));
        let t = target_seen.clone();
        parent.add_event_listener("click", move |event| {
            h.set(h.get() + 1);
            *t.borrow_mut() = event.target();
        });

        child.dispatch_event(NativeEvent::new("click"));
        assert_eq!(hits.get(), 1);
        assert_eq!(*target_seen.borrow(), Some(child.clone()));

        child.dispatch_event(NativeEvent::new("click").non_bubbling());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_listener_may_mutate_node() {
        let node = Node::element("button");
        let n = node.clone();
        let id = node.add_event_listener("click", move |_| {
            n.set_attribute("clicked", "");
        });

        node.dispatch_event(NativeEvent::new("click"));
        assert!(node.has_attribute("clicked"));

        node.remove_event_listener(id);
        assert_eq!(node.listener_count("click"), 0);
    }
}
