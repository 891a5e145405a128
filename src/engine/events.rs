//! Native events and the per-node listener registry.
//!
//! Each node keeps its own registry of `(id, event name, listener)` entries.
//! Registration hands back a [`ListenerId`] which is the only way to remove
//! the listener again.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::types::Value;
use super::{Node, WeakNode};

// =============================================================================
// TYPES
// =============================================================================

/// A native UI event, as delivered to listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeEvent {
    /// Event name (`click`, `input`, `keyup`, ...).
    pub name: String,
    /// Node the event was dispatched on (filled by dispatch). Held weakly so
    /// that a stored event never keeps its node alive.
    pub(super) target: Option<WeakNode>,
    /// Whether the event walks up to ancestors after the target.
    pub bubbles: bool,
    /// Free-form payload (`key`, `x`, `y`, ...).
    pub detail: BTreeMap<String, Value>,
}

impl NativeEvent {
    /// Create a bubbling event with no payload.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: None,
            bubbles: true,
            detail: BTreeMap::new(),
        }
    }

    /// Attach a payload entry.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.detail.insert(key.into(), value.into());
        self
    }

    /// Stop the event at its target.
    pub fn non_bubbling(mut self) -> Self {
        self.bubbles = false;
        self
    }

    /// Read a payload entry (`Value::Null` when absent).
    pub fn get(&self, key: &str) -> Value {
        self.detail.get(key).cloned().unwrap_or_default()
    }

    /// Node the event was dispatched on, while it is alive.
    pub fn target(&self) -> Option<Node> {
        self.target.as_ref().and_then(WeakNode::upgrade)
    }

    /// Read a DOM property off the target node (`Value::Null` without a target).
    pub fn target_property(&self, name: &str) -> Value {
        self.target()
            .map(|node| node.property(name))
            .unwrap_or_default()
    }
}

/// Native listener callback.
pub type Listener = Rc<dyn Fn(&NativeEvent)>;

/// Handle for removing a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

// =============================================================================
// LISTENER REGISTRY
// =============================================================================

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    entries: Vec<(ListenerId, String, Listener)>,
    next_id: usize,
}

impl ListenerRegistry {
    fn next_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn add(&mut self, name: &str, listener: Listener) -> ListenerId {
        let id = self.next_id();
        self.entries.push((id, name.to_string(), listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) {
        self.entries.retain(|(entry_id, _, _)| *entry_id != id);
    }

    pub(crate) fn count(&self, name: &str) -> usize {
        self.entries.iter().filter(|(_, n, _)| n == name).count()
    }

    /// Listeners for `name`, in registration order.
    pub(crate) fn matching(&self, name: &str) -> Vec<Listener> {
        self.entries
            .iter()
            .filter(|(_, n, _)| n == name)
            .map(|(_, _, listener)| listener.clone())
            .collect()
    }
}
