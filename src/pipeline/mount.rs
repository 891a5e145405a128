//! Mount API - run a component tree and own its lifetime.
//!
//! # Example
//!
//! ```ignore
//! use spark_dom::{e, mount, Node, Properties};
//!
//! let root = Node::element("body");
//! let app = e("div#app", Properties::new())?.children("Hello");
//!
//! let handle = mount(&app, &root);
//! let clicks = handle.output().stream("click");
//!
//! // Clean up: stops every binding and listener, detaches the nodes
//! handle.unmount();
//! ```

use tracing::debug;

use crate::engine::Node;
use crate::primitives::{Component, Output, Scope};

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by [`mount`].
///
/// Holds:
/// - The output of the mounted component
/// - The nodes it appended to the root
/// - The scope owning every effect, subscription and listener
///
/// Dropping the handle disposes the scope; the nodes stay attached.
pub struct MountHandle {
    output: Output,
    root: Node,
    nodes: Vec<Node>,
    scope: Scope,
}

impl MountHandle {
    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Top-level nodes appended by the mounted component.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Stop all bindings and listeners, then detach the mounted nodes.
    ///
    /// This will:
    /// 1. Dispose the scope (effects, stream subscriptions, native listeners)
    /// 2. Remove the top-level nodes from the root
    pub fn unmount(self) {
        self.scope.dispose();
        for node in &self.nodes {
            self.root.remove_child(node);
        }
        debug!(nodes = self.nodes.len(), "unmounted");
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        // Idempotent: a no-op after unmount().
        self.scope.dispose();
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Run `component` under `root` in a fresh scope.
///
/// Returns a MountHandle for cleanup.
pub fn mount(component: &Component, root: &Node) -> MountHandle {
    let before = root.child_count();
    let scope = Scope::new();
    let output = component.run(root, &scope);
    let nodes: Vec<Node> = root.children().into_iter().skip(before).collect();

    debug!(nodes = nodes.len(), "mounted");

    MountHandle {
        output,
        root: root.clone(),
        nodes,
        scope,
    }
}

/// Unmount a previously mounted tree.
pub fn unmount(handle: MountHandle) {
    handle.unmount();
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NativeEvent;
    use crate::primitives::{e, Properties};
    use spark_signals::signal;

    #[test]
    fn test_mount_appends_and_tracks_nodes() {
        let root = Node::element("body");
        root.append_child(&Node::element("header"));

        let item = e("li", Properties::new()).unwrap();
        let list = Component::new(move |parent, scope| {
            item.children("one").run(parent, scope);
            item.children("two").run(parent, scope)
        });

        let handle = mount(&list, &root);
        assert_eq!(root.child_count(), 3);
        assert_eq!(handle.nodes().len(), 2);
        assert_eq!(handle.nodes()[0].text_content(), "one");

        handle.unmount();
        assert_eq!(root.child_count(), 1);
    }

    #[test]
    fn test_unmount_stops_bindings_and_listeners() {
        let root = Node::element("body");
        let active = signal(false);
        let button = e("button", Properties::new().class_toggle("active", active.clone())).unwrap();

        let handle = mount(&button.build(), &root);
        let node = handle.nodes()[0].clone();
        let _ = handle.output().stream("click");
        assert_eq!(node.listener_count("click"), 1);

        active.set(true);
        assert!(node.has_class("active"));

        handle.unmount();
        active.set(false);
        assert!(node.has_class("active"));
        assert_eq!(node.listener_count("click"), 0);
        node.dispatch_event(NativeEvent::new("click"));
    }

    #[test]
    fn test_unmount_releases_action_subscriptions() {
        let root = Node::element("body");
        let focus: crate::stream::Stream<crate::types::Value> = crate::stream::Stream::new();
        let field = e(
            "input",
            Properties::new()
                .action_definition("focus", |node, _| node.set_attribute("data-focused", ""))
                .action("focus", focus.clone()),
        )
        .unwrap();

        let handle = mount(&field.build(), &root);
        assert_eq!(focus.subscriber_count(), 1);
        assert!(!handle.scope().is_disposed());

        let scope = handle.scope().clone();
        handle.unmount();
        assert!(scope.is_disposed());
        assert_eq!(focus.subscriber_count(), 0);
    }

    #[test]
    fn test_drop_disposes_scope_but_keeps_nodes() {
        let root = Node::element("body");
        let title = signal("a".to_string());
        let heading = e("h1", Properties::new()).unwrap();

        {
            let _handle = mount(&heading.children(title.clone()), &root);
            title.set("b".to_string());
            assert_eq!(root.text_content(), "b");
        }

        title.set("c".to_string());
        assert_eq!(root.child_count(), 1);
        assert_eq!(root.text_content(), "b");
    }
}
