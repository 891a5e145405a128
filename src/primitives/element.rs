//! Element - node assembly and the `e` factory.
//!
//! [`e`] parses a tag description and merges its property layers once. The
//! returned [`ElementFactory`] then produces a [`Component`] per call; each
//! run of that component assembles one node:
//!
//! 1. create the node
//! 2. bind style, attrs, props, class toggles, static classes
//! 3. wire custom actions (discrete) and setters (continuous)
//! 4. declare lazy behavior and stream ports
//! 5. construct children under the node, nest or forward their output
//! 6. apply output renaming
//! 7. append the node to its parent
//!
//! # Example
//!
//! ```ignore
//! use spark_dom::{e, mount, Node, Properties};
//!
//! let button = e("button.primary", Properties::new().attr("type", "button"))?;
//! let root = Node::element("body");
//! let handle = mount(&button.children("Save"), &root);
//!
//! let clicks = handle.output().stream("click").unwrap();
//! ```

use std::rc::Rc;

use tracing::{debug, trace};

use super::bindings::{
    apply_bindings, apply_class_list, attribute_setter, class_setter, dispatch_actions,
    dispatch_setters, property_setter, style_setter,
};
use super::component::{Child, Component, Scope};
use super::merge::merge_layers;
use super::output::{build_ports, Output};
use super::selector::{parse_selector, SelectorError};
use super::types::{default_properties, Properties};
use crate::engine::Node;

// =============================================================================
// Node Assembly
// =============================================================================

/// Assemble one node under `parent` and return its output.
///
/// Runs inside `scope`: binding effects belong to it, subscriptions and
/// listeners are released when it is disposed. A disposed scope assembles
/// nothing.
pub fn create_element(
    parent: &Node,
    scope: &Scope,
    tag: &str,
    props: &Properties,
    children: Option<&Child>,
) -> Output {
    scope
        .run(|| assemble(parent, scope, tag, props, children))
        .unwrap_or_default()
}

fn assemble(
    parent: &Node,
    scope: &Scope,
    tag: &str,
    props: &Properties,
    children: Option<&Child>,
) -> Output {
    // 1. CREATE NODE
    let node = Node::element(tag);
    trace!(tag, "creating element");

    // 2. BIND VALUES - order matters when two sources write the same thing
    apply_bindings(props.style.as_ref(), &node, style_setter);
    apply_bindings(props.attrs.as_ref(), &node, attribute_setter);
    apply_bindings(props.props.as_ref(), &node, property_setter);
    apply_bindings(props.class_toggle.as_ref(), &node, class_setter);
    apply_class_list(&node, props.class.as_deref());

    // 3. CUSTOM ACTIONS
    let definitions = props.action_definitions.as_ref();
    dispatch_actions(&node, definitions, props.actions.as_ref());
    dispatch_setters(&node, definitions, props.setters.as_ref());

    // 4. OUTPUT PORTS - lazy, so they capture the scope for later cleanup
    let mut output = build_ports(
        &node,
        scope,
        props.behaviors.as_deref(),
        props.streams.as_deref(),
    );

    // 5. CHILDREN
    if let Some(children) = children {
        let child_output = children.run(&node, scope);
        output = if props.wrapper == Some(true) {
            child_output
        } else {
            output.with_children(child_output)
        };
    }

    // 6. RENAME
    if let Some(table) = &props.output {
        output = output.renamed(table);
    }

    // 7. ATTACH
    parent.append_child(&node);
    output
}

// =============================================================================
// Factory
// =============================================================================

/// First argument of [`ElementFactory::create`].
#[derive(Clone)]
pub enum PropsOrChildren {
    Props(Properties),
    Children(Child),
}

impl From<Properties> for PropsOrChildren {
    fn from(value: Properties) -> Self {
        PropsOrChildren::Props(value)
    }
}

impl From<Child> for PropsOrChildren {
    fn from(value: Child) -> Self {
        PropsOrChildren::Children(value)
    }
}

/// Reusable constructor for one kind of element.
///
/// Parsing and default merging happened when the factory was made; every
/// call only merges its own overrides.
#[derive(Clone)]
pub struct ElementFactory {
    tag: Rc<str>,
    props: Rc<Properties>,
}

impl ElementFactory {
    /// Factory for a plain tag name (no selector syntax) over the built-in defaults.
    pub fn from_parts(tag: &str, props: Properties) -> Self {
        Self {
            tag: Rc::from(tag),
            props: Rc::new(default_properties().merge(&props)),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The merged defaults every component of this factory starts from.
    pub fn properties(&self) -> &Properties {
        &self.props
    }

    /// Build a component from an optional props-or-children argument and
    /// optional children.
    ///
    /// Children given in both positions are concatenated.
    pub fn create(&self, first: Option<PropsOrChildren>, children: Option<Child>) -> Component {
        let (props, children) = match (first, children) {
            (None, children) => (self.props.clone(), children),
            (Some(PropsOrChildren::Props(over)), children) => {
                (Rc::new(self.props.merge(&over)), children)
            }
            (Some(PropsOrChildren::Children(first)), None) => (self.props.clone(), Some(first)),
            (Some(PropsOrChildren::Children(first)), Some(second)) => {
                (self.props.clone(), Some(Child::Many(vec![first, second])))
            }
        };

        let tag = self.tag.clone();
        Component::new(move |parent, scope| {
            create_element(parent, scope, &tag, &props, children.as_ref())
        })
    }

    /// No overrides, no children.
    pub fn build(&self) -> Component {
        self.create(None, None)
    }

    pub fn with(&self, props: Properties) -> Component {
        self.create(Some(PropsOrChildren::Props(props)), None)
    }

    pub fn children(&self, children: impl Into<Child>) -> Component {
        self.create(Some(PropsOrChildren::Children(children.into())), None)
    }

    pub fn with_children(&self, props: Properties, children: impl Into<Child>) -> Component {
        self.create(Some(PropsOrChildren::Props(props)), Some(children.into()))
    }
}

/// Make an element factory from a tag description and default properties.
///
/// Layers, lowest precedence first: built-in defaults, the description's
/// id/classes/attributes, `props`.
pub fn e(description: &str, props: Properties) -> Result<ElementFactory, SelectorError> {
    let (tag, selector_props) = parse_selector(description)?;
    let defaults = default_properties();
    let merged = merge_layers([Some(&defaults), Some(&selector_props), Some(&props)]);
    debug!(description, tag = %tag, "element factory created");

    Ok(ElementFactory {
        tag: Rc::from(tag.as_str()),
        props: Rc::new(merged),
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NativeEvent;
    use crate::primitives::types::{BehaviorDescription, StreamDescription};
    use crate::types::Value;
    use spark_signals::signal;
    use std::cell::RefCell;

    fn run(component: &Component) -> (Node, Output, Scope) {
        let root = Node::element("body");
        let scope = Scope::new();
        let output = component.run(&root, &scope);
        (root, output, scope)
    }

    #[test]
    fn test_button_end_to_end() {
        let button = e("button.primary", Properties::new().attr("type", "button")).unwrap();
        let (root, output, _scope) = run(&button.build());

        assert_eq!(root.child_count(), 1);
        let node = root.children()[0].clone();
        assert_eq!(node.tag().as_deref(), Some("button"));
        assert!(node.has_class("primary"));
        assert_eq!(node.attribute("type").as_deref(), Some("button"));

        assert!(output.contains("click"));
        assert!(output.contains("dblclick"));
        assert_eq!(node.listener_count("click"), 0);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let _unsub = output
            .stream("click")
            .unwrap()
            .subscribe(move |v| s.borrow_mut().push(v.clone()));
        assert_eq!(node.listener_count("click"), 1);

        node.dispatch_event(NativeEvent::new("click").with("x", 3));
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        let event = seen[0].as_event().unwrap();
        assert_eq!(event.name, "click");
        assert_eq!(event.get("x"), Value::from(3));
        assert_eq!(event.target(), Some(node.clone()));
    }

    #[test]
    fn test_binding_order_later_source_wins() {
        // class toggle runs before the static class list.
        let factory = e(
            "div",
            Properties::new().class_toggle("shown", false).class("shown"),
        )
        .unwrap();
        let (root, _, _) = run(&factory.build());
        assert!(root.children()[0].has_class("shown"));
    }

    #[test]
    fn test_call_props_override_factory_props() {
        let factory = e("input[type=text]", Properties::new().attr("name", "q")).unwrap();
        let component = factory.with(Properties::new().attr("type", "search"));
        let (root, _, _) = run(&component);

        let node = root.children()[0].clone();
        assert_eq!(node.attribute("type").as_deref(), Some("search"));
        assert_eq!(node.attribute("name").as_deref(), Some("q"));
        // The factory defaults are untouched by the override.
        let (root, _, _) = run(&factory.build());
        assert_eq!(root.children()[0].attribute("type").as_deref(), Some("text"));
    }

    #[test]
    fn test_selector_id_lands_in_property() {
        let factory = e("section#intro", Properties::new()).unwrap();
        let (root, _, _) = run(&factory.build());
        assert_eq!(root.children()[0].id().as_deref(), Some("intro"));
    }

    #[test]
    fn test_children_nested_under_children_key() {
        let inner = e("span", Properties::new()).unwrap();
        let outer = e("div", Properties::new()).unwrap();
        let (root, output, _) = run(&outer.children(inner.children("hi")));

        let div = root.children()[0].clone();
        assert_eq!(div.child_count(), 1);
        assert_eq!(div.text_content(), "hi");

        assert!(output.contains("click"));
        let children = output.children().unwrap();
        assert!(children.contains("click"));
        assert!(children.children().unwrap().is_empty());
    }

    #[test]
    fn test_wrapper_forwards_child_output() {
        let field = e(
            "input",
            Properties::new().behavior(BehaviorDescription::new(
                "input",
                "value",
                |event| event.target_property("value"),
                |node| node.property("value"),
            )),
        )
        .unwrap();
        let label = e("label", Properties::new().wrapper(true)).unwrap();
        let (_, output, _) = run(&label.children(field.build()));

        assert!(output.contains("value"));
        assert!(output.children().is_none());
        assert_eq!(output.keys().collect::<Vec<_>>(), vec!["click", "dblclick", "value"]);
    }

    #[test]
    fn test_wrapper_without_children_keeps_own_ports() {
        let factory = e("div", Properties::new().wrapper(true)).unwrap();
        let (_, output, _) = run(&factory.build());
        assert!(output.contains("click"));
    }

    #[test]
    fn test_output_renaming() {
        let factory = e("button", Properties::new().output("click", "save")).unwrap();
        let (root, output, _) = run(&factory.build());

        assert!(output.contains("save"));
        assert!(!output.contains("click"));
        assert!(output.contains("dblclick"));

        let saves = output.stream("save").unwrap();
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let _unsub = saves.subscribe(move |_| *c.borrow_mut() += 1);
        root.children()[0].dispatch_event(NativeEvent::new("click"));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_custom_streams_replace_defaults() {
        let factory = e(
            "form",
            Properties::new().stream(StreamDescription::identity("submit", "submit")),
        )
        .unwrap();
        let (_, output, _) = run(&factory.build());
        assert_eq!(output.keys().collect::<Vec<_>>(), vec!["submit"]);
    }

    #[test]
    fn test_reactive_bindings_through_factory() {
        let done = signal(false);
        let width = signal("10px".to_string());
        let factory = e(
            "li.todo",
            Properties::new()
                .class_toggle("done", done.clone())
                .style("width", width.clone()),
        )
        .unwrap();
        let (root, _, scope) = run(&factory.children("Write tests"));
        let li = root.children()[0].clone();

        assert!(!li.has_class("done"));
        assert_eq!(li.style("width").as_deref(), Some("10px"));

        done.set(true);
        width.set("20px".to_string());
        assert!(li.has_class("done"));
        assert_eq!(li.style("width").as_deref(), Some("20px"));

        scope.dispose();
        done.set(false);
        assert!(li.has_class("done"));
    }

    #[test]
    fn test_create_with_children_in_both_positions() {
        let factory = e("p", Properties::new()).unwrap();
        let component = factory.create(
            Some(PropsOrChildren::Children("a".into())),
            Some("b".into()),
        );
        let (root, _, _) = run(&component);
        assert_eq!(root.children()[0].text_content(), "ab");
    }

    #[test]
    fn test_children_attached_before_parent_appended() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let o = order.clone();
        let probe = Component::new(move |parent, _| {
            o.borrow_mut().push(parent.parent().is_some());
            Output::new()
        });
        let factory = e("div", Properties::new()).unwrap();
        let (root, _, _) = run(&factory.children(probe));

        // The div was still detached while its child ran.
        assert_eq!(*order.borrow(), vec![false]);
        assert_eq!(root.child_count(), 1);
    }

    #[test]
    fn test_invalid_description_is_reported() {
        assert!(e("div>p", Properties::new()).is_err());
    }

    #[test]
    fn test_disposed_scope_assembles_nothing() {
        let root = Node::element("body");
        let scope = Scope::new();
        scope.dispose();

        let factory = e("div", Properties::new()).unwrap();
        let output = factory.children("ignored").run(&root, &scope);
        assert!(output.is_empty());
        assert_eq!(root.child_count(), 0);
    }
}
