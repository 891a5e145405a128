//! Components, child content and cleanup scopes.
//!
//! A [`Component`] is a deferred construction: running it under a parent node
//! creates fresh nodes, appends them, and returns an [`Output`]. A run happens
//! inside its [`Scope`], so every effect it creates belongs to that scope;
//! stream subscriptions and native listeners are registered as scope cleanups.
//! Disposing the scope releases all of it.
//!
//! ```ignore
//! let scope = Scope::new();
//! let output = button.children("Save").run(&root, &scope);
//! // ...
//! scope.dispose(); // every binding installed above stops
//! ```

use std::rc::Rc;

use spark_signals::{effect, effect_scope, on_scope_dispose, EffectScope, Signal};

use super::output::Output;
use super::types::PropValue;
use crate::engine::Node;

// =============================================================================
// Scope
// =============================================================================

/// Owner of everything one construction subscribes.
///
/// Wraps a spark-signals [`EffectScope`]: effects created inside
/// [`run`](Scope::run) are owned by it, and [`add`](Scope::add) registers a
/// cleanup through `on_scope_dispose`. Clones share the same scope.
#[derive(Clone)]
pub struct Scope(EffectScope);

impl Default for Scope {
    fn default() -> Self {
        Scope(effect_scope(false))
    }
}

impl Scope {
    /// New scope. Created inside another scope's `run`, it is stopped with it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with this scope active. `None` once disposed.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        self.0.run(f)
    }

    /// Register a cleanup. Runs immediately if the scope is already disposed.
    pub fn add(&self, cleanup: impl FnOnce() + 'static) {
        if !self.0.active() {
            cleanup();
            return;
        }
        self.0.run(move || on_scope_dispose(cleanup));
    }

    /// Stop owned effects, then run cleanups, newest first. Idempotent.
    pub fn dispose(&self) {
        self.0.stop();
    }

    pub fn is_disposed(&self) -> bool {
        !self.0.active()
    }
}

// =============================================================================
// Component
// =============================================================================

/// A reusable, deferred node construction.
#[derive(Clone)]
pub struct Component(Rc<dyn Fn(&Node, &Scope) -> Output>);

impl Component {
    pub fn new(run: impl Fn(&Node, &Scope) -> Output + 'static) -> Self {
        Component(Rc::new(run))
    }

    /// Construct under `parent` inside `scope`. A disposed scope constructs nothing.
    pub fn run(&self, parent: &Node, scope: &Scope) -> Output {
        scope.run(|| (self.0)(parent, scope)).unwrap_or_default()
    }

    /// Post-process the output of every run.
    pub fn map_output(self, f: impl Fn(Output) -> Output + 'static) -> Component {
        Component::new(move |parent, scope| f(self.run(parent, scope)))
    }
}

// =============================================================================
// Child Content
// =============================================================================

/// Content placed inside an element.
#[derive(Clone)]
pub enum Child {
    /// A static text node.
    Text(String),
    /// A text node whose content follows a reactive value.
    DynamicText(PropValue<String>),
    Component(Component),
    /// Several children in document order; their outputs are merged.
    Many(Vec<Child>),
}

impl Child {
    /// Construct this content under `parent` inside `scope`.
    pub fn run(&self, parent: &Node, scope: &Scope) -> Output {
        scope.run(|| self.construct(parent, scope)).unwrap_or_default()
    }

    fn construct(&self, parent: &Node, scope: &Scope) -> Output {
        match self {
            Child::Text(content) => {
                parent.append_child(&Node::text(content));
                Output::new()
            }
            Child::DynamicText(content) => {
                let node = Node::text(&content.get());
                if content.is_reactive() {
                    let content = content.clone();
                    let target = node.clone();
                    // Owned by the active scope.
                    let _stop = effect(move || target.set_text(&content.get()));
                }
                parent.append_child(&node);
                Output::new()
            }
            Child::Component(component) => component.run(parent, scope),
            Child::Many(children) => children
                .iter()
                .fold(Output::new(), |acc, child| acc.merge(child.run(parent, scope))),
        }
    }

    /// Wrap this content as a component.
    pub fn into_component(self) -> Component {
        match self {
            Child::Component(component) => component,
            other => Component::new(move |parent, scope| other.run(parent, scope)),
        }
    }
}

impl From<&str> for Child {
    fn from(value: &str) -> Self {
        Child::Text(value.to_string())
    }
}

impl From<String> for Child {
    fn from(value: String) -> Self {
        Child::Text(value)
    }
}

impl From<Signal<String>> for Child {
    fn from(value: Signal<String>) -> Self {
        Child::DynamicText(PropValue::Signal(value))
    }
}

impl From<Component> for Child {
    fn from(value: Component) -> Self {
        Child::Component(value)
    }
}

impl<C: Into<Child>> From<Vec<C>> for Child {
    fn from(value: Vec<C>) -> Self {
        Child::Many(value.into_iter().map(Into::into).collect())
    }
}

// =============================================================================
// Tests
// =============================================================================
