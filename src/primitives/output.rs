//! Output objects - named reactive ports produced by a construction.
//!
//! Stream and behavior ports are lazy: building one subscribes a native
//! listener, so that only happens the first time somebody reads the port.
//! The materialized value is memoized and shared by every clone of the
//! [`Output`].

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::trace;

use super::component::Scope;
use super::types::{BehaviorDescription, StreamDescription};
use crate::engine::Node;
use crate::stream::Stream;
use crate::types::Value;

/// Key under which nested children output is stored.
pub const CHILDREN: &str = "children";

// =============================================================================
// Lazy Ports
// =============================================================================

/// Memoized, lazily-built discrete output.
#[derive(Clone)]
pub struct LazyStream {
    cell: Rc<OnceCell<Stream<Value>>>,
    init: Rc<dyn Fn() -> Stream<Value>>,
}

impl LazyStream {
    pub fn new(init: impl Fn() -> Stream<Value> + 'static) -> Self {
        Self {
            cell: Rc::new(OnceCell::new()),
            init: Rc::new(init),
        }
    }

    /// Build on first call, then return the same stream.
    pub fn get(&self) -> Stream<Value> {
        self.cell.get_or_init(|| (self.init)()).clone()
    }

    pub fn is_materialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

/// Memoized, lazily-built continuous output.
#[derive(Clone)]
pub struct LazyBehavior {
    cell: Rc<OnceCell<Signal<Value>>>,
    init: Rc<dyn Fn() -> Signal<Value>>,
}

impl LazyBehavior {
    pub fn new(init: impl Fn() -> Signal<Value> + 'static) -> Self {
        Self {
            cell: Rc::new(OnceCell::new()),
            init: Rc::new(init),
        }
    }

    /// Build on first call, then return the same signal.
    pub fn get(&self) -> Signal<Value> {
        self.cell.get_or_init(|| (self.init)()).clone()
    }

    pub fn is_materialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

// =============================================================================
// Port / Output
// =============================================================================

/// One named entry of an output object.
#[derive(Clone)]
pub enum Port {
    Stream(LazyStream),
    Behavior(LazyBehavior),
    Children(Output),
}

/// Named reactive outputs of one construction.
#[derive(Clone, Default)]
pub struct Output {
    ports: BTreeMap<String, Port>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, port: Port) {
        self.ports.insert(name.into(), port);
    }

    pub fn get(&self, name: &str) -> Option<&Port> {
        self.ports.get(name)
    }

    /// Read a stream port, materializing it on first access.
    pub fn stream(&self, name: &str) -> Option<Stream<Value>> {
        match self.ports.get(name)? {
            Port::Stream(lazy) => Some(lazy.get()),
            _ => None,
        }
    }

    /// Read a behavior port, materializing it on first access.
    pub fn behavior(&self, name: &str) -> Option<Signal<Value>> {
        match self.ports.get(name)? {
            Port::Behavior(lazy) => Some(lazy.get()),
            _ => None,
        }
    }

    /// Nested output stored under `children`.
    pub fn children(&self) -> Option<&Output> {
        self.nested(CHILDREN)
    }

    pub fn nested(&self, name: &str) -> Option<&Output> {
        match self.ports.get(name)? {
            Port::Children(output) => Some(output),
            _ => None,
        }
    }

    /// Whether a lazy port has been built. `false` for nested outputs and unknown names.
    pub fn is_materialized(&self, name: &str) -> bool {
        match self.ports.get(name) {
            Some(Port::Stream(lazy)) => lazy.is_materialized(),
            Some(Port::Behavior(lazy)) => lazy.is_materialized(),
            _ => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ports.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.ports.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Union of both outputs; `other` wins on key collision.
    pub fn merge(mut self, other: Output) -> Output {
        self.ports.extend(other.ports);
        self
    }

    /// Nest `children` under the `children` key.
    pub fn with_children(mut self, children: Output) -> Output {
        self.ports.insert(CHILDREN.to_string(), Port::Children(children));
        self
    }

    /// Apply a renaming table. Renamed keys drop their original name; keys
    /// missing from the table are kept as they are.
    pub fn renamed(&self, table: &BTreeMap<String, String>) -> Output {
        let mut kept = BTreeMap::new();
        let mut moved = BTreeMap::new();
        for (name, port) in &self.ports {
            match table.get(name) {
                Some(alias) => {
                    moved.insert(alias.clone(), port.clone());
                }
                None => {
                    kept.insert(name.clone(), port.clone());
                }
            }
        }
        // Aliases win over untouched keys of the same name.
        kept.extend(moved);
        Output { ports: kept }
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, port) in &self.ports {
            match port {
                Port::Stream(_) => map.entry(name, &"Stream"),
                Port::Behavior(_) => map.entry(name, &"Behavior"),
                Port::Children(output) => map.entry(name, output),
            };
        }
        map.finish()
    }
}

// =============================================================================
// Port Builders
// =============================================================================

fn behavior_port(node: &Node, scope: &Scope, description: &BehaviorDescription) -> LazyBehavior {
    let node = node.clone();
    let scope = scope.clone();
    let description = description.clone();

    LazyBehavior::new(move || {
        let held = signal((description.initial)(&node));
        let target = held.clone();
        let extractor = description.extractor.clone();
        let id = node.add_event_listener(&description.event, move |event| {
            target.set(extractor(event));
        });

        let owner = node.clone();
        scope.add(move || owner.remove_event_listener(id));
        trace!(event = %description.event, port = %description.name, "behavior port materialized");
        held
    })
}

fn stream_port(node: &Node, scope: &Scope, description: &StreamDescription) -> LazyStream {
    let node = node.clone();
    let scope = scope.clone();
    let description = description.clone();

    LazyStream::new(move || {
        let stream = Stream::new();
        let target = stream.clone();
        let extractor = description.extractor.clone();
        let id = node.add_event_listener(&description.event, move |event| {
            target.push(extractor(event));
        });

        let owner = node.clone();
        scope.add(move || owner.remove_event_listener(id));
        trace!(event = %description.event, port = %description.name, "stream port materialized");
        stream
    })
}

/// Declare one lazy port per behavior and stream description.
///
/// Materializing a port registers its listener removal with `scope`, even
/// when the read happens long after construction. Streams are declared after
/// behaviors, so a stream wins a name clash.
pub fn build_ports(
    node: &Node,
    scope: &Scope,
    behaviors: Option<&[BehaviorDescription]>,
    streams: Option<&[StreamDescription]>,
) -> Output {
    let mut output = Output::new();
    for description in behaviors.unwrap_or_default() {
        output.insert(
            description.name.clone(),
            Port::Behavior(behavior_port(node, scope, description)),
        );
    }
    for description in streams.unwrap_or_default() {
        output.insert(
            description.name.clone(),
            Port::Stream(stream_port(node, scope, description)),
        );
    }
    output
}

// =============================================================================
// Tests
// =============================================================================
