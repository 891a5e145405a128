//! Primitive types - Props, descriptions and cleanup.
//!
//! These types describe an element before it exists: which bindings to
//! attach, which output ports to expose, which custom actions to wire.
//! Props support static values, signals, and getters for reactivity.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use spark_signals::Signal;

use crate::engine::{NativeEvent, Node};
use crate::stream::Stream;
use crate::types::Value;

// =============================================================================
// Cleanup Function
// =============================================================================

/// Boxed release of a listener or subscription.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Callback Types
// =============================================================================

/// Turns a native event into the value an output port carries.
pub type Extractor = Rc<dyn Fn(&NativeEvent) -> Value>;

/// Reads a behavior's initial value off the freshly created node.
pub type InitialFn = Rc<dyn Fn(&Node) -> Value>;

/// Imperative custom action, invoked with the node and the trigger's value.
pub type ActionDefinition = Rc<dyn Fn(&Node, &Value)>;

/// Extractor that hands the raw native event through.
pub fn identity_extractor() -> Extractor {
    Rc::new(|event: &NativeEvent| Value::Event(event.clone()))
}

// =============================================================================
// Prop Value - Reactive property wrapper
// =============================================================================

/// A property value that can be static, a signal, or a getter.
///
/// Static values are written once. Signals and getters are observed: the
/// current reading is written immediately and again on every change.
#[derive(Clone)]
pub enum PropValue<T: Clone + PartialEq + 'static> {
    /// Static value (not reactive).
    Static(T),
    /// Reactive signal (changes propagate automatically).
    Signal(Signal<T>),
    /// Getter function (re-evaluated when the signals it reads change).
    Getter(Rc<dyn Fn() -> T>),
}

impl<T: Clone + PartialEq + 'static> PropValue<T> {
    /// Build a getter prop from a closure.
    pub fn getter(f: impl Fn() -> T + 'static) -> Self {
        PropValue::Getter(Rc::new(f))
    }

    /// Get the current value (for immediate reads).
    pub fn get(&self) -> T {
        match self {
            PropValue::Static(v) => v.clone(),
            PropValue::Signal(s) => s.get(),
            PropValue::Getter(f) => f(),
        }
    }

    /// The value, if this prop is static.
    pub fn as_static(&self) -> Option<&T> {
        match self {
            PropValue::Static(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_reactive(&self) -> bool {
        !matches!(self, PropValue::Static(_))
    }
}

impl<T: Clone + PartialEq + fmt::Debug + 'static> fmt::Debug for PropValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Static(v) => f.debug_tuple("Static").field(v).finish(),
            PropValue::Signal(_) => f.write_str("Signal(..)"),
            PropValue::Getter(_) => f.write_str("Getter(..)"),
        }
    }
}

impl<T: Clone + PartialEq + 'static> From<T> for PropValue<T> {
    fn from(value: T) -> Self {
        PropValue::Static(value)
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<T>> for PropValue<T> {
    fn from(signal: Signal<T>) -> Self {
        PropValue::Signal(signal)
    }
}

impl From<&str> for PropValue<String> {
    fn from(value: &str) -> Self {
        PropValue::Static(value.to_string())
    }
}

impl From<&str> for PropValue<Value> {
    fn from(value: &str) -> Self {
        PropValue::Static(Value::from(value))
    }
}

impl From<String> for PropValue<Value> {
    fn from(value: String) -> Self {
        PropValue::Static(Value::from(value))
    }
}

impl From<bool> for PropValue<Value> {
    fn from(value: bool) -> Self {
        PropValue::Static(Value::Bool(value))
    }
}

impl From<f64> for PropValue<Value> {
    fn from(value: f64) -> Self {
        PropValue::Static(Value::Number(value))
    }
}

impl From<i32> for PropValue<Value> {
    fn from(value: i32) -> Self {
        PropValue::Static(Value::from(value))
    }
}

// =============================================================================
// Output Port Descriptions
// =============================================================================

/// A discrete output: `event` occurrences become `name` occurrences.
#[derive(Clone)]
pub struct StreamDescription {
    pub event: String,
    pub name: String,
    pub extractor: Extractor,
}

impl StreamDescription {
    pub fn new(
        event: impl Into<String>,
        name: impl Into<String>,
        extractor: impl Fn(&NativeEvent) -> Value + 'static,
    ) -> Self {
        Self {
            event: event.into(),
            name: name.into(),
            extractor: Rc::new(extractor),
        }
    }

    /// Port carrying the raw native event.
    pub fn identity(event: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            name: name.into(),
            extractor: identity_extractor(),
        }
    }
}

/// A continuous output seeded from the node and updated by `event`.
#[derive(Clone)]
pub struct BehaviorDescription {
    pub event: String,
    pub name: String,
    pub extractor: Extractor,
    pub initial: InitialFn,
}

impl BehaviorDescription {
    pub fn new(
        event: impl Into<String>,
        name: impl Into<String>,
        extractor: impl Fn(&NativeEvent) -> Value + 'static,
        initial: impl Fn(&Node) -> Value + 'static,
    ) -> Self {
        Self {
            event: event.into(),
            name: name.into(),
            extractor: Rc::new(extractor),
            initial: Rc::new(initial),
        }
    }
}

// =============================================================================
// Properties
// =============================================================================

/// Everything an element is built from, besides its children.
///
/// Every field is optional so that layers (built-in defaults, selector,
/// factory props, call-site props) can be merged with
/// [`Properties::merge`](Properties::merge).
///
/// # Example
///
/// ```ignore
/// use spark_dom::{e, Properties};
/// use spark_signals::signal;
///
/// let busy = signal(false);
///
/// let button = e("button.primary", Properties::new()
///     .attr("type", "button")
///     .class_toggle("busy", busy.clone()))?;
/// ```
#[derive(Clone, Default)]
pub struct Properties {
    /// Replace this node's output with its children's output.
    pub wrapper: Option<bool>,
    pub streams: Option<Vec<StreamDescription>>,
    pub behaviors: Option<Vec<BehaviorDescription>>,
    pub style: Option<BTreeMap<String, PropValue<String>>>,
    pub attrs: Option<BTreeMap<String, PropValue<Value>>>,
    pub props: Option<BTreeMap<String, PropValue<Value>>>,
    pub class_toggle: Option<BTreeMap<String, PropValue<bool>>>,
    pub action_definitions: Option<BTreeMap<String, ActionDefinition>>,
    /// Discrete triggers for entries of `action_definitions`.
    pub actions: Option<BTreeMap<String, Stream<Value>>>,
    /// Continuous triggers for entries of `action_definitions`.
    pub setters: Option<BTreeMap<String, PropValue<Value>>>,
    /// Space separated static class list.
    pub class: Option<String>,
    /// Output renaming table (`from -> to`).
    pub output: Option<BTreeMap<String, String>>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wrapper(mut self, wrapper: bool) -> Self {
        self.wrapper = Some(wrapper);
        self
    }

    pub fn stream(mut self, description: StreamDescription) -> Self {
        self.streams.get_or_insert_with(Vec::new).push(description);
        self
    }

    pub fn behavior(mut self, description: BehaviorDescription) -> Self {
        self.behaviors.get_or_insert_with(Vec::new).push(description);
        self
    }

    pub fn style(mut self, name: &str, value: impl Into<PropValue<String>>) -> Self {
        self.style
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_string(), value.into());
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<PropValue<Value>>) -> Self {
        self.attrs
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_string(), value.into());
        self
    }

    pub fn prop(mut self, name: &str, value: impl Into<PropValue<Value>>) -> Self {
        self.props
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_string(), value.into());
        self
    }

    pub fn class_toggle(mut self, name: &str, value: impl Into<PropValue<bool>>) -> Self {
        self.class_toggle
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_string(), value.into());
        self
    }

    pub fn action_definition(
        mut self,
        name: &str,
        definition: impl Fn(&Node, &Value) + 'static,
    ) -> Self {
        self.action_definitions
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_string(), Rc::new(definition));
        self
    }

    pub fn action(mut self, name: &str, trigger: Stream<Value>) -> Self {
        self.actions
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_string(), trigger);
        self
    }

    pub fn setter(mut self, name: &str, trigger: impl Into<PropValue<Value>>) -> Self {
        self.setters
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_string(), trigger.into());
        self
    }

    pub fn class(mut self, classes: &str) -> Self {
        self.class = Some(classes.to_string());
        self
    }

    pub fn output(mut self, from: &str, to: &str) -> Self {
        self.output
            .get_or_insert_with(BTreeMap::new)
            .insert(from.to_string(), to.to_string());
        self
    }
}

/// Output streams that all elements share: `click` and `dblclick`.
pub fn default_properties() -> Properties {
    Properties::new()
        .stream(StreamDescription::identity("click", "click"))
        .stream(StreamDescription::identity("dblclick", "dblclick"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use spark_signals::signal;

    #[test]
    fn test_prop_value_get() {
        let s = signal(Value::from("a"));
        let p: PropValue<Value> = s.clone().into();
        assert!(p.is_reactive());
        assert_eq!(p.get(), Value::from("a"));

        s.set(Value::from("b"));
        assert_eq!(p.get(), Value::from("b"));

        let g = PropValue::getter(|| 4);
        assert_eq!(g.get(), 4);
        assert!(g.as_static().is_none());
    }

    #[test]
    fn test_builder_fills_maps() {
        let props = Properties::new()
            .attr("type", "button")
            .attr("disabled", true)
            .style("color", "red")
            .class_toggle("active", false)
            .output("click", "pressed");

        let attrs = props.attrs.as_ref().unwrap();
        assert_eq!(attrs["type"].as_static(), Some(&Value::from("button")));
        assert_eq!(attrs["disabled"].as_static(), Some(&Value::Bool(true)));
        assert_eq!(props.style.as_ref().unwrap()["color"].as_static().map(String::as_str), Some("red"));
        assert_eq!(props.class_toggle.as_ref().unwrap()["active"].as_static(), Some(&false));
        assert_eq!(props.output.as_ref().unwrap()["click"], "pressed");
    }

    #[test]
    fn test_default_streams() {
        let defaults = default_properties();
        let names: Vec<_> = defaults
            .streams
            .unwrap()
            .iter()
            .map(|d| (d.event.clone(), d.name.clone()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("click".to_string(), "click".to_string()),
                ("dblclick".to_string(), "dblclick".to_string()),
            ]
        );
    }
}
