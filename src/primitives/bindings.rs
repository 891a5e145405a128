//! Binding appliers and custom action dispatch.
//!
//! Every applier walks a `name -> PropValue` map and either writes the value
//! once (static) or installs an effect that writes the current reading now
//! and on every change (signal/getter).
//!
//! Call these inside [`Scope::run`](super::Scope::run): effects belong to the
//! active scope and stream subscriptions are released with `on_scope_dispose`.

use std::collections::BTreeMap;

use spark_signals::{effect, on_scope_dispose, untrack};
use tracing::error;

use super::types::{ActionDefinition, PropValue};
use crate::engine::Node;
use crate::stream::Stream;
use crate::types::Value;

// =============================================================================
// Setters
// =============================================================================

/// `true` sets an empty attribute, `false` removes it, anything else is stringified.
pub fn attribute_setter(node: &Node, name: &str, value: Value) {
    match value {
        Value::Bool(true) => node.set_attribute(name, ""),
        Value::Bool(false) => node.remove_attribute(name),
        other => node.set_attribute(name, other.to_string()),
    }
}

pub fn property_setter(node: &Node, name: &str, value: Value) {
    node.set_property(name, value);
}

pub fn class_setter(node: &Node, name: &str, on: bool) {
    node.toggle_class(name, on);
}

pub fn style_setter(node: &Node, name: &str, value: String) {
    node.set_style(name, value);
}

// =============================================================================
// Appliers
// =============================================================================

/// Bind every entry of `bindings` to `node` through `setter`.
pub fn apply_bindings<T, F>(
    bindings: Option<&BTreeMap<String, PropValue<T>>>,
    node: &Node,
    setter: F,
) where
    T: Clone + PartialEq + 'static,
    F: Fn(&Node, &str, T) + Copy + 'static,
{
    let Some(bindings) = bindings else { return };

    for (name, value) in bindings {
        match value {
            PropValue::Static(v) => setter(node, name, v.clone()),
            PropValue::Signal(s) => {
                let (s, node, name) = (s.clone(), node.clone(), name.clone());
                let _stop = effect(move || setter(&node, &name, s.get()));
            }
            PropValue::Getter(g) => {
                let (g, node, name) = (g.clone(), node.clone(), name.clone());
                let _stop = effect(move || setter(&node, &name, g()));
            }
        }
    }
}

/// Add each whitespace separated class of a static class list.
pub fn apply_class_list(node: &Node, classes: Option<&str>) {
    for class in classes.unwrap_or_default().split_whitespace() {
        node.add_class(class);
    }
}

// =============================================================================
// Custom Actions
// =============================================================================

fn invoke(definition: Option<&ActionDefinition>, name: &str, node: &Node, value: &Value) {
    match definition {
        Some(definition) => definition(node, value),
        None => error!(action = %name, "no action definition registered, trigger ignored"),
    }
}

/// Run `definitions[name]` once per occurrence of each discrete trigger.
///
/// A trigger without a definition is only reported when it fires.
pub fn dispatch_actions(
    node: &Node,
    definitions: Option<&BTreeMap<String, ActionDefinition>>,
    triggers: Option<&BTreeMap<String, Stream<Value>>>,
) {
    let Some(triggers) = triggers else { return };

    for (name, trigger) in triggers {
        let definition = definitions.and_then(|d| d.get(name)).cloned();
        let (node, name) = (node.clone(), name.clone());
        let unsubscribe = trigger.subscribe(move |value| {
            invoke(definition.as_ref(), &name, &node, value);
        });
        on_scope_dispose(unsubscribe);
    }
}

/// Run `definitions[name]` with the current value of each continuous
/// trigger, then again on every change.
///
/// Only the trigger is tracked. Signals read by the definition itself do not
/// re-run it.
pub fn dispatch_setters(
    node: &Node,
    definitions: Option<&BTreeMap<String, ActionDefinition>>,
    triggers: Option<&BTreeMap<String, PropValue<Value>>>,
) {
    let Some(triggers) = triggers else { return };

    for (name, trigger) in triggers {
        let definition = definitions.and_then(|d| d.get(name)).cloned();
        if let PropValue::Static(value) = trigger {
            invoke(definition.as_ref(), name, node, value);
            continue;
        }
        let (trigger, node, name) = (trigger.clone(), node.clone(), name.clone());
        let _stop = effect(move || {
            let value = trigger.get();
            untrack(|| invoke(definition.as_ref(), &name, &node, &value));
        });
    }
}

// =============================================================================
// Tests
// =============================================================================
