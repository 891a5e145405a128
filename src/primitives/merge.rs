//! Property merging - layering `Properties` with right-hand precedence.
//!
//! Mapping fields (`style`, `attrs`, `props`, `class_toggle`,
//! `action_definitions`, `actions`, `setters`, `output`) are unioned key by
//! key, the right-hand entry winning on collision. Every other field is
//! replaced wholesale when the right-hand side sets it.

use std::collections::BTreeMap;

use super::types::Properties;

fn merge_map<V: Clone>(
    base: &Option<BTreeMap<String, V>>,
    over: &Option<BTreeMap<String, V>>,
) -> Option<BTreeMap<String, V>> {
    match (base, over) {
        (Some(base), Some(over)) => {
            let mut merged = base.clone();
            merged.extend(over.iter().map(|(k, v)| (k.clone(), v.clone())));
            Some(merged)
        }
        (None, Some(over)) => Some(over.clone()),
        (base, None) => base.clone(),
    }
}

fn replace<V: Clone>(base: &Option<V>, over: &Option<V>) -> Option<V> {
    over.clone().or_else(|| base.clone())
}

impl Properties {
    /// Deep-merge `over` on top of `self`.
    pub fn merge(&self, over: &Properties) -> Properties {
        Properties {
            wrapper: replace(&self.wrapper, &over.wrapper),
            streams: replace(&self.streams, &over.streams),
            behaviors: replace(&self.behaviors, &over.behaviors),
            style: merge_map(&self.style, &over.style),
            attrs: merge_map(&self.attrs, &over.attrs),
            props: merge_map(&self.props, &over.props),
            class_toggle: merge_map(&self.class_toggle, &over.class_toggle),
            action_definitions: merge_map(&self.action_definitions, &over.action_definitions),
            actions: merge_map(&self.actions, &over.actions),
            setters: merge_map(&self.setters, &over.setters),
            class: replace(&self.class, &over.class),
            output: merge_map(&self.output, &over.output),
        }
    }
}

/// Merge two optional layers. A missing layer contributes nothing.
pub fn merge_properties(base: Option<&Properties>, over: Option<&Properties>) -> Properties {
    match (base, over) {
        (Some(base), Some(over)) => base.merge(over),
        (Some(only), None) | (None, Some(only)) => only.clone(),
        (None, None) => Properties::default(),
    }
}

/// Merge layers from lowest to highest precedence.
pub fn merge_layers<'a>(layers: impl IntoIterator<Item = Option<&'a Properties>>) -> Properties {
    layers
        .into_iter()
        .flatten()
        .fold(Properties::default(), |acc, layer| acc.merge(layer))
}
