//! # spark-dom
//!
//! Declarative reactive element builder for Rust.
//!
//! Built on [spark-signals](https://crates.io/crates/spark-signals) for fine-grained reactivity.
//!
//! ## Architecture
//!
//! Describe an element once, run it as many times as needed:
//!
//! ```text
//! e("button.primary", props) → ElementFactory → Component → run(parent, scope) → Output
//! ```
//!
//! Attributes, DOM properties, classes and styles accept static values,
//! signals or getters. Native events come back as named output ports
//! (discrete [`Stream`]s and continuous signals) that are only wired up when
//! something reads them.
//!
//! ## Example
//!
//! ```ignore
//! use spark_dom::{e, mount, Node, Properties};
//! use spark_signals::signal;
//!
//! let saving = signal(false);
//! let button = e("button.primary", Properties::new()
//!     .attr("type", "button")
//!     .class_toggle("busy", saving.clone()))?;
//!
//! let root = Node::element("body");
//! let handle = mount(&button.children("Save"), &root);
//!
//! let clicks = handle.output().stream("click").unwrap();
//! let _unsubscribe = clicks.subscribe(move |_| saving.set(true));
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Dynamic [`Value`]
//! - [`engine`] - Native node tree and events
//! - [`stream`] - Discrete-event values
//! - [`primitives`] - Selector parsing, property merging, bindings, node assembly
//! - [`pipeline`] - Mounting and teardown
//! - [`elements`] - Ready-made factories (`div`, `input`, `checkbox`, ...)

pub mod elements;
pub mod engine;
pub mod pipeline;
pub mod primitives;
pub mod stream;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use engine::{ListenerId, NativeEvent, Node, WeakNode};

pub use stream::Stream;

pub use primitives::{
    default_properties, e, merge_layers, merge_properties, parse_selector, BehaviorDescription,
    Child, Cleanup, Component, ElementFactory, Output, Port, PropValue, Properties,
    PropsOrChildren, Scope, SelectorError, StreamDescription,
};

pub use pipeline::{mount, unmount, MountHandle};
