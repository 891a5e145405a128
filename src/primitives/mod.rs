//! Element builder primitives.
//!
//! This module turns declarative descriptions into live nodes:
//! - [`e`] - factory from a `tag#id.class[attr=value]` description
//! - [`Properties`] - static and reactive bindings, custom actions, ports
//! - [`Component`] / [`Child`] - deferred construction and child content
//! - [`Output`] - lazily materialized streams and behaviors of a node
//!
//! # Reactivity
//!
//! Binding values can be:
//! - Static values: `.attr("type", "button")`
//! - Signals: `.class_toggle("done", done_signal)` (stays connected!)
//! - Getters: `.style("width", PropValue::getter(move || ...))`
//!
//! Pass signals themselves, not their current values:
//!
//! ```ignore
//! // CORRECT - signal stays connected
//! Properties::new().class_toggle("done", done.clone());
//!
//! // WRONG - reads once, breaks reactivity
//! Properties::new().class_toggle("done", done.get());
//! ```

mod bindings;
mod component;
mod element;
mod merge;
mod output;
mod selector;
mod types;

pub use bindings::*;
pub use component::*;
pub use element::*;
pub use merge::*;
pub use output::*;
pub use selector::*;
pub use types::*;
