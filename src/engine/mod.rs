//! Native node engine - the imperative surface the element builder drives.
//!
//! The engine owns a retained tree of nodes that behaves like a browser DOM:
//! - Node: element or text node with attributes, properties, classes, style
//! - Events: native events and the per-node listener registry
//!
//! # Architecture
//!
//! Nodes are shared handles (`Rc<RefCell<..>>`). Every mutation is immediate and
//! synchronous, so a reactive binding that writes to a node is observable the
//! moment its signal changes:
//!
//! ```text
//! <div id="app">
//!   <button class="primary" type="button">   (listeners: click, dblclick)
//!     "Save"
//! ```
//!
//! Event dispatch clones the matching listeners out of the registry before
//! invoking them, so a listener may freely mutate the node it fired on.

mod events;
mod node;

pub use events::*;
pub use node::*;
