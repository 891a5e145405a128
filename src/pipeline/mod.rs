//! Mounting pipeline
//!
//! Runs a component tree under a root node inside a fresh cleanup scope.
//!
//! ```text
//! Component → run(root, scope) → nodes appended to root + Output
//!                                  │
//!                     MountHandle ─┴─ unmount(): dispose scope, detach nodes
//! ```

pub mod mount;

pub use mount::{mount, unmount, MountHandle};
