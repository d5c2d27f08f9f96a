//! Engine - Component registry.
//!
//! Components are indices, not objects. The registry hands out indices,
//! maps them to IDs, and stores the interaction flags the focus system
//! reads (focusable, tab index).

mod registry;

pub use registry::*;
