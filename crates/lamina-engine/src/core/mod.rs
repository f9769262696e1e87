//! Application contracts.
//!
//! The [`Layer`] trait is the unit the loop driver schedules; the
//! [`LayerStack`] keeps attachment order authoritative for dispatch and
//! detach.

mod layer;
mod stack;

pub use layer::Layer;
pub use stack::LayerStack;
