//! Input vocabulary and polled state.
//!
//! Nothing public here leaks platform types: the window host translates
//! winit events into `RawEvent`s, and the `InputTable` answers polled
//! queries with sticky-press semantics.

mod table;
mod types;

pub(crate) mod platform;

pub use table::InputTable;
pub use types::{Action, Key, Modifiers, MouseButton, RawEvent};
