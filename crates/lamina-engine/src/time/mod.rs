//! Frame timing.
//!
//! The `FrameTimer` never reads a clock itself; the loop driver feeds it
//! `Surface::time` once per frame. One timer per driver.

mod frame_timer;

pub use frame_timer::FrameTimer;
