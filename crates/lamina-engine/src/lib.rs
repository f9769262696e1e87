//! A thin shell around one native window: input intake with callback
//! fan-out, an immediate-mode overlay UI, and a loop driver that schedules
//! layers through a deterministic frame protocol.
//!
//! The [`window::Surface`] owns the platform window and routes its events;
//! the [`runtime::Runtime`] drives [`core::Layer`] implementations over it.
//! Applications that want full control of the loop use the surface
//! directly and `runtime::Runtime::run_once`.

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod overlay;
pub mod runtime;
pub mod time;
pub mod window;
