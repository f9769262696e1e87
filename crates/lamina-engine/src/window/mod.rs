//! Native window surface.
//!
//! [`Surface`] owns the event loop, the window, the GPU backend, and the
//! overlay, and routes platform events through capture filtering to the
//! registered callbacks. The router holds the input caches and the
//! callback lists; the surface wires platform intake to it.

mod router;
mod surface;

pub use surface::{FrameStatus, Surface, SurfaceConfig};
