//! wgpu backing for a surface.
//!
//! Covers adapter/device/queue acquisition, swapchain configuration and
//! format choice, frame acquisition with deferred resizes, and the
//! recovery policy for surface errors.

mod gpu;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
