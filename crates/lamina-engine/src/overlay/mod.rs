//! Overlay UI context.
//!
//! Wraps the egui context, its winit event intake, and the wgpu painter
//! behind one type. The surface feeds it window events before routing and
//! drives its two frame halves (build, paint) from the frame protocol.

mod context;

pub use context::{CaptureIntent, Overlay, OverlayOptions, PlatformEffects};
