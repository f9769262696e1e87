use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

/// Knobs for GPU setup. `Default` is the portable configuration.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB surface format when the platform offers one; UI colors
    /// come out wrong on linear formats.
    pub prefer_srgb: bool,

    /// Swap behavior. The default opts out of the presentation interval, so
    /// frames go to the platform as fast as it accepts them.
    pub present_mode: wgpu::PresentMode,

    /// Surface alpha compositing preference; silently falls back to a
    /// supported mode.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Frame latency hint for the swapchain.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::AutoNoVsync,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

/// The wgpu side of a surface: device, queue, and the configured swapchain.
///
/// Holds an `Arc` of the window through the surface, so the native window
/// stays alive while GPU work can still target it. Resizes are recorded and
/// applied at the next `begin_frame`, never while a frame may be in flight.
pub struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    /// Drawable size in physical pixels, including a pending 0x0.
    size: PhysicalSize<u32>,

    pending_resize: Option<PhysicalSize<u32>>,
}

/// One acquired swapchain frame: texture, its view, and a command encoder.
///
/// Short-lived. The swapchain hands out a bounded number of textures, so a
/// frame must reach `Gpu::submit` (or be dropped) before long.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// What to do about a failed frame acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The surface was reconfigured; the next acquisition should work.
    Reconfigured,
    /// Transient; drop this frame and carry on.
    SkipFrame,
    /// Unrecoverable (out of memory). Stop rendering.
    Fatal,
}

impl Gpu {
    /// Brings up instance, adapter, device, and the configured surface for
    /// `window`.
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("gpu adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("lamina device"),
                required_features: init.required_features,
                required_limits: init.required_limits,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
                experimental_features: Default::default(),
            })
            .await
            .context("failed to create wgpu device")?;

        let caps = surface.get_capabilities(&adapter);
        let format = pick_format(&caps, init.prefer_srgb).context("surface reports no formats")?;
        let alpha_mode = pick_alpha_mode(&caps, init.alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: init.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        surface.configure(&device, &config);

        log::debug!(
            "surface configured: {}x{} {:?} {:?}",
            config.width,
            config.height,
            config.format,
            config.present_mode
        );

        Ok(Gpu {
            surface,
            device,
            queue,
            config,
            size,
            pending_resize: None,
        })
    }

    /// Acquires the next swapchain texture and opens a command encoder for
    /// the frame, applying any recorded resize first.
    pub fn begin_frame(&mut self) -> std::result::Result<GpuFrame, SurfaceError> {
        self.apply_pending_resize();

        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lamina frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the frame's commands and hands back the surface texture.
    ///
    /// The texture is not presented here; the caller decides when it goes to
    /// the screen.
    pub fn submit(&self, frame: GpuFrame) -> wgpu::SurfaceTexture {
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        frame.surface_texture
    }

    /// Maps an acquisition failure to a recovery action, reconfiguring the
    /// surface for lost/outdated swapchains.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        match err {
            SurfaceError::Lost | SurfaceError::Outdated => {
                if self.config.width > 0 && self.config.height > 0 {
                    self.surface.configure(&self.device, &self.config);
                }
                SurfaceErrorAction::Reconfigured
            }
            SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
            SurfaceError::Timeout | SurfaceError::Other => SurfaceErrorAction::SkipFrame,
        }
    }

    /// Records a new drawable size. Takes effect at the next `begin_frame`;
    /// a 0x0 size (minimized) is remembered but never configured, since wgpu
    /// rejects empty surfaces.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.pending_resize = Some(new_size);
    }

    fn apply_pending_resize(&mut self) {
        let Some(new_size) = self.pending_resize.take() else {
            return;
        };

        self.size = new_size;
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Drawable size in physical pixels, as last recorded.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// The configured (never 0x0) drawable size, as the pair the overlay
    /// painter wants.
    pub fn size_in_pixels(&self) -> [u32; 2] {
        [self.config.width, self.config.height]
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}

fn pick_format(caps: &wgpu::SurfaceCapabilities, prefer_srgb: bool) -> Option<wgpu::TextureFormat> {
    if prefer_srgb {
        if let Some(format) = caps.formats.iter().find(|f| f.is_srgb()) {
            return Some(*format);
        }
    }
    caps.formats.first().copied()
}

fn pick_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    preference: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    preference
        .filter(|mode| caps.alpha_modes.contains(mode))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── surface error reporting ───────────────────────────────────────────

    #[test]
    fn surface_error_survives_dispatch_for_logging() {
        // The frame-error path hands a clone to the recovery handler and
        // keeps the original for the log line and the fatal report.
        let err = SurfaceError::Outdated;
        let dispatched = err.clone();
        assert_eq!(format!("{err:?}"), format!("{dispatched:?}"));
    }

    #[test]
    fn fatal_surface_error_carries_context() {
        let report =
            anyhow::anyhow!(SurfaceError::OutOfMemory).context("surface memory exhausted");
        assert!(format!("{report:#}").contains("surface memory exhausted"));
    }
}
