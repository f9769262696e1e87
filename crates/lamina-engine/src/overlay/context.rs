use std::collections::HashSet;

use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::window::Window;

/// Overlay configuration knobs.
#[derive(Debug, Copy, Clone, Default)]
pub struct OverlayOptions {
    /// Apply the overlay's platform commands for the root viewport
    /// (title, size, visibility, close) back to the native window.
    pub multi_window: bool,

    /// Advisory layout hint exposed to applications.
    ///
    /// The overlay library has no built-in docking; applications that honor
    /// this flag arrange their panels instead of floating windows.
    pub docking: bool,
}

/// Which input classes the overlay wants for itself this moment.
///
/// Sampled when an event is routed; the router suppresses user callbacks of
/// a captured class while still updating polled state.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct CaptureIntent {
    pub keyboard: bool,
    pub pointer: bool,
}

impl CaptureIntent {
    /// Intent that captures nothing; events pass through unfiltered.
    pub fn none() -> Self {
        Self::default()
    }
}

/// What a platform-command pass asks of the host.
#[derive(Debug, Copy, Clone, Default)]
pub struct PlatformEffects {
    /// The overlay asked the root window to close.
    pub close_requested: bool,

    /// Inner size the platform applied on the spot. Such a change produces
    /// no `Resized` event, so the host must route it itself.
    pub resized: Option<PhysicalSize<u32>>,
}

/// Immediate-mode overlay UI bound to one window and one device.
///
/// Owns the egui context, its winit state, and the wgpu renderer. A frame
/// runs in two halves: `run_frame` collects input and builds the UI,
/// `paint` uploads and draws the output into an externally-owned render
/// pass target.
pub struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    options: OverlayOptions,
    warned_viewports: HashSet<egui::ViewportId>,
}

impl Overlay {
    pub fn new(
        window: &Window,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        options: OverlayOptions,
    ) -> Self {
        let ctx = egui::Context::default();

        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            None,
            None,
            None,
        );

        let renderer = egui_wgpu::Renderer::new(
            device,
            format,
            egui_wgpu::RendererOptions {
                depth_stencil_format: None,
                msaa_samples: 1,
                ..Default::default()
            },
        );

        Self {
            ctx,
            state,
            renderer,
            options,
            warned_viewports: HashSet::new(),
        }
    }

    /// Feeds a window event to the overlay.
    ///
    /// Returns whether the overlay considered the event consumed. Routing
    /// does not branch on this; capture filtering uses `capture_intent`.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.state.on_window_event(window, event);
        response.consumed
    }

    /// Snapshot of the overlay's current input capture.
    pub fn capture_intent(&self) -> CaptureIntent {
        CaptureIntent {
            keyboard: self.ctx.wants_keyboard_input(),
            pointer: self.ctx.wants_pointer_input(),
        }
    }

    pub fn multi_window_enabled(&self) -> bool {
        self.options.multi_window
    }

    pub fn docking_enabled(&self) -> bool {
        self.options.docking
    }

    /// Runs one UI frame: takes accumulated input (including the current
    /// drawable size) and invokes the UI closure.
    pub fn run_frame(
        &mut self,
        window: &Window,
        mut ui: impl FnMut(&egui::Context),
    ) -> egui::FullOutput {
        let raw_input = self.state.take_egui_input(window);
        self.ctx.run(raw_input, |ctx| ui(ctx))
    }

    /// Uploads the frame output and draws it.
    ///
    /// Opens a render pass on `view` that clears to `clear`, spans the full
    /// drawable area and paints the overlay's draw data over it.
    pub fn paint(
        &mut self,
        window: &Window,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        clear: wgpu::Color,
        size_in_pixels: [u32; 2],
        output: egui::FullOutput,
    ) {
        self.state
            .handle_platform_output(window, output.platform_output);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: window.scale_factor() as f32,
        };

        let tris = self.ctx.tessellate(output.shapes, output.pixels_per_point);

        for (id, image_delta) in &output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        self.renderer
            .update_buffers(device, queue, encoder, &tris, &screen_descriptor);

        {
            let rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("overlay pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut rpass = rpass.forget_lifetime();
            rpass.set_viewport(
                0.0,
                0.0,
                size_in_pixels[0] as f32,
                size_in_pixels[1] as f32,
                0.0,
                1.0,
            );

            self.renderer.render(&mut rpass, &tris, &screen_descriptor);
        }

        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }

    /// Applies the overlay's root-viewport platform commands to the window
    /// and reports what the host still has to act on.
    ///
    /// Secondary viewports are not supported by this integration; the first
    /// command for an unknown viewport logs a warning and is dropped.
    pub fn update_platform_windows(
        &mut self,
        window: &Window,
        viewport_output: egui::OrderedViewportIdMap<egui::ViewportOutput>,
    ) -> PlatformEffects {
        let mut effects = PlatformEffects::default();

        for (id, out) in viewport_output {
            if id != egui::ViewportId::ROOT {
                if self.warned_viewports.insert(id) {
                    log::warn!("overlay viewport {id:?} ignored; only the root window is managed");
                }
                continue;
            }

            for command in out.commands {
                match command {
                    egui::ViewportCommand::Close => effects.close_requested = true,
                    egui::ViewportCommand::Title(title) => window.set_title(&title),
                    egui::ViewportCommand::InnerSize(size) => {
                        let applied = window.request_inner_size(LogicalSize::new(
                            size.x as f64,
                            size.y as f64,
                        ));
                        if applied.is_some() {
                            effects.resized = applied;
                        }
                    }
                    egui::ViewportCommand::Visible(visible) => window.set_visible(visible),
                    _ => {}
                }
            }
        }

        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── host plumbing ─────────────────────────────────────────────────────

    #[test]
    fn frame_output_viewport_map_feeds_the_platform_pass() {
        let mut output = egui::FullOutput::default();
        let taken = std::mem::take(&mut output.viewport_output);
        assert!(taken.is_empty());

        // The map taken from the frame output is exactly what the platform
        // pass consumes.
        let _pass: fn(
            &mut Overlay,
            &Window,
            egui::OrderedViewportIdMap<egui::ViewportOutput>,
        ) -> PlatformEffects = Overlay::update_platform_windows;
    }

    #[test]
    fn platform_effects_default_asks_nothing() {
        let effects = PlatformEffects::default();
        assert!(!effects.close_requested);
        assert!(effects.resized.is_none());
    }
}
