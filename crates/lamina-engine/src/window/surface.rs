use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::input::platform::translate_window_event;
use crate::input::{Action, Key, Modifiers, MouseButton, RawEvent};
use crate::overlay::{Overlay, OverlayOptions};

use super::router::EventRouter;

/// Surface construction parameters.
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    pub title: String,

    /// Requested inner size in logical pixels. Queries report the actual
    /// drawable size in physical pixels once the window exists.
    pub width: u32,
    pub height: u32,

    /// Apply the overlay's root-viewport platform commands (title, size,
    /// visibility, close) back to the native window each frame.
    pub multi_window: bool,

    /// Advisory layout hint forwarded to the overlay and queryable by
    /// applications.
    pub docking: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            title: "lamina".to_string(),
            width: 1280,
            height: 800,
            multi_window: false,
            docking: false,
        }
    }
}

/// Outcome of a frame render.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    /// The frame was drawn and waits for `present`.
    Drawn,
    /// A transient surface problem dropped this frame; the next one renders
    /// normally.
    Skipped,
}

/// One native window with input intake, an overlay UI, and a GPU backend.
///
/// Event dispatch follows a capture-filter policy: the overlay sees every
/// event first, and key/cursor/button/scroll callbacks are suppressed while
/// the overlay wants that input class. Resize callbacks are never
/// suppressed, and polled state (`key_action`, `cursor_position`, ...)
/// always updates regardless of capture.
///
/// The caller owns the loop: `poll_events`/`wait_events` pump the platform,
/// `render_frame` draws, `present` puts the finished frame on screen.
/// Creating a surface claims the process's event loop; a second surface in
/// the same process fails at creation.
pub struct Surface {
    title: String,
    created_at: Instant,
    pending_present: Option<wgpu::SurfaceTexture>,
    window: Arc<Window>,
    host: SurfaceHost,
    event_loop: EventLoop<()>,
}

impl Surface {
    /// Creates the surface with default GPU settings.
    pub fn create(config: SurfaceConfig) -> Result<Self> {
        Self::create_with(config, GpuInit::default())
    }

    /// Creates the window, the GPU backend, and the overlay.
    ///
    /// Everything here is fatal on failure; there is no degraded mode.
    pub fn create_with(config: SurfaceConfig, gpu_init: GpuInit) -> Result<Self> {
        let mut event_loop =
            EventLoop::new().context("failed to create the platform event loop")?;

        let mut host = SurfaceHost::new(config, gpu_init);

        // The platform delivers the startup event on the first pump; a few
        // extra pumps cover platforms that stage it behind other events.
        for _ in 0..8 {
            if host.window.is_some() || host.init_error.is_some() {
                break;
            }
            let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut host);
            if let PumpStatus::Exit(code) = status {
                anyhow::bail!("event loop exited during surface creation (status {code})");
            }
        }

        if let Some(err) = host.init_error.take() {
            return Err(err);
        }
        let Some(window) = host.window.clone() else {
            anyhow::bail!("the platform never delivered the startup event");
        };

        Ok(Self {
            title: host.config.title.clone(),
            created_at: Instant::now(),
            pending_present: None,
            window,
            host,
            event_loop,
        })
    }

    // ── loop protocol ─────────────────────────────────────────────────────

    /// Pumps pending platform events without blocking.
    ///
    /// Opens a new sticky-input interval: presses held over from earlier
    /// pumps stop being reported, then this batch is routed.
    pub fn poll_events(&mut self) {
        self.host.router.begin_interval();
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.host);
        self.absorb_pump_status(status);
    }

    /// Blocks until at least one event arrives, then routes the batch.
    pub fn wait_events(&mut self) {
        self.host.router.begin_interval();
        let status = self.event_loop.pump_app_events(None, &mut self.host);
        self.absorb_pump_status(status);
    }

    fn absorb_pump_status(&mut self, status: PumpStatus) {
        if let PumpStatus::Exit(code) = status {
            log::debug!("event loop requested exit (status {code})");
            self.host.router.request_close();
        }
    }

    /// Renders one frame: runs the overlay frame against `ui`, clears to
    /// `clear`, paints the overlay draw data over the full drawable area,
    /// and holds the finished frame until `present`.
    pub fn render_frame(
        &mut self,
        clear: wgpu::Color,
        ui: impl FnMut(&egui::Context),
    ) -> Result<FrameStatus> {
        match self.host.render_frame(clear, ui)? {
            Some(texture) => {
                // Overwriting an unpresented frame drops it unshown.
                self.pending_present = Some(texture);
                Ok(FrameStatus::Drawn)
            }
            None => Ok(FrameStatus::Skipped),
        }
    }

    /// Presents the most recently rendered frame, if any.
    pub fn present(&mut self) {
        if let Some(texture) = self.pending_present.take() {
            texture.present();
        }
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// True once the platform asked the window to close or `close` was
    /// called. Nothing is torn down until the surface is dropped.
    pub fn should_close(&self) -> bool {
        self.host.router.should_close()
    }

    /// Cooperative close; observed at the next loop-iteration boundary.
    pub fn close(&mut self) {
        self.host.router.close();
    }

    // ── queries ───────────────────────────────────────────────────────────

    /// Seconds since the surface was created (monotonic).
    pub fn time(&self) -> f64 {
        self.created_at.elapsed().as_secs_f64()
    }

    /// The title the surface was created with.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Cached drawable width in physical pixels, as of the last resize event.
    pub fn width(&self) -> u32 {
        self.host.router.width()
    }

    /// Cached drawable height in physical pixels, as of the last resize event.
    pub fn height(&self) -> u32 {
        self.host.router.height()
    }

    pub fn size(&self) -> (u32, u32) {
        self.host.router.size()
    }

    /// Last-known cursor position with a bottom-left origin: y 0 is the
    /// bottom pixel row and y grows upward.
    pub fn cursor_position(&self) -> (f64, f64) {
        self.host.router.cursor_position()
    }

    /// Offsets from the most recent scroll event, captured or not.
    pub fn scroll_offset(&self) -> (f64, f64) {
        self.host.router.scroll_offset()
    }

    /// Polled key state: `Press` while held, and for any key pressed during
    /// the current pump interval even if already released. Unaffected by
    /// overlay capture.
    pub fn key_action(&self, key: Key) -> Action {
        self.host.router.key_action(key)
    }

    /// Polled mouse button state with the same sticky rule as keys.
    pub fn mouse_action(&self, button: MouseButton) -> Action {
        self.host.router.mouse_action(button)
    }

    pub fn modifiers(&self) -> Modifiers {
        self.host.router.modifiers()
    }

    /// Whether the platform last reported the window focused.
    pub fn focused(&self) -> bool {
        self.host.router.focused()
    }

    /// The native window handle.
    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn multi_window_enabled(&self) -> bool {
        self.host.config.multi_window
    }

    /// The advisory docking hint, as the overlay carries it.
    pub fn docking_enabled(&self) -> bool {
        self.host
            .overlay
            .as_ref()
            .map_or(self.host.config.docking, Overlay::docking_enabled)
    }

    // ── callback registration ─────────────────────────────────────────────
    //
    // Registration is append-only: callbacks run in registration order and
    // live until the surface is dropped.

    pub fn on_resize(&mut self, callback: impl FnMut(u32, u32) + 'static) {
        self.host.router.on_resize(Box::new(callback));
    }

    /// Key callbacks see the key, the transition (`Repeat` included), and
    /// the modifier state at delivery time.
    pub fn on_key(&mut self, callback: impl FnMut(Key, Action, Modifiers) + 'static) {
        self.host.router.on_key(Box::new(callback));
    }

    /// Cursor-move callbacks receive bottom-left-origin coordinates.
    pub fn on_cursor_move(&mut self, callback: impl FnMut(f64, f64) + 'static) {
        self.host.router.on_cursor_move(Box::new(callback));
    }

    /// Mouse button callbacks also receive the cursor position at event
    /// time, bottom-left origin.
    pub fn on_mouse_button(
        &mut self,
        callback: impl FnMut(MouseButton, Action, Modifiers, f64, f64) + 'static,
    ) {
        self.host.router.on_mouse_button(Box::new(callback));
    }

    pub fn on_scroll(&mut self, callback: impl FnMut(f64, f64) + 'static) {
        self.host.router.on_scroll(Box::new(callback));
    }
}

/// The `ApplicationHandler` the event loop pumps into.
///
/// Owns everything the platform creates lazily. Window creation happens in
/// `resumed`; any failure is parked in `init_error` for `Surface::create`
/// to pick up, since winit callbacks cannot return errors.
struct SurfaceHost {
    config: SurfaceConfig,
    gpu_init: GpuInit,
    router: EventRouter,
    overlay: Option<Overlay>,
    gpu: Option<Gpu>,
    window: Option<Arc<Window>>,
    init_error: Option<anyhow::Error>,
}

impl SurfaceHost {
    fn new(config: SurfaceConfig, gpu_init: GpuInit) -> Self {
        let router = EventRouter::new(config.width, config.height);
        Self {
            config,
            gpu_init,
            router,
            overlay: None,
            gpu: None,
            window: None,
            init_error: None,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(
                f64::from(self.config.width),
                f64::from(self.config.height),
            ));

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;
        let window = Arc::new(window);

        let gpu = pollster::block_on(Gpu::new(window.clone(), self.gpu_init.clone()))
            .context("failed to initialize the GPU backend")?;

        let overlay = Overlay::new(
            &window,
            gpu.device(),
            gpu.surface_format(),
            OverlayOptions {
                multi_window: self.config.multi_window,
                docking: self.config.docking,
            },
        );

        let size = window.inner_size();
        self.router.set_size(size.width, size.height);

        log::info!(
            "surface ready: \"{}\" {}x{}",
            self.config.title,
            size.width,
            size.height
        );

        self.overlay = Some(overlay);
        self.gpu = Some(gpu);
        self.window = Some(window);
        Ok(())
    }

    fn render_frame(
        &mut self,
        clear: wgpu::Color,
        ui: impl FnMut(&egui::Context),
    ) -> Result<Option<wgpu::SurfaceTexture>> {
        let (Some(window), Some(gpu), Some(overlay)) =
            (&self.window, &mut self.gpu, &mut self.overlay)
        else {
            anyhow::bail!("surface is not initialized");
        };

        let mut frame = match gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                return match gpu.handle_surface_error(err.clone()) {
                    SurfaceErrorAction::Reconfigured => {
                        log::warn!("surface reconfigured after {err:?}");
                        Ok(None)
                    }
                    SurfaceErrorAction::SkipFrame => {
                        log::warn!("skipping frame after {err:?}");
                        Ok(None)
                    }
                    SurfaceErrorAction::Fatal => {
                        Err(anyhow::anyhow!(err).context("surface memory exhausted"))
                    }
                };
            }
        };

        let mut output = overlay.run_frame(window, ui);
        let viewport_output = std::mem::take(&mut output.viewport_output);

        overlay.paint(
            window,
            gpu.device(),
            gpu.queue(),
            &mut frame.encoder,
            &frame.view,
            clear,
            gpu.size_in_pixels(),
            output,
        );

        if overlay.multi_window_enabled() {
            let effects = overlay.update_platform_windows(window, viewport_output);

            // A size the platform applied on the spot never echoes back as a
            // Resized event; feed it down the resize path by hand.
            if let Some(size) = effects.resized {
                gpu.resize(size);
                self.router.route(
                    RawEvent::Resized {
                        width: size.width,
                        height: size.height,
                    },
                    overlay.capture_intent(),
                );
            }

            if effects.close_requested {
                self.router.request_close();
            }
        }

        Ok(Some(gpu.submit(frame)))
    }
}

impl ApplicationHandler for SurfaceHost {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.init_error.is_some() {
            return;
        }

        if let Err(err) = self.create_window(event_loop) {
            self.init_error = Some(err);
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(window), Some(gpu), Some(overlay)) =
            (&self.window, &mut self.gpu, &mut self.overlay)
        else {
            return;
        };

        // The overlay sees every event before routing; capture intent is
        // sampled after intake so it reflects this event.
        overlay.on_window_event(window, &event);

        match event {
            WindowEvent::Resized(size) => {
                gpu.resize(size);
                self.router.route(
                    RawEvent::Resized {
                        width: size.width,
                        height: size.height,
                    },
                    overlay.capture_intent(),
                );
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                // The event itself carries no final size; ask the window.
                let size = window.inner_size();
                gpu.resize(size);
                self.router.route(
                    RawEvent::Resized {
                        width: size.width,
                        height: size.height,
                    },
                    overlay.capture_intent(),
                );
            }

            other => {
                if let Some(ev) = translate_window_event(&other) {
                    self.router.route(ev, overlay.capture_intent());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = SurfaceConfig::default();
        assert_eq!(config.title, "lamina");
        assert_eq!((config.width, config.height), (1280, 800));
        assert!(!config.multi_window);
        assert!(!config.docking);
    }
}
