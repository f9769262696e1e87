use crate::core::{Layer, LayerStack};
use crate::time::FrameTimer;
use crate::window::{FrameStatus, Surface};

/// Drives an ordered layer stack over a surface.
///
/// Field order is teardown order: the layers drop before the surface.
pub struct Runtime {
    layers: LayerStack,
    surface: Surface,
    timer: FrameTimer,
    clear_color: wgpu::Color,
}

impl Runtime {
    /// Background color behind the overlay until `set_clear_color`.
    pub const DEFAULT_CLEAR: wgpu::Color = wgpu::Color {
        r: 0.3,
        g: 0.3,
        b: 0.3,
        a: 1.0,
    };

    pub fn new(surface: Surface) -> Self {
        Self {
            layers: LayerStack::default(),
            surface,
            timer: FrameTimer::new(),
            clear_color: Self::DEFAULT_CLEAR,
        }
    }

    /// Hands a layer to the driver. `on_attach` fires now; frame dispatch
    /// and the final detach follow attachment order.
    pub fn attach(&mut self, layer: Box<dyn Layer>) {
        self.layers.push(layer);
    }

    pub fn set_clear_color(&mut self, color: wgpu::Color) {
        self.clear_color = color;
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Runs the continuous loop until the surface should close.
    ///
    /// Each iteration renders one frame (every attached layer gets
    /// `on_update` with the previous iteration's delta, then `on_render`),
    /// advances the timer, pumps events, and presents. On exit every
    /// attached layer is detached in attachment order. Returns false when a
    /// fatal render error ended the loop early.
    pub fn run(&mut self) -> bool {
        log::debug!("loop started with {} layer(s)", self.layers.len());

        let mut clean = true;
        while !self.surface.should_close() {
            let dt = self.timer.delta();
            let clear = self.clear_color;

            let (layers, surface) = (&mut self.layers, &mut self.surface);
            match surface.render_frame(clear, |ui| layers.update_and_render(dt, ui)) {
                Ok(FrameStatus::Drawn | FrameStatus::Skipped) => {}
                Err(err) => {
                    log::error!("frame failed: {err:#}");
                    clean = false;
                    break;
                }
            }

            self.timer.advance(self.surface.time());
            self.surface.poll_events();
            self.surface.present();
        }

        self.layers.detach_all();
        log::debug!("loop stopped after {} frame(s)", self.timer.frame_index());
        clean
    }

    /// Renders exactly one frame with a caller-owned layer.
    ///
    /// The layer is not attached: no `on_attach`, no `on_detach`. Event
    /// pumping and presentation stay with the caller, so the embedding loop
    /// decides when input moves and when the frame reaches the screen.
    ///
    /// Single-step deltas carry the opposite sign of continuous ones: the
    /// timer advances with `last - now` here.
    pub fn run_once(&mut self, layer: &mut dyn Layer) -> bool {
        let dt = self.timer.delta();
        let clear = self.clear_color;

        let result = self.surface.render_frame(clear, |ui| {
            layer.on_update(dt);
            layer.on_render(ui);
        });
        self.timer.advance_negated(self.surface.time());

        match result {
            Ok(_) => true,
            Err(err) => {
                log::error!("frame failed: {err:#}");
                false
            }
        }
    }
}
