/// A unit of application behavior scheduled by the loop driver.
///
/// Hooks default to no-ops so implementors override only what they need.
/// For an attached layer the sequence is: `on_attach` once at attachment,
/// `on_update` then `on_render` once per frame in attachment order, and
/// `on_detach` once when the continuous loop exits.
pub trait Layer {
    /// Called once when the driver takes ownership of the layer.
    fn on_attach(&mut self) {}

    /// Called once per attached layer when the continuous loop exits.
    fn on_detach(&mut self) {}

    /// Per-frame update. `dt` is the delta the previous frame produced, in
    /// seconds; the first frame sees the timer's baseline delta.
    fn on_update(&mut self, dt: f64) {
        let _ = dt;
    }

    /// Per-frame UI build against the overlay context.
    fn on_render(&mut self, ui: &egui::Context) {
        let _ = ui;
    }
}
