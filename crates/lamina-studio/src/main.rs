use anyhow::{Context, Result};

use lamina_engine::core::Layer;
use lamina_engine::input::{Action, Key};
use lamina_engine::logging::{LoggingConfig, init_logging};
use lamina_engine::runtime::Runtime;
use lamina_engine::window::{Surface, SurfaceConfig};

/// Demo layer: loop stats and a click counter, laid out as a docked side
/// panel or a floating window per the surface's docking hint.
#[derive(Default)]
struct ControlPanel {
    docked: bool,
    clicks: u32,
    dt: f64,
    frames: u64,
}

impl ControlPanel {
    fn panel_ui(&mut self, ui: &mut egui::Ui) {
        ui.label(format!("frame time  {:6.2} ms", self.dt.abs() * 1000.0));
        ui.label(format!("frames      {}", self.frames));
        ui.separator();

        if ui
            .button(format!("clicked {} time(s)", self.clicks))
            .clicked()
        {
            self.clicks += 1;
            log::info!("click #{}", self.clicks);
        }

        if ui.button("quit").clicked() {
            // Routed back as a root-viewport close command.
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

impl Layer for ControlPanel {
    fn on_attach(&mut self) {
        log::info!("control panel attached");
    }

    fn on_detach(&mut self) {
        log::info!("control panel detached after {} frame(s)", self.frames);
    }

    fn on_update(&mut self, dt: f64) {
        self.dt = dt;
        self.frames += 1;
    }

    fn on_render(&mut self, ctx: &egui::Context) {
        if self.docked {
            egui::SidePanel::left("control panel")
                .default_width(220.0)
                .show(ctx, |ui| self.panel_ui(ui));
        } else {
            egui::Window::new("control panel")
                .default_pos([24.0, 24.0])
                .show(ctx, |ui| self.panel_ui(ui));
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    println!();
    println!("  lamina studio: drag, click, scroll; watch the log.");
    println!();

    let mut surface = Surface::create(SurfaceConfig {
        title: "lamina studio".to_string(),
        multi_window: true,
        docking: true,
        ..SurfaceConfig::default()
    })
    .context("surface creation failed")?;

    log::info!(
        "multi-window {}, docking {}",
        if surface.multi_window_enabled() { "on" } else { "off" },
        if surface.docking_enabled() { "on" } else { "off" },
    );

    surface.on_resize(|w, h| log::info!("resized to {w}x{h}"));
    surface.on_key(|key, action, mods| {
        if action == Action::Press {
            log::info!("key {key} pressed ({mods:?})");
        }
    });
    surface.on_scroll(|x, y| log::debug!("scroll {x:+.1} {y:+.1}"));

    let mut runtime = Runtime::new(surface);
    runtime.set_clear_color(wgpu::Color {
        r: 0.08,
        g: 0.09,
        b: 0.11,
        a: 1.0,
    });

    let docked = runtime.surface().docking_enabled();

    if std::env::args().any(|arg| arg == "--single-step") {
        run_single_step(&mut runtime, docked)
    } else {
        runtime.attach(Box::new(ControlPanel { docked, ..ControlPanel::default() }));
        anyhow::ensure!(runtime.run(), "render loop ended with an error");
        Ok(())
    }
}

/// Drives the panel one frame at a time, keeping the loop out here.
///
/// The panel is never attached, so it gets no lifecycle hooks; pumping and
/// presentation are explicit. Escape closes the window.
fn run_single_step(runtime: &mut Runtime, docked: bool) -> Result<()> {
    let mut panel = ControlPanel { docked, ..ControlPanel::default() };

    while !runtime.surface().should_close() {
        if !runtime.run_once(&mut panel) {
            anyhow::bail!("single-step frame failed");
        }
        runtime.surface_mut().poll_events();
        runtime.surface_mut().present();

        if runtime.surface().key_action(Key::Escape) == Action::Press {
            runtime.surface_mut().close();
        }
    }

    Ok(())
}
