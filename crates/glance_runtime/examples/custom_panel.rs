//! Host-supplied debug panel
//!
//! Replaces the example panel with a closure that profiles a stand-in
//! workload every frame and offers a button that closes the window through
//! the close handle.
//!
//! Run with: cargo run --example custom_panel

use anyhow::Result;
use glance_gui::{egui, DebugGui, FrameInfo, GuiSettings, WgpuBackend};
use glance_metrics::TaskTimer;

/// Stand-in for host work worth profiling.
fn relax(grid: &mut [f32], passes: usize) {
    for _ in 0..passes {
        for i in 1..grid.len() - 1 {
            grid[i] = 0.5 * (grid[i - 1] + grid[i + 1]);
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut settings = GuiSettings::default();
    settings.window.title = "Glance: custom panel".to_string();
    settings.graphics.vsync = true;

    let mut gui = DebugGui::new(WgpuBackend::new(), settings);
    let close = gui.close_handle();

    let mut grid = vec![0.0f32; 4096];
    grid[0] = 1.0;
    let mut passes = 8usize;
    let mut timer = TaskTimer::new();

    gui.set_panel(move |ctx: &egui::Context, frame: &FrameInfo| {
        timer.measure(|| relax(&mut grid, passes));

        egui::Window::new("Solver").show(ctx, |ui| {
            ui.add(egui::Slider::new(&mut passes, 1..=256).text("passes"));
            ui.label(format!("relax: {:.3} ms", timer.elapsed() * 1000.0));
            ui.label(format!("midpoint: {:.6}", grid[grid.len() / 2]));
            ui.label(format!("frame {} at {:.1} fps", frame.index, frame.fps));
            if ui.button("Close").clicked() {
                close.request_close();
            }
        });
    });

    gui.run()?;
    Ok(())
}
