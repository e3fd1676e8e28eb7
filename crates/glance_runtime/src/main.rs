//! Glance Runtime
//!
//! Opens the debug window with the example panel and blocks until it is
//! closed. Exits non-zero when the window or graphics context cannot be
//! created.

use anyhow::{Context, Result};
use glance_gui::{DebugGui, ExamplePanel, GuiSettings, WgpuBackend};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Glance v{}", glance_gui::VERSION);

    let settings = GuiSettings::from_env().context("failed to load settings")?;
    let panel = ExamplePanel::new(&settings.panel).on_trigger(|value| {
        tracing::info!(value, "trigger activated");
    });

    let mut gui = DebugGui::new(WgpuBackend::new(), settings).with_panel(panel);
    gui.run().context("debug GUI terminated abnormally")?;

    tracing::info!("Debug window closed");
    Ok(())
}
