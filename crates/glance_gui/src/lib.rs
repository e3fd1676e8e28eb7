//! Glance GUI
//!
//! Debug window host: owns a window, a graphics context, and an immediate-mode
//! UI context, and runs a blocking frame loop that hands each frame to a
//! pluggable [`DebugPanel`].
//!
//! Providers sit behind [`Backend`]; [`WgpuBackend`] is the winit + wgpu +
//! egui implementation used by the `glance` binary.

pub mod backend;
pub mod debug_gui;
pub mod error;
pub mod panel;
pub mod settings;
pub mod wgpu_backend;
pub mod window;

pub use egui;
pub use wgpu;
pub use winit;

pub use backend::{Backend, DrawData, Resource, Viewport};
pub use debug_gui::{CloseHandle, DebugGui, GuiState};
pub use error::{BackendError, GuiError, SettingsError};
pub use panel::{DebugPanel, ExamplePanel, FrameInfo};
pub use settings::{GraphicsSettings, GuiSettings, PanelSettings, WindowSettings};
pub use wgpu_backend::WgpuBackend;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
