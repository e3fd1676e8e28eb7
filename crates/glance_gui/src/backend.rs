//! Provider abstraction
//!
//! The debug loop never talks to winit, wgpu, or the egui integrations
//! directly. Everything it needs from the windowing, graphics, and UI
//! providers goes through [`Backend`], so hosts and tests can substitute
//! their own implementation.

use std::fmt;

use crate::error::BackendError;
use crate::settings::{GraphicsSettings, WindowSettings};

/// Resources a backend acquires, listed in acquisition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// The windowing system itself (event loop, display connection)
    Platform,
    /// The OS window
    Window,
    /// Surface, device, and queue bound to the window
    Graphics,
    /// UI context plus its window and renderer integrations
    UiContext,
}

impl Resource {
    pub const ACQUISITION_ORDER: [Resource; 4] = [
        Resource::Platform,
        Resource::Window,
        Resource::Graphics,
        Resource::UiContext,
    ];
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Platform => "windowing platform",
            Resource::Window => "window",
            Resource::Graphics => "graphics context",
            Resource::UiContext => "UI context",
        };
        f.write_str(name)
    }
}

/// Framebuffer extent in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when nothing can be drawn (e.g. minimized window).
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A finalized UI frame, ready for submission.
pub struct DrawData {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
    pub platform_output: egui::PlatformOutput,
}

/// Window, graphics, and UI-integration capabilities used by `DebugGui`.
///
/// Acquisition methods are called at most once per run, in
/// [`Resource::ACQUISITION_ORDER`], and only after the previous one
/// succeeded. `release` is called exactly once for each successful
/// acquisition, in reverse order. Per-frame methods are only called while
/// every resource is held.
pub trait Backend {
    fn init_platform(&mut self) -> Result<(), BackendError>;

    fn create_window(&mut self, settings: &WindowSettings) -> Result<(), BackendError>;

    /// Bind a graphics context to the window, honoring the swap interval.
    fn create_graphics(&mut self, settings: &GraphicsSettings) -> Result<(), BackendError>;

    /// Hook `ctx` up to window input and to the renderer.
    fn attach_ui(&mut self, ctx: &egui::Context) -> Result<(), BackendError>;

    /// Release a previously acquired resource. Best effort, never fails.
    fn release(&mut self, resource: Resource);

    /// Dispatch pending OS events without blocking.
    fn poll_events(&mut self);

    /// Whether the window or the OS asked to close.
    fn close_requested(&self) -> bool;

    /// Input gathered since the previous frame.
    fn take_input(&mut self) -> egui::RawInput;

    fn framebuffer_size(&self) -> Viewport;

    fn set_viewport(&mut self, viewport: Viewport);

    /// Color (premultiplied RGBA) the next submitted frame is cleared to.
    fn clear(&mut self, color: [f32; 4]);

    fn submit(&mut self, draw_data: DrawData) -> Result<(), BackendError>;

    /// Swap buffers, showing the submitted frame.
    fn present(&mut self) -> Result<(), BackendError>;
}
