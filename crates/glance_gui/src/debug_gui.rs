//! Debug window lifecycle and frame loop
//!
//! `DebugGui::run` blocks the calling thread: it acquires the platform,
//! window, graphics context, and UI context, renders frames until a close
//! is observed, then releases everything in reverse order. Release is
//! driven by a guard, so it also happens when initialization fails part
//! way, when a frame fails, and when the drawing step panics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glance_metrics::{FrameTimer, TaskTimer};

use crate::backend::{Backend, DrawData, Resource};
use crate::error::{BackendError, GuiError};
use crate::panel::{DebugPanel, ExamplePanel, FrameInfo};
use crate::settings::GuiSettings;

/// Frames averaged for the fps readout.
const FRAME_STATS_WINDOW: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuiState {
    Uninitialized,
    Initializing,
    Running,
    Terminating,
    /// Initialization failed during the last `run`
    Failed,
}

/// Programmatic close request, observed once per frame.
///
/// Clones share the same flag and may be handed to other threads.
#[derive(Debug, Clone, Default)]
pub struct CloseHandle(Arc<AtomicBool>);

impl CloseHandle {
    pub fn request_close(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns a backend and the panel drawn into it.
///
/// Not `Clone`: the window, graphics context, and UI context belong to
/// exactly one instance.
pub struct DebugGui<B: Backend> {
    backend: B,
    settings: GuiSettings,
    panel: Box<dyn DebugPanel>,
    state: GuiState,
    close: CloseHandle,
    frame_timer: FrameTimer,
}

impl<B: Backend> DebugGui<B> {
    /// Cheap: no OS or GPU resources are touched until [`run`](Self::run).
    pub fn new(backend: B, settings: GuiSettings) -> Self {
        let panel = ExamplePanel::new(&settings.panel);
        Self {
            backend,
            settings,
            panel: Box::new(panel),
            state: GuiState::Uninitialized,
            close: CloseHandle::default(),
            frame_timer: FrameTimer::new(FRAME_STATS_WINDOW),
        }
    }

    pub fn with_panel(mut self, panel: impl DebugPanel + 'static) -> Self {
        self.set_panel(panel);
        self
    }

    pub fn set_panel(&mut self, panel: impl DebugPanel + 'static) {
        self.panel = Box::new(panel);
    }

    pub fn state(&self) -> GuiState {
        self.state
    }

    pub fn settings(&self) -> &GuiSettings {
        &self.settings
    }

    pub fn close_handle(&self) -> CloseHandle {
        self.close.clone()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Run until the window closes or a close is requested.
    ///
    /// A close requested before the call is honored right after
    /// initialization, before any frame is drawn.
    pub fn run(&mut self) -> Result<(), GuiError> {
        self.state = GuiState::Initializing;
        tracing::info!(title = %self.settings.window.title, "starting debug GUI");

        let mut init_timer = TaskTimer::new();
        init_timer.start();

        let mut session = Session::new(&mut self.backend, &mut self.state);
        if let Err(err) = session.initialize(&self.settings) {
            tracing::error!(error = %err, "debug GUI initialization failed");
            drop(session);
            self.state = GuiState::Failed;
            return Err(err);
        }

        init_timer.stop();
        tracing::info!(seconds = init_timer.elapsed(), "debug GUI initialized");

        *session.state = GuiState::Running;
        self.frame_timer.reset();

        let clear_color = self.settings.graphics.premultiplied_clear_color();
        let mut index: u64 = 0;

        loop {
            session.backend.poll_events();
            if session.backend.close_requested() || self.close.is_requested() {
                tracing::info!(frames = index, "close requested");
                break;
            }

            self.frame_timer.tick();
            let info = FrameInfo {
                index,
                fps: self.frame_timer.fps(),
                frame_time_ms: self.frame_timer.frame_time_ms(),
            };

            match session.frame(self.panel.as_mut(), &info, clear_color) {
                Ok(()) => {}
                Err(err) if err.is_recoverable() => {
                    tracing::warn!(frame = index, error = %err, "frame skipped");
                }
                Err(source) => {
                    tracing::error!(frame = index, error = %source, "frame failed");
                    return Err(GuiError::Frame { frame: index, source });
                }
            }

            index += 1;
        }

        self.close.reset();
        Ok(())
    }
}

/// Resources held for the duration of one `run`.
///
/// Dropping the session releases whatever was acquired, newest first.
struct Session<'a, B: Backend> {
    backend: &'a mut B,
    state: &'a mut GuiState,
    acquired: Vec<Resource>,
    ui: Option<egui::Context>,
}

impl<'a, B: Backend> Session<'a, B> {
    fn new(backend: &'a mut B, state: &'a mut GuiState) -> Self {
        Self {
            backend,
            state,
            acquired: Vec::with_capacity(Resource::ACQUISITION_ORDER.len()),
            ui: None,
        }
    }

    fn initialize(&mut self, settings: &GuiSettings) -> Result<(), GuiError> {
        self.acquire(Resource::Platform, |backend| backend.init_platform())?;
        self.acquire(Resource::Window, |backend| {
            backend.create_window(&settings.window)
        })?;
        self.acquire(Resource::Graphics, |backend| {
            backend.create_graphics(&settings.graphics)
        })?;

        let ctx = egui::Context::default();
        self.acquire(Resource::UiContext, |backend| backend.attach_ui(&ctx))?;
        self.ui = Some(ctx);
        Ok(())
    }

    fn acquire<F>(&mut self, resource: Resource, f: F) -> Result<(), GuiError>
    where
        F: FnOnce(&mut B) -> Result<(), BackendError>,
    {
        f(&mut *self.backend).map_err(|source| GuiError::Init {
            stage: resource,
            source,
        })?;
        tracing::debug!(%resource, "acquired");
        self.acquired.push(resource);
        Ok(())
    }

    /// Build the UI for one frame, then size, clear, submit, and present it.
    fn frame(
        &mut self,
        panel: &mut dyn DebugPanel,
        info: &FrameInfo,
        clear_color: [f32; 4],
    ) -> Result<(), BackendError> {
        let Some(ui) = self.ui.as_ref() else {
            return Err(BackendError::NotAcquired {
                resource: Resource::UiContext,
            });
        };

        ui.begin_pass(self.backend.take_input());
        panel.draw(ui, info);
        let output = ui.end_pass();

        let draw_data = DrawData {
            primitives: ui.tessellate(output.shapes, output.pixels_per_point),
            textures_delta: output.textures_delta,
            pixels_per_point: output.pixels_per_point,
            platform_output: output.platform_output,
        };

        let viewport = self.backend.framebuffer_size();
        self.backend.set_viewport(viewport);
        self.backend.clear(clear_color);
        self.backend.submit(draw_data)?;
        self.backend.present()
    }
}

impl<B: Backend> Drop for Session<'_, B> {
    fn drop(&mut self) {
        *self.state = GuiState::Terminating;
        while let Some(resource) = self.acquired.pop() {
            self.backend.release(resource);
            if resource == Resource::UiContext {
                self.ui = None;
            }
            tracing::debug!(%resource, "released");
        }
        *self.state = GuiState::Uninitialized;
    }
}
