//! Window management
//!
//! The debug loop drives winit by pumping the event loop once per frame
//! instead of handing control to `run_app`. [`WindowShell`] is the
//! application handler that collects what each pump produced.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    error::OsError,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowAttributes, WindowId},
};

use crate::settings::WindowSettings;

/// Create window attributes from settings
pub fn window_attributes(settings: &WindowSettings) -> WindowAttributes {
    Window::default_attributes()
        .with_title(settings.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(settings.width, settings.height))
}

/// Application handler fed by `pump_app_events`.
///
/// Windows can only be created from inside the event loop (winit 0.30+), so
/// creation is requested with [`WindowShell::request_window`] and performed
/// on the next `resumed` callback.
#[derive(Default)]
pub struct WindowShell {
    pending: Option<WindowAttributes>,
    window: Option<Arc<Window>>,
    create_error: Option<OsError>,
    events: Vec<WindowEvent>,
    close_requested: bool,
}

impl WindowShell {
    pub fn request_window(&mut self, attributes: WindowAttributes) {
        self.pending = Some(attributes);
        self.create_error = None;
    }

    pub fn window(&self) -> Option<&Arc<Window>> {
        self.window.as_ref()
    }

    /// Error from the last creation attempt, if it failed.
    pub fn take_create_error(&mut self) -> Option<OsError> {
        self.create_error.take()
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, WindowEvent> {
        self.events.drain(..)
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    pub fn mark_closed(&mut self) {
        self.close_requested = true;
    }

    /// Drop the window and forget anything queued for it.
    pub fn destroy_window(&mut self) {
        self.pending = None;
        self.window = None;
        self.events.clear();
        self.close_requested = false;
    }

    fn try_create(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Some(attributes) = self.pending.take() {
            match event_loop.create_window(attributes) {
                Ok(window) => {
                    tracing::debug!(id = ?window.id(), "window created");
                    self.window = Some(Arc::new(window));
                }
                Err(err) => self.create_error = Some(err),
            }
        }
    }
}

impl ApplicationHandler for WindowShell {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.try_create(event_loop);
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.window.as_ref().map(|w| w.id()) != Some(window_id) {
            return;
        }
        if matches!(event, WindowEvent::CloseRequested | WindowEvent::Destroyed) {
            self.close_requested = true;
        }
        self.events.push(event);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Some platforms only deliver `resumed` once; a window requested
        // after that is created on the next pump.
        self.try_create(event_loop);
    }
}
