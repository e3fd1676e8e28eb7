//! Drives `DebugGui` with a backend that records every provider call.

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use glance_gui::{
    egui, Backend, BackendError, DebugGui, DrawData, FrameInfo, GraphicsSettings, GuiError,
    GuiSettings, GuiState, Resource, Viewport, WindowSettings,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Acquire(Resource),
    Release(Resource),
    Poll,
    TakeInput,
    FramebufferSize,
    SetViewport(Viewport),
    Clear([f32; 4]),
    Submit { primitives: usize },
    Present,
}

impl Call {
    fn name(&self) -> &'static str {
        match self {
            Call::Acquire(_) => "acquire",
            Call::Release(_) => "release",
            Call::Poll => "poll",
            Call::TakeInput => "take_input",
            Call::FramebufferSize => "framebuffer_size",
            Call::SetViewport(_) => "set_viewport",
            Call::Clear(_) => "clear",
            Call::Submit { .. } => "submit",
            Call::Present => "present",
        }
    }
}

type Log = Rc<RefCell<Vec<Call>>>;

const DEFAULT_SIZE: Viewport = Viewport {
    width: 800,
    height: 600,
};

struct RecordingBackend {
    log: Log,
    fail_at: Option<Resource>,
    close_after: Option<usize>,
    polls: usize,
    submits: usize,
    sizes: Vec<Viewport>,
    submit_failures: Vec<(usize, bool)>,
}

impl RecordingBackend {
    fn new(log: &Log) -> Self {
        Self {
            log: Rc::clone(log),
            fail_at: None,
            close_after: None,
            polls: 0,
            submits: 0,
            sizes: Vec::new(),
            submit_failures: Vec::new(),
        }
    }

    fn fail_at(mut self, resource: Resource) -> Self {
        self.fail_at = Some(resource);
        self
    }

    /// Report a window close on the poll following `frames` frames.
    fn close_after(mut self, frames: usize) -> Self {
        self.close_after = Some(frames);
        self
    }

    /// Framebuffer size per frame; the last entry repeats.
    fn sizes(mut self, sizes: Vec<Viewport>) -> Self {
        self.sizes = sizes;
        self
    }

    fn fail_submit(mut self, frame: usize, recoverable: bool) -> Self {
        self.submit_failures.push((frame, recoverable));
        self
    }

    fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }

    fn acquire(&mut self, resource: Resource) -> Result<(), BackendError> {
        if self.fail_at == Some(resource) {
            return Err(BackendError::Other(format!("{resource} unavailable")));
        }
        self.record(Call::Acquire(resource));
        Ok(())
    }
}

impl Backend for RecordingBackend {
    fn init_platform(&mut self) -> Result<(), BackendError> {
        self.acquire(Resource::Platform)
    }

    fn create_window(&mut self, _settings: &WindowSettings) -> Result<(), BackendError> {
        self.acquire(Resource::Window)
    }

    fn create_graphics(&mut self, _settings: &GraphicsSettings) -> Result<(), BackendError> {
        self.acquire(Resource::Graphics)
    }

    fn attach_ui(&mut self, _ctx: &egui::Context) -> Result<(), BackendError> {
        self.acquire(Resource::UiContext)
    }

    fn release(&mut self, resource: Resource) {
        self.record(Call::Release(resource));
    }

    fn poll_events(&mut self) {
        self.polls += 1;
        self.record(Call::Poll);
    }

    fn close_requested(&self) -> bool {
        self.close_after.is_some_and(|frames| self.polls > frames)
    }

    fn take_input(&mut self) -> egui::RawInput {
        self.record(Call::TakeInput);
        egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(DEFAULT_SIZE.width as f32, DEFAULT_SIZE.height as f32),
            )),
            ..Default::default()
        }
    }

    fn framebuffer_size(&self) -> Viewport {
        self.record(Call::FramebufferSize);
        self.sizes
            .get(self.submits)
            .or(self.sizes.last())
            .copied()
            .unwrap_or(DEFAULT_SIZE)
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.record(Call::SetViewport(viewport));
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.record(Call::Clear(color));
    }

    fn submit(&mut self, draw_data: DrawData) -> Result<(), BackendError> {
        let frame = self.submits;
        self.submits += 1;
        self.record(Call::Submit {
            primitives: draw_data.primitives.len(),
        });

        match self.submit_failures.iter().find(|(at, _)| *at == frame) {
            Some((_, true)) => Err(BackendError::SurfaceLost),
            Some((_, false)) => Err(BackendError::Other("device lost".into())),
            None => Ok(()),
        }
    }

    fn present(&mut self) -> Result<(), BackendError> {
        self.record(Call::Present);
        Ok(())
    }
}

fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn names(log: &Log) -> Vec<&'static str> {
    log.borrow().iter().map(Call::name).collect()
}

fn lifecycle_calls(log: &Log) -> Vec<Call> {
    log.borrow()
        .iter()
        .filter(|call| matches!(call, Call::Acquire(_) | Call::Release(_)))
        .cloned()
        .collect()
}

fn full_mirror() -> Vec<Call> {
    let mut calls: Vec<Call> = Resource::ACQUISITION_ORDER
        .iter()
        .map(|&resource| Call::Acquire(resource))
        .collect();
    calls.extend(
        Resource::ACQUISITION_ORDER
            .iter()
            .rev()
            .map(|&resource| Call::Release(resource)),
    );
    calls
}

fn count(log: &Log, name: &str) -> usize {
    names(log).into_iter().filter(|n| *n == name).count()
}

#[test]
fn close_requested_before_run_returns_without_frames() {
    let log = new_log();
    let mut gui = DebugGui::new(RecordingBackend::new(&log), GuiSettings::default());
    let handle = gui.close_handle();
    handle.request_close();

    gui.run().expect("clean close");

    assert_eq!(lifecycle_calls(&log), full_mirror());
    assert_eq!(count(&log, "poll"), 1);
    assert_eq!(count(&log, "submit"), 0);
    assert_eq!(gui.state(), GuiState::Uninitialized);
    assert!(!handle.is_requested());
}

#[test]
fn frame_steps_run_in_fixed_order() {
    let log = new_log();
    let mut gui = DebugGui::new(
        RecordingBackend::new(&log).close_after(2),
        GuiSettings::default(),
    );

    gui.run().expect("clean close");

    let frame = [
        "poll",
        "take_input",
        "framebuffer_size",
        "set_viewport",
        "clear",
        "submit",
        "present",
    ];
    let mut expected = vec!["acquire"; 4];
    expected.extend(frame);
    expected.extend(frame);
    expected.push("poll");
    expected.extend(vec!["release"; 4]);

    assert_eq!(names(&log), expected);
    assert_eq!(lifecycle_calls(&log), full_mirror());
}

#[test]
fn init_failure_releases_partial_acquisitions_in_reverse() {
    for (index, &stage) in Resource::ACQUISITION_ORDER.iter().enumerate() {
        let log = new_log();
        let mut gui = DebugGui::new(
            RecordingBackend::new(&log).fail_at(stage),
            GuiSettings::default(),
        );

        let err = gui.run().unwrap_err();
        assert!(
            matches!(err, GuiError::Init { stage: failed, .. } if failed == stage),
            "unexpected error for {stage}: {err:?}"
        );

        let acquired = &Resource::ACQUISITION_ORDER[..index];
        let mut expected: Vec<Call> = acquired.iter().map(|&r| Call::Acquire(r)).collect();
        expected.extend(acquired.iter().rev().map(|&r| Call::Release(r)));

        assert_eq!(*log.borrow(), expected, "failure at {stage}");
        assert_eq!(gui.state(), GuiState::Failed);
    }
}

#[test]
fn viewport_follows_framebuffer_resizes() {
    let log = new_log();
    let sizes = vec![
        Viewport::new(800, 600),
        Viewport::new(1024, 768),
        Viewport::new(1024, 768),
        Viewport::new(640, 480),
    ];
    let mut gui = DebugGui::new(
        RecordingBackend::new(&log).close_after(4).sizes(sizes.clone()),
        GuiSettings::default(),
    );

    gui.run().expect("clean close");

    let viewports: Vec<Viewport> = log
        .borrow()
        .iter()
        .filter_map(|call| match call {
            Call::SetViewport(viewport) => Some(*viewport),
            _ => None,
        })
        .collect();
    assert_eq!(viewports, sizes);
}

#[test]
fn clear_uses_premultiplied_configured_color() {
    let log = new_log();
    let mut settings = GuiSettings::default();
    settings.graphics.clear_color = [0.8, 0.4, 0.2, 0.5];
    let mut gui = DebugGui::new(RecordingBackend::new(&log).close_after(1), settings);

    gui.run().expect("clean close");

    assert!(log
        .borrow()
        .contains(&Call::Clear([0.4, 0.2, 0.1, 0.5])));
}

#[test]
fn custom_panel_runs_once_per_frame() {
    let log = new_log();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);

    let mut gui = DebugGui::new(
        RecordingBackend::new(&log).close_after(3),
        GuiSettings::default(),
    )
    .with_panel(move |ctx: &egui::Context, frame: &FrameInfo| {
        egui::Window::new("Host").show(ctx, |ui| ui.label("host widgets"));
        sink.borrow_mut().push(frame.index);
    });

    gui.run().expect("clean close");

    assert_eq!(*seen.borrow(), vec![0, 1, 2]);
}

#[test]
fn default_panel_produces_draw_data() {
    let log = new_log();
    let mut gui = DebugGui::new(
        RecordingBackend::new(&log).close_after(2),
        GuiSettings::default(),
    );

    gui.run().expect("clean close");

    let primitives: Vec<usize> = log
        .borrow()
        .iter()
        .filter_map(|call| match call {
            Call::Submit { primitives } => Some(*primitives),
            _ => None,
        })
        .collect();
    assert_eq!(primitives.len(), 2);
    assert!(primitives.iter().any(|&n| n > 0));
}

#[test]
fn recoverable_submit_error_skips_only_that_frame() {
    let log = new_log();
    let mut gui = DebugGui::new(
        RecordingBackend::new(&log).close_after(3).fail_submit(1, true),
        GuiSettings::default(),
    );

    gui.run().expect("recoverable errors do not abort");

    assert_eq!(count(&log, "submit"), 3);
    assert_eq!(count(&log, "present"), 2);
    assert_eq!(lifecycle_calls(&log), full_mirror());
}

#[test]
fn fatal_submit_error_aborts_after_teardown() {
    let log = new_log();
    let mut gui = DebugGui::new(
        RecordingBackend::new(&log).fail_submit(1, false),
        GuiSettings::default(),
    );

    let err = gui.run().unwrap_err();

    assert!(matches!(err, GuiError::Frame { frame: 1, .. }), "{err:?}");
    assert_eq!(lifecycle_calls(&log), full_mirror());
    assert_eq!(names(&log).last(), Some(&"release"));
    assert_eq!(gui.state(), GuiState::Uninitialized);
}

#[test]
fn panic_in_panel_still_releases_everything() {
    let log = new_log();
    let mut gui = DebugGui::new(RecordingBackend::new(&log), GuiSettings::default())
        .with_panel(|_: &egui::Context, frame: &FrameInfo| {
            if frame.index == 1 {
                panic!("host panel blew up");
            }
        });

    let result = panic::catch_unwind(AssertUnwindSafe(|| gui.run()));

    assert!(result.is_err());
    assert_eq!(lifecycle_calls(&log), full_mirror());
    assert_eq!(gui.state(), GuiState::Uninitialized);
}

#[test]
fn close_handle_works_across_threads() {
    let log = new_log();
    let mut gui = DebugGui::new(RecordingBackend::new(&log), GuiSettings::default());
    let handle = gui.close_handle();

    let closer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        handle.request_close();
    });

    gui.run().expect("clean close");
    closer.join().unwrap();

    assert!(count(&log, "present") > 0);
    assert_eq!(lifecycle_calls(&log), full_mirror());
}

#[test]
fn run_can_be_repeated_after_clean_close() {
    let log = new_log();
    let mut gui = DebugGui::new(RecordingBackend::new(&log), GuiSettings::default());
    let handle = gui.close_handle();

    handle.request_close();
    gui.run().expect("first run");
    handle.request_close();
    gui.run().expect("second run");

    let mut expected = full_mirror();
    expected.extend(full_mirror());
    assert_eq!(lifecycle_calls(&log), expected);
}
