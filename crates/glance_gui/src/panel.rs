//! Per-frame UI content
//!
//! A [`DebugPanel`] builds the widgets for one frame. The loop calls it once
//! between beginning and finalizing the UI frame; anything that should
//! survive to the next frame lives in the panel itself.

use std::ops::RangeInclusive;

use crate::settings::PanelSettings;

/// Timing information handed to the drawing step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInfo {
    /// Zero-based index of the frame within the current run
    pub index: u64,
    pub fps: f64,
    pub frame_time_ms: f64,
}

pub trait DebugPanel {
    fn draw(&mut self, ctx: &egui::Context, frame: &FrameInfo);
}

impl<F> DebugPanel for F
where
    F: FnMut(&egui::Context, &FrameInfo),
{
    fn draw(&mut self, ctx: &egui::Context, frame: &FrameInfo) {
        self(ctx, frame)
    }
}

/// Default content: a pinned window with a label, a bounded slider, and a
/// trigger button.
pub struct ExamplePanel {
    title: String,
    position: [f32; 2],
    size: [f32; 2],
    value: f32,
    show_inspector: bool,
    on_trigger: Box<dyn FnMut(f32)>,
}

impl ExamplePanel {
    pub const VALUE_RANGE: RangeInclusive<f32> = 0.0..=1.0;

    pub fn new(settings: &PanelSettings) -> Self {
        Self {
            title: settings.title.clone(),
            position: settings.position,
            size: settings.size,
            value: 0.0,
            show_inspector: false,
            on_trigger: Box::new(|_| {}),
        }
    }

    /// Called with the current slider value when the trigger is clicked.
    pub fn on_trigger(mut self, hook: impl FnMut(f32) + 'static) -> Self {
        self.on_trigger = Box::new(hook);
        self
    }

    pub fn id() -> egui::Id {
        egui::Id::new("glance_example_panel")
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn set_value(&mut self, value: f32) {
        self.value = value.clamp(*Self::VALUE_RANGE.start(), *Self::VALUE_RANGE.end());
    }

    pub fn trigger(&mut self) {
        (self.on_trigger)(self.value);
    }
}

impl Default for ExamplePanel {
    fn default() -> Self {
        Self::new(&PanelSettings::default())
    }
}

impl DebugPanel for ExamplePanel {
    fn draw(&mut self, ctx: &egui::Context, frame: &FrameInfo) {
        let mut triggered = false;

        egui::Window::new(self.title.as_str())
            .id(Self::id())
            .fixed_pos(self.position)
            .fixed_size(self.size)
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Runtime state inspector");
                ui.add(egui::Slider::new(&mut self.value, Self::VALUE_RANGE).text("value"));
                triggered = ui.button("Trigger").clicked();
                ui.checkbox(&mut self.show_inspector, "Show inspector");
                ui.separator();
                ui.label(format!(
                    "frame {}  {:.1} fps  {:.2} ms",
                    frame.index, frame.fps, frame.frame_time_ms
                ));
            });

        if triggered {
            self.trigger();
        }

        if self.show_inspector {
            egui::Window::new("Inspector")
                .open(&mut self.show_inspector)
                .show(ctx, |ui| ctx.inspection_ui(ui));
        }
    }
}
