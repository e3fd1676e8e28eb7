//! winit + wgpu + egui backend
//!
//! The event loop is pumped rather than run, so the debug loop keeps
//! control of frame ordering. Fields are declared in reverse acquisition
//! order so that dropping the backend without an explicit release still
//! tears down UI before graphics before window before event loop.

use std::sync::Arc;
use std::time::Duration;

use winit::{
    event_loop::{ControlFlow, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::Window,
};

use crate::backend::{Backend, DrawData, Resource, Viewport};
use crate::error::BackendError;
use crate::settings::{GraphicsSettings, WindowSettings};
use crate::window::{window_attributes, WindowShell};

/// Upper bound on event loop pumps while waiting for `resumed`.
const WINDOW_CREATE_PUMPS: usize = 32;

pub struct WgpuBackend {
    frame: Option<wgpu::SurfaceTexture>,
    ui: Option<UiBridge>,
    gpu: Option<Gpu>,
    shell: WindowShell,
    event_loop: Option<EventLoop<()>>,
    viewport: Viewport,
    clear_color: wgpu::Color,
}

/// egui's window integration and renderer
struct UiBridge {
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

/// Surface, device, and queue bound to the window
struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
}

impl Gpu {
    async fn new(window: Arc<Window>, settings: &GraphicsSettings) -> Result<Self, BackendError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Arc<Window> gives the surface a 'static lifetime
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(BackendError::NoAdapter)?;

        tracing::info!(adapter = ?adapter.get_info(), "GPU adapter selected");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Glance Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        // egui blends in gamma space and wants a non-sRGB target
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| BackendError::Other("surface reports no supported formats".into()))?;

        let present_mode = if settings.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
        })
    }

    fn resize(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            return;
        }
        if self.config.width != viewport.width || self.config.height != viewport.height {
            self.config.width = viewport.width;
            self.config.height = viewport.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn encode_frame(
        &mut self,
        renderer: &mut egui_wgpu::Renderer,
        clear_color: wgpu::Color,
        primitives: &[egui::ClippedPrimitive],
        pixels_per_point: f32,
    ) -> Result<wgpu::SurfaceTexture, BackendError> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Err(BackendError::SurfaceLost);
            }
            Err(wgpu::SurfaceError::Timeout) => return Err(BackendError::Timeout),
            Err(err) => return Err(BackendError::Other(err.to_string())),
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point,
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Glance Encoder"),
            });

        let mut commands = renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            primitives,
            &screen,
        );

        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Glance UI Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(clear_color),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            pass.set_viewport(
                0.0,
                0.0,
                self.config.width as f32,
                self.config.height as f32,
                0.0,
                1.0,
            );
            renderer.render(&mut pass, primitives, &screen);
        }

        commands.push(encoder.finish());
        self.queue.submit(commands);
        Ok(frame)
    }
}

impl WgpuBackend {
    pub fn new() -> Self {
        Self {
            frame: None,
            ui: None,
            gpu: None,
            shell: WindowShell::default(),
            event_loop: None,
            viewport: Viewport::default(),
            clear_color: wgpu::Color::BLACK,
        }
    }

    fn window(&self) -> Result<&Arc<Window>, BackendError> {
        self.shell.window().ok_or(BackendError::NotAcquired {
            resource: Resource::Window,
        })
    }
}

impl Default for WgpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for WgpuBackend {
    fn init_platform(&mut self) -> Result<(), BackendError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop = Some(event_loop);
        Ok(())
    }

    fn create_window(&mut self, settings: &WindowSettings) -> Result<(), BackendError> {
        let event_loop = self.event_loop.as_mut().ok_or(BackendError::NotAcquired {
            resource: Resource::Platform,
        })?;

        self.shell.request_window(window_attributes(settings));
        for _ in 0..WINDOW_CREATE_PUMPS {
            let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut self.shell);
            if let Some(err) = self.shell.take_create_error() {
                return Err(err.into());
            }
            if self.shell.window().is_some() {
                return Ok(());
            }
            if let PumpStatus::Exit(code) = status {
                self.shell.destroy_window();
                return Err(BackendError::Other(format!(
                    "event loop exited with code {code} before the window was created"
                )));
            }
        }

        self.shell.destroy_window();
        Err(BackendError::NoWindow)
    }

    fn create_graphics(&mut self, settings: &GraphicsSettings) -> Result<(), BackendError> {
        let window = Arc::clone(self.window()?);
        let gpu = pollster::block_on(Gpu::new(window, settings))?;
        self.viewport = Viewport::new(gpu.config.width, gpu.config.height);
        self.gpu = Some(gpu);
        Ok(())
    }

    fn attach_ui(&mut self, ctx: &egui::Context) -> Result<(), BackendError> {
        let window: &Window = self.window()?;
        let gpu = self.gpu.as_ref().ok_or(BackendError::NotAcquired {
            resource: Resource::Graphics,
        })?;

        let max_texture_side = gpu.device.limits().max_texture_dimension_2d as usize;
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            window.theme(),
            Some(max_texture_side),
        );
        let renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.config.format, None, 1, false);

        self.ui = Some(UiBridge { state, renderer });
        Ok(())
    }

    fn release(&mut self, resource: Resource) {
        match resource {
            Resource::UiContext => self.ui = None,
            Resource::Graphics => {
                self.frame = None;
                self.gpu = None;
            }
            Resource::Window => self.shell.destroy_window(),
            // winit allows one event loop per process; a later run fails
            // at this stage with `RecreationAttempt`
            Resource::Platform => self.event_loop = None,
        }
    }

    fn poll_events(&mut self) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return;
        };

        if let PumpStatus::Exit(code) =
            event_loop.pump_app_events(Some(Duration::ZERO), &mut self.shell)
        {
            tracing::info!(code, "event loop exited");
            self.shell.mark_closed();
        }

        let window = self.shell.window().cloned();
        for event in self.shell.drain_events() {
            if let (Some(window), Some(ui)) = (window.as_ref(), self.ui.as_mut()) {
                let _ = ui.state.on_window_event(window, &event);
            }
        }
    }

    fn close_requested(&self) -> bool {
        self.shell.close_requested()
    }

    fn take_input(&mut self) -> egui::RawInput {
        match (self.shell.window(), self.ui.as_mut()) {
            (Some(window), Some(ui)) => ui.state.take_egui_input(window),
            _ => egui::RawInput::default(),
        }
    }

    fn framebuffer_size(&self) -> Viewport {
        self.shell
            .window()
            .map(|window| {
                let size = window.inner_size();
                Viewport::new(size.width, size.height)
            })
            .unwrap_or_default()
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize(viewport);
        }
        self.viewport = viewport;
    }

    fn clear(&mut self, color: [f32; 4]) {
        let [r, g, b, a] = color;
        self.clear_color = wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        };
    }

    fn submit(&mut self, draw_data: DrawData) -> Result<(), BackendError> {
        let DrawData {
            primitives,
            textures_delta,
            pixels_per_point,
            platform_output,
        } = draw_data;

        let window = Arc::clone(self.window()?);
        let gpu = self.gpu.as_mut().ok_or(BackendError::NotAcquired {
            resource: Resource::Graphics,
        })?;
        let ui = self.ui.as_mut().ok_or(BackendError::NotAcquired {
            resource: Resource::UiContext,
        })?;

        ui.state.handle_platform_output(&window, platform_output);

        for (id, delta) in &textures_delta.set {
            ui.renderer.update_texture(&gpu.device, &gpu.queue, *id, delta);
        }

        // Minimized: texture uploads still happen, drawing does not
        let result = if self.viewport.is_empty() {
            Ok(())
        } else {
            match gpu.encode_frame(&mut ui.renderer, self.clear_color, &primitives, pixels_per_point) {
                Ok(frame) => {
                    self.frame = Some(frame);
                    Ok(())
                }
                Err(err) => Err(err),
            }
        };

        for id in &textures_delta.free {
            ui.renderer.free_texture(id);
        }

        result
    }

    fn present(&mut self) -> Result<(), BackendError> {
        if let Some(frame) = self.frame.take() {
            if let Some(window) = self.shell.window() {
                window.pre_present_notify();
            }
            frame.present();
        }
        Ok(())
    }
}
