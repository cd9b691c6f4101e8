//! Interactive event viewer.
//!
//! Opens a window showing one event's traces. Controls:
//!
//! | Input | Action |
//! |-------|--------|
//! | Left drag | Orbit |
//! | Wheel | Zoom |
//! | ← / → | Previous / next event |
//! | O | Toggle orthographic / perspective |
//! | S | Save a PNG snapshot |
//! | Esc | Quit |

pub mod camera;
pub mod renderer;
pub mod scene;
pub mod shaders;
pub mod snapshot;

#[cfg(feature = "egui")]
pub mod egui_integration;

use std::path::PathBuf;
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::config::MarkerSymbol;
use crate::display::DetPlot;
use crate::error::{GpuError, ViewerError};
use crate::layout::SceneLayout;
use crate::store::EventSource;

pub use camera::OrbitCamera;
pub use renderer::SceneRenderer;
pub use scene::{LegendEntry, LineInstance, MarkerInstance, SceneGeometry};

/// Window clear colour when the layout has a transparent background.
const WINDOW_BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.05,
    a: 1.0,
};

/// Viewer settings not covered by the layout.
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    /// Directory snapshots are written to.
    pub snapshot_dir: PathBuf,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            snapshot_dir: PathBuf::from("."),
        }
    }
}

/// Open the viewer on `event` and block until the window is closed.
///
/// `event` must already be loaded. Other events are loaded on demand.
pub fn run<S: EventSource>(
    plot: DetPlot<S>,
    layout: SceneLayout,
    event: usize,
    options: ViewerOptions,
) -> Result<(), ViewerError> {
    let events = plot.event_numbers()?;
    let event_loop = EventLoop::new()?;
    let mut app = App::new(plot, layout, event, events, options);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// The stored event after (`forward`) or before `current`, `None` past
/// either end. `events` must be ascending; `current` need not be in it.
fn step_event(events: &[usize], current: usize, forward: bool) -> Option<usize> {
    let (before, after) = match events.binary_search(&current) {
        Ok(i) => (i, i + 1),
        Err(i) => (i, i),
    };
    if forward {
        events.get(after).copied()
    } else {
        before.checked_sub(1).map(|i| events[i])
    }
}

struct WindowGpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    renderer: SceneRenderer,
    #[cfg(feature = "egui")]
    egui: egui_integration::EguiIntegration,
}

impl WindowGpu {
    async fn new(window: Arc<Window>, symbols: &[MarkerSymbol]) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;
        let (adapter, device, queue) = renderer::request_device(&instance, Some(&surface)).await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or(GpuError::NoAdapter)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_view = renderer::create_depth_view(&device, config.width, config.height);
        let renderer = SceneRenderer::new(&device, surface_format, symbols);

        #[cfg(feature = "egui")]
        let egui = egui_integration::EguiIntegration::new(&device, surface_format, &window);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            renderer,
            #[cfg(feature = "egui")]
            egui,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = renderer::create_depth_view(&self.device, width, height);
        }
    }
}

struct App<S: EventSource> {
    plot: DetPlot<S>,
    layout: SceneLayout,
    options: ViewerOptions,
    event: usize,
    /// Event numbers in the store, ascending.
    events: Vec<usize>,
    geometry: SceneGeometry,
    symbols: Vec<MarkerSymbol>,
    camera: OrbitCamera,
    window: Option<Arc<Window>>,
    gpu: Option<WindowGpu>,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    error: Option<ViewerError>,
}

impl<S: EventSource> App<S> {
    fn new(
        plot: DetPlot<S>,
        layout: SceneLayout,
        event: usize,
        events: Vec<usize>,
        options: ViewerOptions,
    ) -> Self {
        let geometry = SceneGeometry::build(&plot.hitmarkers_for_event(event), &layout);
        let symbols: Vec<MarkerSymbol> = plot.subdetectors().iter().map(|s| s.shape).collect();
        let camera = OrbitCamera::from_layout(&layout.camera);
        Self {
            plot,
            layout,
            options,
            event,
            events,
            geometry,
            symbols,
            camera,
            window: None,
            gpu: None,
            mouse_pressed: false,
            last_mouse_pos: None,
            error: None,
        }
    }

    /// One-based position of the current event among the stored events.
    fn position(&self) -> usize {
        match self.events.binary_search(&self.event) {
            Ok(i) => i + 1,
            Err(i) => i,
        }
    }

    fn title(&self) -> String {
        format!(
            "caloview - event {} ({} of {})",
            self.event,
            self.position(),
            self.events.len()
        )
    }

    /// Switch to `event`, loading it first if needed.
    fn show_event(&mut self, event: usize) {
        if event == self.event || self.events.binary_search(&event).is_err() {
            return;
        }
        if !self.plot.is_loaded(event) {
            if let Err(e) = self.plot.load_hits_for_event(event) {
                log::error!("Could not load event {}: {}", event, e);
                return;
            }
            self.plot.print_sizes_for_event(event);
        }

        self.event = event;
        self.geometry = SceneGeometry::build(&self.plot.hitmarkers_for_event(event), &self.layout);
        if let Some(gpu) = &mut self.gpu {
            gpu.renderer.upload(&gpu.device, &self.geometry);
        }
        if let Some(window) = &self.window {
            window.set_title(&self.title());
        }
    }

    fn save_snapshot(&self) {
        let path = self
            .options
            .snapshot_dir
            .join(format!("event_{}.png", self.event));
        if let Err(e) = snapshot::render_png(&self.geometry, &self.layout, &self.camera, &path) {
            log::error!("Snapshot failed: {}", e);
        }
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        match key {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::ArrowRight => {
                if let Some(next) = step_event(&self.events, self.event, true) {
                    self.show_event(next);
                }
            }
            KeyCode::ArrowLeft => {
                if let Some(prev) = step_event(&self.events, self.event, false) {
                    self.show_event(prev);
                }
            }
            KeyCode::KeyO => self.camera.toggle_projection(),
            KeyCode::KeyS => self.save_snapshot(),
            _ => {}
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let Some(gpu) = &mut self.gpu else {
            return Ok(());
        };

        let (width, height) = (gpu.config.width, gpu.config.height);
        let view_proj = self.camera.view_proj(width as f32 / height as f32);
        gpu.renderer.update_camera(&gpu.queue, view_proj, width, height);

        let output = gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let clear = match self.layout.template {
            None => WINDOW_BACKGROUND,
            Some(_) => snapshot::background(&self.layout),
        };
        gpu.renderer.render(&mut encoder, &view, &gpu.depth_view, clear);

        #[cfg(feature = "egui")]
        if let Some(window) = &self.window {
            let sizes: Vec<(String, usize)> = self
                .plot
                .sizes_for_event(self.event)
                .into_iter()
                .map(|(branch, n)| (branch.to_string(), n))
                .collect();
            let content = egui_integration::PanelContent {
                event: self.event,
                position: self.position(),
                num_events: self.events.len(),
                legend: &self.geometry.legend,
                sizes: &sizes,
                legend_font_size: self.layout.legend.font_size as f32,
                item_width: self.layout.legend.item_width as f32,
            };
            gpu.egui.paint(
                window,
                &gpu.device,
                &gpu.queue,
                &mut encoder,
                &view,
                [width, height],
                &content,
            );
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl<S: EventSource> ApplicationHandler for App<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(self.title())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.layout.width,
                self.layout.height,
            ));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.error = Some(ViewerError::Window(e));
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(WindowGpu::new(window.clone(), &self.symbols)) {
            Ok(mut gpu) => {
                gpu.renderer.upload(&gpu.device, &self.geometry);
                self.gpu = Some(gpu);
                self.window = Some(window);
            }
            Err(e) => {
                self.error = Some(ViewerError::Gpu(e));
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(feature = "egui")]
        if let (Some(gpu), Some(window)) = (&mut self.gpu, &self.window) {
            if gpu.egui.on_window_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size.width, physical_size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.on_key(event_loop, key),
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        let dx = position.x - last_x;
                        let dy = position.y - last_y;
                        self.camera.orbit(dx as f32, dy as f32);
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                self.camera.zoom(scroll);
            }
            WindowEvent::RedrawRequested => {
                match self.render() {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(gpu) = &mut self.gpu {
                            let (w, h) = (gpu.config.width, gpu.config.height);
                            gpu.resize(w, h);
                        }
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("GPU out of memory");
                        event_loop.exit();
                    }
                    Err(e) => log::error!("Render error: {:?}", e),
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_through_numbered_events() {
        let events = [5, 6];
        assert_eq!(step_event(&events, 5, true), Some(6));
        assert_eq!(step_event(&events, 6, true), None);
        assert_eq!(step_event(&events, 6, false), Some(5));
        assert_eq!(step_event(&events, 5, false), None);
    }

    #[test]
    fn test_step_skips_gaps() {
        let events = [0, 3, 10];
        assert_eq!(step_event(&events, 3, true), Some(10));
        assert_eq!(step_event(&events, 10, false), Some(3));
    }

    #[test]
    fn test_step_from_missing_event() {
        let events = [5, 6, 9];
        assert_eq!(step_event(&events, 7, true), Some(9));
        assert_eq!(step_event(&events, 7, false), Some(6));
        assert_eq!(step_event(&events, 0, false), None);
        assert_eq!(step_event(&events, 0, true), Some(5));
        assert_eq!(step_event(&[], 0, true), None);
    }
}
