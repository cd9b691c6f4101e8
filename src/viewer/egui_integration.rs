//! Legend and collection-size panel drawn with egui.
//!
//! Only compiled with the `egui` feature.

use std::sync::Arc;

use winit::window::Window;

use super::scene::LegendEntry;
use crate::config::MarkerSymbol;

/// What the panel shows for the current event.
pub struct PanelContent<'a> {
    pub event: usize,
    /// One-based position of `event` among the stored events.
    pub position: usize,
    pub num_events: usize,
    pub legend: &'a [LegendEntry],
    pub sizes: &'a [(String, usize)],
    pub legend_font_size: f32,
    pub item_width: f32,
}

/// egui context, winit input state and wgpu renderer.
pub struct EguiIntegration {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl EguiIntegration {
    pub fn new(device: &wgpu::Device, output_format: wgpu::TextureFormat, window: &Arc<Window>) -> Self {
        let ctx = egui::Context::default();

        let mut style = egui::Style::default();
        style.visuals = egui::Visuals::dark();
        style.visuals.window_shadow = egui::Shadow::NONE;
        style.visuals.popup_shadow = egui::Shadow::NONE;
        ctx.set_style(style);

        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let renderer = egui_wgpu::Renderer::new(
            device,
            output_format,
            None,  // depth format
            1,     // msaa samples
            false, // dithering
        );

        Self { ctx, state, renderer }
    }

    /// Feed a window event to egui. Returns true if egui consumed it.
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Run the panel UI and paint it on top of `view`.
    pub fn paint(
        &mut self,
        window: &Window,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        size: [u32; 2],
        content: &PanelContent<'_>,
    ) {
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, |ctx| draw_panel(ctx, content));
        self.state
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: size,
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }
        self.renderer
            .update_buffers(device, queue, encoder, &paint_jobs, &screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.renderer
                .render(&mut render_pass.forget_lifetime(), &paint_jobs, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

fn symbol_glyph(symbol: Option<MarkerSymbol>) -> &'static str {
    match symbol {
        None => "━",
        Some(MarkerSymbol::Circle) => "●",
        Some(MarkerSymbol::CircleOpen) => "○",
        Some(MarkerSymbol::Square) => "■",
        Some(MarkerSymbol::SquareOpen) => "□",
        Some(MarkerSymbol::Diamond) => "◆",
        Some(MarkerSymbol::DiamondOpen) => "◇",
        Some(MarkerSymbol::Cross) => "✚",
        Some(MarkerSymbol::X) => "✖",
    }
}

fn draw_panel(ctx: &egui::Context, content: &PanelContent<'_>) {
    egui::Window::new(format!(
        "Event {} ({} / {})",
        content.event, content.position, content.num_events
    ))
        .default_pos([10.0, 10.0])
        .show(ctx, |ui| {
            egui::CollapsingHeader::new("Collections")
                .default_open(true)
                .show(ui, |ui| {
                    egui::Grid::new("sizes").striped(true).show(ui, |ui| {
                        for (branch, n) in content.sizes {
                            ui.label(branch);
                            ui.label(n.to_string());
                            ui.end_row();
                        }
                    });
                });

            egui::CollapsingHeader::new("Legend")
                .default_open(true)
                .show(ui, |ui| {
                    egui::ScrollArea::vertical().max_height(400.0).show(ui, |ui| {
                        for entry in content.legend {
                            let [r, g, b] = entry.color;
                            ui.horizontal(|ui| {
                                ui.add_sized(
                                    [content.item_width.max(10.0), content.legend_font_size],
                                    egui::Label::new(
                                        egui::RichText::new(symbol_glyph(entry.symbol))
                                            .color(egui::Color32::from_rgb(r, g, b))
                                            .size(content.legend_font_size),
                                    ),
                                );
                                ui.label(
                                    egui::RichText::new(&entry.label)
                                        .monospace()
                                        .size(content.legend_font_size),
                                );
                            });
                        }
                    });
                });
        });
}
