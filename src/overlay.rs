use winit::window::Window;

/// Hint shown until the page has been scrolled a little
pub const HINT_TEXT: &str = "Scroll to explore";

/// Per-frame values the overlay displays
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayInfo {
    pub fps: f32,
    pub progress: f32,
    pub hint_visible: bool,
}

/// egui overlay drawn over the figure: scroll hint plus an FPS readout
pub struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl Overlay {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, window: &Window) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());

        Self {
            ctx,
            state,
            renderer,
        }
    }

    /// Returns true when egui consumed the event
    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Lays out the overlay and records its draw into `encoder` on top of `view`
    pub fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        window: &Window,
        size_in_pixels: [u32; 2],
        info: OverlayInfo,
    ) {
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, |ctx| build_ui(ctx, &info));

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .ctx
            .tessellate(full_output.shapes, self.ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: window.scale_factor() as f32,
        };
        self.renderer
            .update_buffers(device, queue, encoder, &tris, &screen_descriptor);

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();

            self.renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

fn build_ui(ctx: &egui::Context, info: &OverlayInfo) {
    if info.hint_visible {
        egui::Area::new(egui::Id::new("scroll_hint"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -40.0))
            .interactable(false)
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(HINT_TEXT)
                        .size(18.0)
                        .color(egui::Color32::from_white_alpha(180)),
                );
            });
    }

    egui::Window::new("Stats")
        .title_bar(false)
        .resizable(false)
        .fixed_pos(egui::pos2(10.0, 10.0))
        .show(ctx, |ui| {
            ui.heading(
                egui::RichText::new(format!("{:.0} FPS", info.fps))
                    .size(24.0)
                    .color(egui::Color32::from_rgb(74, 158, 255)),
            );

            let frame_time_ms = if info.fps > 0.0 { 1000.0 / info.fps } else { 0.0 };
            ui.label(
                egui::RichText::new(format!("{:.2} ms", frame_time_ms))
                    .size(14.0)
                    .color(egui::Color32::GRAY),
            );
            ui.monospace(format!("Progress: {:.3}", info.progress));
        });
}
