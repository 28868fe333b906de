use anyhow::{Context, Result};
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::config::Config;
use crate::core::GpuContext;
use crate::driver::SceneView;
use crate::figure::Figure;
use crate::lighting::Lighting;
use crate::mesh::{DrawRange, Mesh, PackedMeshes};
use crate::overlay::{Overlay, OverlayInfo};
use crate::traits::RenderBackend;
use crate::types::{CameraUniform, InstanceData, LightingUniform, Vertex};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Preferred multisample count for the figure pass
pub const MSAA_SAMPLES: u32 = 4;

/// Largest of 1 and [`MSAA_SAMPLES`] that both attachment formats support
pub fn sample_count(
    color: wgpu::TextureFormatFeatureFlags,
    depth: wgpu::TextureFormatFeatureFlags,
) -> u32 {
    let resolvable = color.contains(wgpu::TextureFormatFeatureFlags::MULTISAMPLE_RESOLVE);
    if resolvable
        && color.sample_count_supported(MSAA_SAMPLES)
        && depth.sample_count_supported(MSAA_SAMPLES)
    {
        MSAA_SAMPLES
    } else {
        1
    }
}

/// Forward rasteriser for the figure: one packed mesh buffer, one instance per segment.
///
/// Each frame renders the key light's shadow map first, then the figure
/// multisampled and resolved into the surface, then the overlay on top.
pub struct FigureRenderer {
    window: Arc<Window>,
    gpu: GpuContext,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    sample_count: u32,
    msaa_view: Option<wgpu::TextureView>,
    depth_view: wgpu::TextureView,
    shadow_view: wgpu::TextureView,
    pipeline: wgpu::RenderPipeline,
    shadow_pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    shadow_bind_group: wgpu::BindGroup,
    camera_buffer: wgpu::Buffer,
    lighting_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    ranges: Vec<DrawRange>,
    instances: Vec<InstanceData>,
    casters: Vec<bool>,
    overlay: Option<Overlay>,
    fps: f32,
}

struct Pipelines {
    figure: wgpu::RenderPipeline,
    shadow: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    shadow_bind_group: wgpu::BindGroup,
}

impl FigureRenderer {
    /// Meshes are built once from `figure`'s segments; later frames only move them
    pub async fn new(window: Arc<Window>, figure: &Figure, config: &Config) -> Result<Self> {
        let size = window.inner_size();

        let instance = GpuContext::instance();
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create window surface")?;
        let gpu = GpuContext::new_with_surface(&instance, &surface).await?;
        let device = gpu.device();

        let surface_config =
            Self::create_surface_config(&surface, gpu.adapter(), size, config.vsync)?;
        surface.configure(device, &surface_config);

        let adapter = gpu.adapter();
        let sample_count = sample_count(
            adapter.get_texture_format_features(surface_config.format).flags,
            adapter.get_texture_format_features(DEPTH_FORMAT).flags,
        );
        let msaa_view = Self::create_msaa_texture(device, &surface_config, sample_count);
        let depth_view = Self::create_depth_texture(device, &surface_config, sample_count);
        let shadow_map_size = Lighting::studio().shadow.map_size;
        let shadow_view = Self::create_shadow_texture(device, shadow_map_size);

        let meshes: Vec<Mesh> = figure
            .segments()
            .iter()
            .map(|segment| Mesh::from_shape(segment.shape()))
            .collect();
        let packed = PackedMeshes::pack(&meshes);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Figure Vertices"),
            contents: bytemuck::cast_slice(&packed.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Figure Indices"),
            contents: bytemuck::cast_slice(&packed.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Figure Instances"),
            size: (packed.ranges.len() * std::mem::size_of::<InstanceData>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let lighting_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Lighting Buffer"),
            size: std::mem::size_of::<LightingUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let pipelines = Self::create_render_pipeline(
            device,
            &camera_buffer,
            &lighting_buffer,
            &shadow_view,
            surface_config.format,
            sample_count,
        );

        let overlay = config
            .show_ui
            .then(|| Overlay::new(device, surface_config.format, &window));

        log::info!(
            "Renderer initialized: {} segments, {} triangles, {:?}, {}x MSAA, {}px shadow map",
            packed.ranges.len(),
            packed.indices.len() / 3,
            surface_config.present_mode,
            sample_count,
            shadow_map_size
        );

        Ok(Self {
            window,
            gpu,
            surface,
            surface_config,
            sample_count,
            msaa_view,
            depth_view,
            shadow_view,
            pipeline: pipelines.figure,
            shadow_pipeline: pipelines.shadow,
            bind_group: pipelines.bind_group,
            shadow_bind_group: pipelines.shadow_bind_group,
            camera_buffer,
            lighting_buffer,
            vertex_buffer,
            index_buffer,
            instance_buffer,
            ranges: packed.ranges,
            instances: Vec::with_capacity(meshes.len()),
            casters: Vec::with_capacity(meshes.len()),
            overlay,
            fps: 0.0,
        })
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        size: winit::dpi::PhysicalSize<u32>,
        vsync: bool,
    ) -> Result<wgpu::SurfaceConfiguration> {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("Surface reports no supported formats")?;

        let present_mode = if vsync {
            wgpu::PresentMode::Fifo
        } else {
            [wgpu::PresentMode::Mailbox, wgpu::PresentMode::Immediate]
                .into_iter()
                .find(|mode| surface_caps.present_modes.contains(mode))
                .unwrap_or(wgpu::PresentMode::Fifo)
        };

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    fn create_msaa_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        sample_count: u32,
    ) -> Option<wgpu::TextureView> {
        if sample_count == 1 {
            return None;
        }
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("MSAA Color Texture"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: config.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        Some(texture.create_view(&wgpu::TextureViewDescriptor::default()))
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        sample_count: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_shadow_texture(device: &wgpu::Device, size: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Shadow Map"),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_render_pipeline(
        device: &wgpu::Device,
        camera_buffer: &wgpu::Buffer,
        lighting_buffer: &wgpu::Buffer,
        shadow_view: &wgpu::TextureView,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Pipelines {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Figure Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("figure.wgsl").into()),
        });

        let uniform_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[uniform_entry(0), uniform_entry(1)],
            label: Some("figure_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lighting_buffer.as_entire_binding(),
                },
            ],
            label: Some("figure_bind_group"),
        });

        // Sampled by the figure pass only; the shadow pass writes it
        let shadow_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Depth,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                        count: None,
                    },
                ],
                label: Some("shadow_bind_group_layout"),
            });

        let shadow_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Shadow Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        let shadow_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &shadow_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(shadow_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&shadow_sampler),
                },
            ],
            label: Some("shadow_bind_group"),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Figure Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout, &shadow_bind_group_layout],
            push_constant_ranges: &[],
        });

        let primitive = wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        };

        let figure = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Figure Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::LAYOUT, InstanceData::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive,
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        let shadow_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shadow Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        // Depth only
        let shadow = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shadow Pipeline"),
            layout: Some(&shadow_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_shadow"),
                buffers: &[Vertex::LAYOUT, InstanceData::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: None,
            primitive,
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                },
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Pipelines {
            figure,
            shadow,
            bind_group,
            shadow_bind_group,
        }
    }

    pub fn set_fps(&mut self, fps: f32) {
        self.fps = fps;
    }

    /// Reconfigures the surface and its attachments; zero sizes are skipped
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.reconfigure();
    }

    /// Re-applies the current configuration, e.g. after the surface was lost
    pub fn reconfigure(&mut self) {
        let device = self.gpu.device();
        self.surface.configure(device, &self.surface_config);
        self.msaa_view = Self::create_msaa_texture(device, &self.surface_config, self.sample_count);
        self.depth_view = Self::create_depth_texture(device, &self.surface_config, self.sample_count);
        log::info!(
            "Surface reconfigured: {}x{}",
            self.surface_config.width,
            self.surface_config.height
        );
    }

    /// Returns true when the overlay consumed the event
    pub fn handle_event(&mut self, event: &winit::event::WindowEvent) -> bool {
        match &mut self.overlay {
            Some(overlay) => overlay.handle_event(&self.window, event),
            None => false,
        }
    }

    fn upload(&mut self, scene: &SceneView<'_>) {
        let queue = self.gpu.queue();
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[scene.camera.to_uniform()]),
        );
        queue.write_buffer(
            &self.lighting_buffer,
            0,
            bytemuck::cast_slice(&[scene.lighting.to_uniform()]),
        );

        self.instances.clear();
        self.casters.clear();
        let (instances, casters) = (&mut self.instances, &mut self.casters);
        scene.figure.for_each_world(|world, segment| {
            instances.push(InstanceData::new(world, segment));
            casters.push(segment.shadows().cast);
        });
        if self.instances.len() != self.ranges.len() {
            log::warn!(
                "Figure has {} segments but {} meshes were uploaded",
                self.instances.len(),
                self.ranges.len()
            );
            self.instances.truncate(self.ranges.len());
        }
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&self.instances));
    }
}

impl RenderBackend for FigureRenderer {
    type Error = wgpu::SurfaceError;

    fn render(&mut self, scene: &SceneView<'_>) -> std::result::Result<(), Self::Error> {
        self.upload(scene);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Encoder"),
            });

        {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            shadow_pass.set_pipeline(&self.shadow_pipeline);
            shadow_pass.set_bind_group(0, &self.bind_group, &[]);
            shadow_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            shadow_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            shadow_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            for (i, (range, _)) in self
                .ranges
                .iter()
                .zip(&self.casters)
                .enumerate()
                .filter(|(_, (_, casts))| **casts)
            {
                let instance = i as u32;
                shadow_pass.draw_indexed(range.indices.clone(), range.base_vertex, instance..instance + 1);
            }
        }

        {
            // Multisampled target resolves into the surface; the overlay then draws on the resolved image
            let (target, resolve_target, store) = match &self.msaa_view {
                Some(msaa) => (msaa, Some(&view), wgpu::StoreOp::Discard),
                None => (&view, None, wgpu::StoreOp::Store),
            };
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Figure Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(scene.lighting.clear_color()),
                        store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.set_bind_group(1, &self.shadow_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            for (i, range) in self.ranges.iter().enumerate().take(self.instances.len()) {
                let instance = i as u32;
                render_pass.draw_indexed(range.indices.clone(), range.base_vertex, instance..instance + 1);
            }
        }

        if let Some(overlay) = &mut self.overlay {
            overlay.draw(
                self.gpu.device(),
                self.gpu.queue(),
                &mut encoder,
                &view,
                &self.window,
                [self.surface_config.width, self.surface_config.height],
                OverlayInfo {
                    fps: self.fps,
                    progress: scene.progress,
                    hint_visible: scene.hint_visible,
                },
            );
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
