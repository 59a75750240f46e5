//! WebGPU render pipeline setup

use glam::Vec2;

use super::mesh::{MeshStyle, build_mesh};
use super::vertex::{Vertex, colors};
use super::Renderer;
use crate::graph::{Edge, Triangle};
use crate::sim::Viewport;

/// Vertices the initial buffer can hold before it has to grow
const INITIAL_VERTEX_CAPACITY: usize = 16 * 1024;

/// Failures while bringing up the GPU
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

/// Map viewport pixels (origin top-left, y down) to normalized device coordinates
pub fn pixel_to_ndc(p: Vec2, viewport: Viewport) -> Vec2 {
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        p.x / viewport.width * 2.0 - 1.0,
        1.0 - p.y / viewport.height * 2.0,
    )
}

/// Fit a physical surface size inside the device's texture limit, keeping the
/// aspect ratio. Zero extents become 1.
pub fn clamp_surface_size(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let (width, height) = (width.max(1), height.max(1));
    let max_dimension = max_dimension.max(1);
    let longest = width.max(height);
    if longest <= max_dimension {
        return (width, height);
    }
    let scale = f64::from(max_dimension) / f64::from(longest);
    let fit = |extent: u32| ((f64::from(extent) * scale).round() as u32).clamp(1, max_dimension);
    (fit(width), fit(height))
}

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    pub vertex_buffer: wgpu::Buffer,
    /// Vertices the buffer can hold
    pub vertex_capacity: usize,
    pub vertex_count: u32,
    /// Surface size in physical pixels, within the device texture limit
    pub size: (u32, u32),
    /// Largest surface extent the device accepts
    pub max_surface_dimension: u32,
    /// Viewport the simulation runs in (CSS pixels)
    pub viewport: Viewport,
    pub style: MeshStyle,
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        viewport: Viewport,
        style: MeshStyle,
    ) -> Result<Self, RendererError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("constellation-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::debug!("Surface formats: {:?}", surface_caps.formats);
        log::debug!("Surface alpha modes: {:?}", surface_caps.alpha_modes);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        // Premultiplied lets the page show through the transparent clear
        let alpha_mode = if surface_caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            surface_caps.alpha_modes[0]
        };
        log::info!("Using surface format {:?}, alpha {:?}", surface_format, alpha_mode);

        let max_surface_dimension = device.limits().max_texture_dimension_2d;
        let (width, height) = clamp_surface_size(width, height, max_surface_dimension);
        log::info!(
            "Surface {}x{} (device limit {})",
            width,
            height,
            max_surface_dimension
        );

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    // The fragment shader premultiplies
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = Self::create_vertex_buffer(&device, INITIAL_VERTEX_CAPACITY);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            vertex_count: 0,
            size: (width, height),
            max_surface_dimension,
            viewport,
            style,
        })
    }

    fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("vertex_buffer"),
            size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Reconfigure the surface (physical pixels) and the pixel mapping (CSS pixels).
    /// The surface is capped at the device limit; `size` holds what was applied.
    pub fn resize(&mut self, new_width: u32, new_height: u32, viewport: Viewport) {
        self.viewport = viewport;
        if new_width > 0 && new_height > 0 {
            let (width, height) =
                clamp_surface_size(new_width, new_height, self.max_surface_dimension);
            self.size = (width, height);
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure with the current size (after `SurfaceError::Lost` / `Outdated`)
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Upload vertices (viewport pixels) and render
    pub fn render_mesh(&mut self, vertices: &[Vertex]) -> Result<(), wgpu::SurfaceError> {
        let ndc_vertices: Vec<Vertex> = vertices
            .iter()
            .map(|v| {
                let p = pixel_to_ndc(Vec2::from(v.position), self.viewport);
                Vertex::new(p.x, p.y, v.color)
            })
            .collect();

        if ndc_vertices.len() > self.vertex_capacity {
            // Grow geometrically so a busy frame doesn't reallocate every time
            self.vertex_capacity = ndc_vertices.len().next_power_of_two();
            self.vertex_buffer = Self::create_vertex_buffer(&self.device, self.vertex_capacity);
            log::debug!("Vertex buffer grown to {} vertices", self.vertex_capacity);
        }
        if !ndc_vertices.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&ndc_vertices));
        }
        self.vertex_count = ndc_vertices.len() as u32;

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(colors::BACKGROUND),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if self.vertex_count > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.draw(0..self.vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl Renderer for RenderState {
    type Error = wgpu::SurfaceError;

    fn render(
        &mut self,
        vertices: &[Vec2],
        triangles: &[Triangle],
        edges: &[Edge],
    ) -> Result<(), wgpu::SurfaceError> {
        let mesh = build_mesh(vertices, triangles, edges, &self.style);
        self.render_mesh(&mesh)
    }
}
