use bytemuck::{Pod, Zeroable};

use crate::coords::{Mat4, Vec3};
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};

use super::common::{alpha_blend, ensure_buffer_capacity, ubo_min_binding_size};

/// A GPU texture drawable through the image fast path.
pub struct TextureImage {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl TextureImage {
    /// Uploads straight-alpha RGBA bytes (`width * height * 4`) into a
    /// new texture.
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("gesso image texture"),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view, width, height }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Underlying texture, for hosts that want to update pixels in place.
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }
}

/// Uniform block for the texture program.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct TextureUniform {
    modelview: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    /// The renderer's current transform at draw time; applied on the GPU
    /// because the quad corners are generated here, not queued.
    transform: [[f32; 4]; 4],
    tint: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct TexturedVertex {
    pos: [f32; 2],
    texcoord: [f32; 2],
}

impl TexturedVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x2  // texcoord
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TexturedVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Textured-quad fast path: draws immediately, bypassing the queue.
#[derive(Default)]
pub(super) struct ImageRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    sampler: Option<wgpu::Sampler>,
    uniform_ubo: Option<wgpu::Buffer>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_capacity: usize,
}

impl ImageRenderer {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Draws `image` as a screen-space quad at `location` with `size`,
    /// in its own render pass.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        image: &TextureImage,
        location: Vec3,
        size: (f32, f32),
        transform: Mat4,
        modelview: Mat4,
        projection: Mat4,
        tint: Color,
    ) {
        self.ensure_pipeline(ctx);
        self.ensure_sampler(ctx);
        self.ensure_uniform(ctx);

        let (x, y) = (location.x, location.y);
        let (sx, sy) = size;

        // Strip order: bottom-left, bottom-right, top-left, top-right.
        let quad = [
            TexturedVertex { pos: [x, y + sy], texcoord: [0.0, 1.0] },
            TexturedVertex { pos: [x + sx, y + sy], texcoord: [1.0, 1.0] },
            TexturedVertex { pos: [x, y], texcoord: [0.0, 0.0] },
            TexturedVertex { pos: [x + sx, y], texcoord: [1.0, 0.0] },
        ];

        ensure_buffer_capacity(
            ctx.device,
            &mut self.quad_vbo,
            &mut self.quad_capacity,
            quad.len(),
            std::mem::size_of::<TexturedVertex>(),
            wgpu::BufferUsages::VERTEX,
            "gesso image quad vbo",
        );

        let (Some(pipeline), Some(bgl), Some(sampler), Some(ubo), Some(vbo)) = (
            self.pipeline.as_ref(),
            self.bind_group_layout.as_ref(),
            self.sampler.as_ref(),
            self.uniform_ubo.as_ref(),
            self.quad_vbo.as_ref(),
        ) else {
            return;
        };

        let u = TextureUniform {
            modelview: modelview.to_gpu(),
            projection: projection.to_gpu(),
            transform: transform.to_gpu(),
            tint: tint.to_array(),
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
        ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&quad));

        // The bind group references the per-call texture, so it cannot be
        // cached across images.
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gesso image bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: ubo.as_entire_binding() },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&image.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("gesso image pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.draw(0..4, 0..1);
    }

    // ── lazy-init helpers ─────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gesso texture shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/texture.wgsl").into()),
        });

        let bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("gesso image bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: Some(ubo_min_binding_size::<TextureUniform>()),
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("gesso image pipeline layout"),
                bind_group_layouts: &[&bgl],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("gesso image pipeline"),
            layout: Some(&layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[TexturedVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
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

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);
        self.uniform_ubo = None;
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_some() {
            return;
        }
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("gesso image sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));
    }

    fn ensure_uniform(&mut self, ctx: &RenderCtx<'_>) {
        if self.uniform_ubo.is_some() {
            return;
        }
        self.uniform_ubo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("gesso image ubo"),
            size: std::mem::size_of::<TextureUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
    }
}
