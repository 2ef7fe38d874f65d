use bytemuck::{Pod, Zeroable};
use core::ops::Range;

use crate::coords::Mat4;
use crate::geometry::{build_line_mesh, LineBatch, LineVertex};
use crate::render::RenderCtx;

use super::common::{alpha_blend, ensure_buffer_capacity, uniform_bgl_entry};

/// Antialiased line path.
///
/// Consumes the 6-vertices-per-segment stream from
/// [`build_line_mesh`]; the vertex stage resolves miters, caps, and
/// width extrusion in screen space using the viewport-height uniform.
/// One maximal run of queued line entries becomes one draw.
#[derive(Default)]
pub(super) struct LineRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    uniform_ubo: Option<wgpu::Buffer>,

    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,

    scratch: Vec<LineVertex>,
}

/// Uniform block for the line program: matrices plus the viewport height
/// the shader needs for pixel-space width calculations.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct LineUniform {
    modelview: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    /// x = viewport height in logical pixels; yzw padding.
    viewport: [f32; 4],
}

/// One recorded line draw: a vertex range into the shared buffer.
#[derive(Debug, Clone)]
pub(super) struct LineDraw {
    vertices: Range<u32>,
}

impl LineRenderer {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn write_uniforms(
        &mut self,
        ctx: &RenderCtx<'_>,
        modelview: Mat4,
        projection: Mat4,
    ) {
        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);

        let Some(ubo) = self.uniform_ubo.as_ref() else { return };
        let u = LineUniform {
            modelview: modelview.to_gpu(),
            projection: projection.to_gpu(),
            viewport: [ctx.viewport.height.max(1.0), 0.0, 0.0, 0.0],
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }

    /// Expands each run of line batches into the shared vertex buffer and
    /// uploads it. Returns one draw per run, in order.
    pub(super) fn prepare(
        &mut self,
        ctx: &RenderCtx<'_>,
        runs: &[Vec<LineBatch<'_>>],
    ) -> Vec<LineDraw> {
        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);

        self.scratch.clear();
        let mut draws = Vec::with_capacity(runs.len());

        for run in runs {
            let start = self.scratch.len() as u32;
            self.scratch.extend(build_line_mesh(run));
            draws.push(LineDraw { vertices: start..self.scratch.len() as u32 });
        }

        if !self.scratch.is_empty() {
            ensure_buffer_capacity(
                ctx.device,
                &mut self.vbo,
                &mut self.vbo_capacity,
                self.scratch.len(),
                std::mem::size_of::<LineVertex>(),
                wgpu::BufferUsages::VERTEX,
                "gesso line vbo",
            );
            if let Some(vbo) = self.vbo.as_ref() {
                ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&self.scratch));
            }
        }

        draws
    }

    /// Records one prepared run into an open render pass.
    pub(super) fn record(&self, rpass: &mut wgpu::RenderPass<'_>, draw: &LineDraw) {
        if draw.vertices.is_empty() {
            return;
        }

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(vbo) = self.vbo.as_ref() else { return };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.draw(draw.vertices.clone(), 0..1);
    }

    // ── lazy-init helpers ─────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gesso line shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/line.wgsl").into()),
        });

        let bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("gesso line bgl"),
                entries: &[uniform_bgl_entry::<LineUniform>(0)],
            });

        let layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("gesso line pipeline layout"),
                bind_group_layouts: &[&bgl],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("gesso line pipeline"),
            layout: Some(&layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[LineVertex::layout()],
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

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bgl);

        self.bind_group = None;
        self.uniform_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.uniform_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let uniform_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("gesso line ubo"),
            size: std::mem::size_of::<LineUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gesso line bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_ubo.as_entire_binding(),
            }],
        });

        self.uniform_ubo = Some(uniform_ubo);
        self.bind_group = Some(bind_group);
    }
}
