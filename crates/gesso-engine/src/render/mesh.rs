use bytemuck::{Pod, Zeroable};
use core::ops::Range;

use crate::coords::{Mat4, Vec3};
use crate::geometry::MeshKind;
use crate::paint::Color;
use crate::render::RenderCtx;

use super::common::{alpha_blend, ensure_buffer_capacity, uniform_bgl_entry, MatrixUniform};

/// Generic mesh path: points, triangle lists, and triangle strips with a
/// flat per-vertex color.
///
/// All queued mesh entries of a frame share one growable vertex/index
/// buffer pair; each entry becomes an individual `draw_indexed` with a
/// base-vertex offset. Three pipelines share a single shader module, one
/// per GPU topology.
#[derive(Default)]
pub(super) struct MeshRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipelines: Option<Pipelines>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    matrix_ubo: Option<wgpu::Buffer>,

    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,
    ibo: Option<wgpu::Buffer>,
    ibo_capacity: usize,

    vertex_scratch: Vec<MeshVertex>,
    index_scratch: Vec<u32>,
}

struct Pipelines {
    points: wgpu::RenderPipeline,
    triangles: wgpu::RenderPipeline,
    triangle_strip: wgpu::RenderPipeline,
}

/// One recorded draw: an index range into the shared buffers plus the
/// topology it must be drawn with.
#[derive(Debug, Clone)]
pub(super) struct MeshDraw {
    kind: MeshKind,
    indices: Range<u32>,
    base_vertex: i32,
}

/// Input view of one queued mesh entry.
pub(super) struct MeshEntry<'a> {
    pub kind: MeshKind,
    pub vertices: &'a [Vec3],
    pub indices: &'a [u32],
    pub color: Color,
}

impl MeshRenderer {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Uploads the frame's matrices. Call once per flush, before
    /// recording.
    pub(super) fn write_matrices(&mut self, ctx: &RenderCtx<'_>, modelview: Mat4, projection: Mat4) {
        self.ensure_pipelines(ctx);
        self.ensure_bindings(ctx);

        let Some(ubo) = self.matrix_ubo.as_ref() else { return };
        let u = MatrixUniform::new(modelview, projection);
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }

    /// Accumulates `entries` (in paint order) into the shared buffers and
    /// uploads them. Returns one draw per entry, in the same order.
    ///
    /// Triangle fans are lowered to triangle lists here: wgpu has no fan
    /// topology, and the fan's sequential index buffer converts with a
    /// closed-form pattern.
    pub(super) fn prepare(
        &mut self,
        ctx: &RenderCtx<'_>,
        entries: &[MeshEntry<'_>],
    ) -> Vec<MeshDraw> {
        self.ensure_pipelines(ctx);
        self.ensure_bindings(ctx);

        self.vertex_scratch.clear();
        self.index_scratch.clear();
        let mut draws = Vec::with_capacity(entries.len());

        for entry in entries {
            let base_vertex = self.vertex_scratch.len() as i32;
            let color = entry.color.to_array();
            self.vertex_scratch.extend(
                entry.vertices.iter().map(|v| MeshVertex { pos: v.to_array(), color }),
            );

            let index_start = self.index_scratch.len() as u32;
            let kind = match entry.kind {
                MeshKind::TriangleFan => {
                    for i in 1..entry.indices.len().saturating_sub(1) {
                        self.index_scratch.push(entry.indices[0]);
                        self.index_scratch.push(entry.indices[i]);
                        self.index_scratch.push(entry.indices[i + 1]);
                    }
                    MeshKind::Triangles
                }
                MeshKind::Points | MeshKind::Triangles | MeshKind::TriangleStrip => {
                    self.index_scratch.extend_from_slice(entry.indices);
                    entry.kind
                }
            };

            draws.push(MeshDraw {
                kind,
                indices: index_start..self.index_scratch.len() as u32,
                base_vertex,
            });
        }

        self.upload(ctx);
        draws
    }

    /// Records one prepared draw into an open render pass.
    pub(super) fn record(&self, rpass: &mut wgpu::RenderPass<'_>, draw: &MeshDraw) {
        if draw.indices.is_empty() {
            return;
        }

        let Some(pipelines) = self.pipelines.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(vbo) = self.vbo.as_ref() else { return };
        let Some(ibo) = self.ibo.as_ref() else { return };

        let pipeline = match draw.kind {
            MeshKind::Points => &pipelines.points,
            MeshKind::Triangles => &pipelines.triangles,
            MeshKind::TriangleStrip => &pipelines.triangle_strip,
            // Fans are lowered during prepare(); reaching the GPU with
            // one is a renderer bug, not a degradation to tolerate.
            MeshKind::TriangleFan => unreachable!("triangle fans are lowered in prepare()"),
        };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(draw.indices.clone(), draw.base_vertex, 0..1);
    }

    // ── lazy-init helpers ─────────────────────────────────────────────

    fn upload(&mut self, ctx: &RenderCtx<'_>) {
        if self.vertex_scratch.is_empty() {
            return;
        }

        ensure_buffer_capacity(
            ctx.device,
            &mut self.vbo,
            &mut self.vbo_capacity,
            self.vertex_scratch.len(),
            std::mem::size_of::<MeshVertex>(),
            wgpu::BufferUsages::VERTEX,
            "gesso mesh vbo",
        );
        ensure_buffer_capacity(
            ctx.device,
            &mut self.ibo,
            &mut self.ibo_capacity,
            self.index_scratch.len().max(1),
            std::mem::size_of::<u32>(),
            wgpu::BufferUsages::INDEX,
            "gesso mesh ibo",
        );

        if let Some(vbo) = self.vbo.as_ref() {
            ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&self.vertex_scratch));
        }
        if let Some(ibo) = self.ibo.as_ref() {
            ctx.queue.write_buffer(ibo, 0, bytemuck::cast_slice(&self.index_scratch));
        }
    }

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipelines.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gesso mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("gesso mesh bgl"),
                entries: &[uniform_bgl_entry::<MatrixUniform>(0)],
            });

        let layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("gesso mesh pipeline layout"),
                bind_group_layouts: &[&bgl],
                immediate_size: 0,
            });

        let make = |topology, strip_index_format, label: &str| {
            ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),

                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[MeshVertex::layout()],
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
                    topology,
                    strip_index_format,
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
            })
        };

        self.pipelines = Some(Pipelines {
            points: make(wgpu::PrimitiveTopology::PointList, None, "gesso mesh points pipeline"),
            triangles: make(
                wgpu::PrimitiveTopology::TriangleList,
                None,
                "gesso mesh triangles pipeline",
            ),
            triangle_strip: make(
                wgpu::PrimitiveTopology::TriangleStrip,
                Some(wgpu::IndexFormat::Uint32),
                "gesso mesh strip pipeline",
            ),
        });
        self.pipeline_format = Some(ctx.surface_format);
        self.bind_group_layout = Some(bgl);

        self.bind_group = None;
        self.matrix_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.matrix_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let matrix_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("gesso mesh matrix ubo"),
            size: std::mem::size_of::<MatrixUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gesso mesh bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: matrix_ubo.as_entire_binding(),
            }],
        });

        self.matrix_ubo = Some(matrix_ubo);
        self.bind_group = Some(bind_group);
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct MeshVertex {
    pos: [f32; 3],
    color: [f32; 4],
}

impl MeshVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // pos
        1 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}
