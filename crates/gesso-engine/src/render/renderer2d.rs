use core::f32::consts::FRAC_PI_3;

use crate::coords::{Mat4, Vec3, Viewport};
use crate::geometry::{self, GeometryError, LineBatch, LinePrimitive, LyonTessellator, MeshPrimitive};
use crate::paint::Color;
use crate::scene::{Batch, DrawQueue, QueueEntry};
use crate::shape::Shape;

use super::image::ImageRenderer;
use super::line::LineRenderer;
use super::mesh::{MeshEntry, MeshRenderer};
use super::pingpong::FramebufferPair;
use super::{RenderCtx, RenderTarget, TextureImage};

/// The 2D immediate-mode renderer.
///
/// Owns the per-frame draw queue, the current transform state, the
/// tessellator, and the GPU paths that flush the queue. One instance per
/// canvas; all calls happen on the host's frame thread between
/// `begin_frame` and `end_frame`.
///
/// Frame protocol:
/// 1. `begin_frame` — reset transform, seed back with the persistent
///    front canvas
/// 2. any number of `render` / `render_image` calls
/// 3. `end_frame` — flush, present back to the visible target, swap
pub struct Renderer2D {
    queue: DrawQueue,
    tess: LyonTessellator,

    /// Current transform, baked into vertices at `render` time.
    transform: Mat4,
    modelview: Mat4,
    projection: Mat4,

    background: Color,
    /// Image tint; `None` draws images untinted.
    tint: Option<Color>,

    mesh: MeshRenderer,
    line: LineRenderer,
    image: ImageRenderer,
    canvas: FramebufferPair,

    warned_colorless_points: bool,
}

impl Renderer2D {
    /// Creates the renderer and its offscreen canvas pair, both slots
    /// cleared to the background color.
    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        let (mv, proj) = view_matrices(ctx.viewport);
        let (pw, ph) = physical_size(ctx);

        let background = Color::gray(0.8);
        let canvas = FramebufferPair::new(ctx.device, pw, ph, ctx.surface_format);

        let renderer = Self {
            queue: DrawQueue::new(),
            tess: LyonTessellator::new(),
            transform: Mat4::identity(),
            modelview: mv,
            projection: proj,
            background,
            tint: None,
            mesh: MeshRenderer::new(),
            line: LineRenderer::new(),
            image: ImageRenderer::new(),
            canvas,
            warned_colorless_points: false,
        };

        renderer.clear_canvas_now(ctx);
        renderer
    }

    // ── view state ────────────────────────────────────────────────────

    /// Recomputes matrices and resizes the canvas pair after the host
    /// viewport changed. The canvas restarts from the background color.
    pub fn reset_view(&mut self, ctx: &RenderCtx<'_>) {
        let (mv, proj) = view_matrices(ctx.viewport);
        self.modelview = mv;
        self.projection = proj;

        let (pw, ph) = physical_size(ctx);
        self.canvas.resize(ctx.device, pw, ph);
        self.clear_canvas_now(ctx);
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Wipes the persistent canvas back to the background color.
    pub fn clear(&mut self, encoder: &mut wgpu::CommandEncoder) {
        self.canvas.clear_both(encoder, self.background);
    }

    pub fn set_tint(&mut self, color: Color) {
        self.tint = Some(color);
    }

    pub fn clear_tint(&mut self) {
        self.tint = None;
    }

    // ── transform state ───────────────────────────────────────────────

    /// Replaces the current transform. Affects only shapes rendered
    /// afterwards; queued geometry is already baked.
    pub fn set_transform(&mut self, matrix: Mat4) {
        self.transform = matrix;
    }

    pub fn current_transform(&self) -> Mat4 {
        self.transform
    }

    pub fn reset_transform(&mut self) {
        self.transform = Mat4::identity();
    }

    // ── shape path ────────────────────────────────────────────────────

    /// Classifies `shape` and appends its primitives to the draw queue.
    ///
    /// Fails (leaving the queue untouched) when the shape violates its
    /// kind's vertex-count invariants or when tessellation fails; prior
    /// queue contents are never corrupted by a failed call.
    pub fn render(&mut self, shape: &Shape) -> Result<(), GeometryError> {
        let prims = geometry::shape_primitives(shape, &mut self.tess)?;
        let matrix = self.transform * shape.transform;

        // Points carry the stroke color when present (points are stroked
        // geometry in the public API), else the fill; with neither set
        // they are dropped along with everything else.
        if let Some(points) = prims.points {
            match shape.stroke.or(shape.fill) {
                Some(color) => self.enqueue_mesh(points, color, matrix),
                None => {
                    if !self.warned_colorless_points {
                        log::debug!("Renderer2D: points shape with neither stroke nor fill; dropped");
                        self.warned_colorless_points = true;
                    }
                }
            }
        }

        if let Some(fill) = shape.fill {
            for mesh in prims.meshes {
                self.enqueue_mesh(mesh, fill, matrix);
            }
        }

        if let Some(stroke) = shape.stroke {
            for border in prims.borders {
                self.enqueue_line(border, shape, stroke, matrix);
            }
        }

        Ok(())
    }

    fn enqueue_mesh(&mut self, prim: MeshPrimitive, color: Color, matrix: Mat4) {
        self.queue.push(QueueEntry::Mesh {
            kind: prim.kind,
            vertices: bake(&prim.vertices, matrix),
            indices: prim.indices,
            color,
        });
    }

    fn enqueue_line(&mut self, prim: LinePrimitive, shape: &Shape, color: Color, matrix: Mat4) {
        self.queue.push(QueueEntry::Line {
            vertices: bake(&prim.vertices, matrix),
            polylines: prim.polylines,
            color,
            weight: shape.stroke_weight,
            cap: shape.stroke_cap,
            join: shape.stroke_join,
        });
    }

    // ── flush & frame protocol ────────────────────────────────────────

    /// Flushes queued geometry into the back canvas.
    ///
    /// No-op on an empty queue; afterwards the queue is always empty.
    pub fn flush(&mut self, ctx: &RenderCtx<'_>, encoder: &mut wgpu::CommandEncoder) {
        let back = self.canvas.back_view().clone();
        self.flush_into(ctx, encoder, &back);
    }

    /// Starts a draw cycle: resets the transform and composites the
    /// persistent front canvas beneath the new frame's geometry.
    pub fn begin_frame(&mut self, ctx: &RenderCtx<'_>, encoder: &mut wgpu::CommandEncoder) {
        self.transform = Mat4::identity();
        self.canvas.blit(
            ctx.device,
            encoder,
            self.canvas.front_view(),
            self.canvas.back_view(),
            None,
        );
    }

    /// Ends the draw cycle: flushes the queue, presents the back canvas
    /// over `surface_view` (cleared to the background color first), then
    /// exchanges the front/back roles.
    pub fn end_frame(
        &mut self,
        ctx: &RenderCtx<'_>,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
    ) {
        let back = self.canvas.back_view().clone();
        self.flush_into(ctx, encoder, &back);

        self.canvas
            .blit(ctx.device, encoder, &back, surface_view, Some(self.background));
        self.canvas.swap();
        self.transform = Mat4::identity();
    }

    /// Image fast path: flushes pending geometry (to preserve paint
    /// order), then draws the textured quad immediately.
    pub fn render_image(
        &mut self,
        ctx: &RenderCtx<'_>,
        encoder: &mut wgpu::CommandEncoder,
        image: &TextureImage,
        location: Vec3,
        size: (f32, f32),
    ) {
        let back = self.canvas.back_view().clone();
        self.flush_into(ctx, encoder, &back);

        let tint = self.tint.unwrap_or(Color::WHITE);
        let mut target = RenderTarget::new(encoder, &back);
        self.image.render(
            ctx,
            &mut target,
            image,
            location,
            size,
            self.transform,
            self.modelview,
            self.projection,
            tint,
        );
    }

    /// Offscreen canvas pair (front = persistent surface).
    pub fn canvas(&self) -> &FramebufferPair {
        &self.canvas
    }

    fn flush_into(
        &mut self,
        ctx: &RenderCtx<'_>,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) {
        if self.queue.is_empty() {
            return;
        }

        let plan = self.queue.batches();

        // Gather per-batch inputs in paint order.
        let mut mesh_entries: Vec<MeshEntry<'_>> = Vec::new();
        let mut line_runs: Vec<Vec<LineBatch<'_>>> = Vec::new();

        for batch in &plan {
            match batch {
                Batch::Mesh(i) => {
                    let QueueEntry::Mesh { kind, vertices, indices, color } =
                        &self.queue.entries()[*i]
                    else {
                        unreachable!("batch plan pointed a mesh batch at a line entry");
                    };
                    mesh_entries.push(MeshEntry {
                        kind: *kind,
                        vertices,
                        indices,
                        color: *color,
                    });
                }
                Batch::Lines(range) => {
                    let run = self.queue.entries()[range.clone()]
                        .iter()
                        .map(|entry| {
                            let QueueEntry::Line { vertices, polylines, color, weight, cap, join } =
                                entry
                            else {
                                unreachable!("batch plan pointed a line batch at a mesh entry");
                            };
                            LineBatch {
                                vertices,
                                polylines,
                                color: *color,
                                weight: *weight,
                                cap: *cap,
                                join: *join,
                            }
                        })
                        .collect();
                    line_runs.push(run);
                }
            }
        }

        let mesh_draws = self.mesh.prepare(ctx, &mesh_entries);
        let line_draws = self.line.prepare(ctx, &line_runs);

        self.mesh.write_matrices(ctx, self.modelview, self.projection);
        self.line.write_uniforms(ctx, self.modelview, self.projection);

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("gesso flush pass"),
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
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let mut next_mesh = 0;
            let mut next_line = 0;
            for batch in &plan {
                match batch {
                    Batch::Mesh(_) => {
                        self.mesh.record(&mut rpass, &mesh_draws[next_mesh]);
                        next_mesh += 1;
                    }
                    Batch::Lines(_) => {
                        self.line.record(&mut rpass, &line_draws[next_line]);
                        next_line += 1;
                    }
                }
            }
        }

        self.queue.clear();
    }

    /// Clears both canvas slots immediately with a throwaway encoder.
    fn clear_canvas_now(&self, ctx: &RenderCtx<'_>) {
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("gesso canvas init encoder"),
            });
        self.canvas.clear_both(&mut encoder, self.background);
        ctx.queue.submit(std::iter::once(encoder.finish()));
    }
}

/// Fixed camera for a canvas of the given logical size.
///
/// The eye sits at distance `cz = (h/2) / tan(30°)` so a 60° vertical
/// field of view spans exactly the canvas height at z = 0; the modelview
/// recenters the origin to the top-left corner and flips +Y to point
/// down.
fn view_matrices(viewport: Viewport) -> (Mat4, Mat4) {
    let w = viewport.width.max(1.0);
    let h = viewport.height.max(1.0);

    let cz = (h / 2.0) / (FRAC_PI_3 / 2.0).tan();
    let projection = Mat4::perspective(FRAC_PI_3, w / h, 0.1 * cz, 10.0 * cz);
    let modelview =
        Mat4::translation(-w / 2.0, h / 2.0, -cz) * Mat4::scaling(1.0, -1.0, 1.0);

    (modelview, projection)
}

fn physical_size(ctx: &RenderCtx<'_>) -> (u32, u32) {
    let w = (ctx.viewport.width * ctx.pixel_density).round().max(1.0) as u32;
    let h = (ctx.viewport.height * ctx.pixel_density).round().max(1.0) as u32;
    (w, h)
}

fn bake(vertices: &[Vec3], matrix: Mat4) -> Vec<Vec3> {
    vertices.iter().map(|&v| matrix.transform_point(v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_maps_canvas_corners_to_screen_edges() {
        let vp = Viewport::new(640.0, 480.0);
        let (mv, proj) = view_matrices(vp);

        // Project a canvas point by hand: modelview, then projection,
        // then perspective divide.
        let project = |p: Vec3| -> (f32, f32) {
            let eye = mv.transform_point(p);
            let m = proj.0;
            let x = m[0][0] * eye.x + m[0][1] * eye.y + m[0][2] * eye.z + m[0][3];
            let y = m[1][0] * eye.x + m[1][1] * eye.y + m[1][2] * eye.z + m[1][3];
            let w = m[3][0] * eye.x + m[3][1] * eye.y + m[3][2] * eye.z + m[3][3];
            (x / w, y / w)
        };

        // Top-left corner lands at NDC (-1, +1), bottom-right at (+1, -1).
        let (x, y) = project(Vec3::xy(0.0, 0.0));
        assert!((x + 1.0).abs() < 1e-3 && (y - 1.0).abs() < 1e-3, "got ({x}, {y})");

        let (x, y) = project(Vec3::xy(640.0, 480.0));
        assert!((x - 1.0).abs() < 1e-3 && (y + 1.0).abs() < 1e-3, "got ({x}, {y})");

        // Canvas center projects to the NDC origin.
        let (x, y) = project(Vec3::xy(320.0, 240.0));
        assert!(x.abs() < 1e-3 && y.abs() < 1e-3, "got ({x}, {y})");
    }
}
