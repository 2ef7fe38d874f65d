use bytemuck::{Pod, Zeroable};

use crate::coords::Vec3;
use crate::paint::{Color, StrokeCap, StrokeJoin};

/// One output vertex of the antialiased line mesh.
///
/// Six of these cover each polyline segment as two screen-space
/// triangles. Width, join, and cap math is resolved per-vertex by the
/// line shader; this struct only carries correct topology and
/// neighbor-position bookkeeping.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct LineVertex {
    /// Anchor position: the left (start) vertex of the segment,
    /// identical on all six vertices.
    pub pos: [f32; 3],
    /// Previous chain position; clamped to `curr` at the chain start.
    pub prev: [f32; 3],
    /// The vertex this corner extrudes from.
    pub curr: [f32; 3],
    /// Next chain position; clamped to `curr` at the chain end.
    pub next: [f32; 3],
    /// +1 above / -1 below the segment axis.
    pub marker: f32,
    /// +1 at the segment start / -1 at the segment end.
    pub side: f32,
    /// Stroke weight in canvas pixels.
    pub width: f32,
    pub cap: f32,
    pub join: f32,
    pub color: [f32; 4],
}

impl LineVertex {
    const ATTRS: [wgpu::VertexAttribute; 10] = wgpu::vertex_attr_array![
        0 => Float32x3, // pos
        1 => Float32x3, // prev
        2 => Float32x3, // curr
        3 => Float32x3, // next
        4 => Float32,   // marker
        5 => Float32,   // side
        6 => Float32,   // width
        7 => Float32,   // cap
        8 => Float32,   // join
        9 => Float32x4  // color
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Borrowed view of one queued line entry.
pub struct LineBatch<'a> {
    pub vertices: &'a [Vec3],
    pub polylines: &'a [Vec<u32>],
    pub color: Color,
    pub weight: f32,
    pub cap: StrokeCap,
    pub join: StrokeJoin,
}

/// Corner order for the two triangles covering a segment quad:
/// start-up, start-down, end-down / start-down, end-up, end-down.
const CORNER: [usize; 6] = [0, 0, 1, 0, 1, 1];
const MARKER: [f32; 6] = [1.0, -1.0, -1.0, -1.0, 1.0, -1.0];
const SIDE: [f32; 6] = [1.0, 1.0, -1.0, 1.0, -1.0, -1.0];

/// Expands queued polylines into the 6-vertices-per-segment mesh the
/// line shader consumes.
///
/// No index buffer is shared: the duplication trades memory for keeping
/// every segment's miter/cap inputs independent.
pub fn build_line_mesh(batches: &[LineBatch<'_>]) -> Vec<LineVertex> {
    let segment_count: usize = batches
        .iter()
        .flat_map(|b| b.polylines.iter())
        .map(|p| p.len().saturating_sub(1))
        .sum();
    let mut out = Vec::with_capacity(segment_count * 6);

    for batch in batches {
        let color = batch.color.to_array();
        let cap = batch.cap.shader_code();
        let join = batch.join.shader_code();

        for chain in batch.polylines {
            if chain.len() < 2 {
                continue;
            }

            for i in 0..chain.len() - 1 {
                let anchor = batch.vertices[chain[i] as usize].to_array();

                for corner in 0..6 {
                    let k = i + CORNER[corner];

                    // Reuse the nearest existing chain vertex instead of
                    // extrapolating past the ends.
                    let prev = if k > 0 { chain[k - 1] } else { chain[k] };
                    let next = if k + 1 < chain.len() { chain[k + 1] } else { chain[k] };

                    out.push(LineVertex {
                        pos: anchor,
                        prev: batch.vertices[prev as usize].to_array(),
                        curr: batch.vertices[chain[k] as usize].to_array(),
                        next: batch.vertices[next as usize].to_array(),
                        marker: MARKER[corner],
                        side: SIDE[corner],
                        width: batch.weight,
                        cap,
                        join,
                        color,
                    });
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch<'a>(vertices: &'a [Vec3], polylines: &'a [Vec<u32>]) -> LineBatch<'a> {
        LineBatch {
            vertices,
            polylines,
            color: Color::rgba(0.2, 0.4, 0.6, 0.8),
            weight: 3.0,
            cap: StrokeCap::Round,
            join: StrokeJoin::Miter,
        }
    }

    // ── single segment ────────────────────────────────────────────────

    #[test]
    fn one_segment_expands_to_six_vertices() {
        let verts = [Vec3::xy(0.0, 0.0), Vec3::xy(10.0, 0.0)];
        let chains = [vec![0u32, 1]];
        let mesh = build_line_mesh(&[batch(&verts, &chains)]);

        assert_eq!(mesh.len(), 6);
        assert_eq!(
            mesh.iter().map(|v| v.marker).collect::<Vec<_>>(),
            vec![1.0, -1.0, -1.0, -1.0, 1.0, -1.0]
        );
        assert_eq!(
            mesh.iter().map(|v| v.side).collect::<Vec<_>>(),
            vec![1.0, 1.0, -1.0, 1.0, -1.0, -1.0]
        );
    }

    #[test]
    fn endpoints_clamp_prev_and_next() {
        let verts = [Vec3::xy(0.0, 0.0), Vec3::xy(10.0, 0.0)];
        let chains = [vec![0u32, 1]];
        let mesh = build_line_mesh(&[batch(&verts, &chains)]);

        for v in &mesh {
            if v.curr == [0.0, 0.0, 0.0] {
                // Chain start: no predecessor, prev falls back to curr.
                assert_eq!(v.prev, v.curr);
                assert_eq!(v.next, [10.0, 0.0, 0.0]);
            } else {
                // Chain end: no successor, next falls back to curr.
                assert_eq!(v.next, v.curr);
                assert_eq!(v.prev, [0.0, 0.0, 0.0]);
            }
        }
    }

    #[test]
    fn anchor_is_the_segment_start_for_all_six() {
        let verts = [Vec3::xy(1.0, 2.0), Vec3::xy(3.0, 4.0)];
        let chains = [vec![0u32, 1]];
        let mesh = build_line_mesh(&[batch(&verts, &chains)]);
        assert!(mesh.iter().all(|v| v.pos == [1.0, 2.0, 0.0]));
    }

    #[test]
    fn stroke_attributes_broadcast_to_all_six() {
        let verts = [Vec3::xy(0.0, 0.0), Vec3::xy(1.0, 0.0)];
        let chains = [vec![0u32, 1]];
        let mesh = build_line_mesh(&[batch(&verts, &chains)]);

        for v in &mesh {
            assert_eq!(v.width, 3.0);
            assert_eq!(v.cap, StrokeCap::Round.shader_code());
            assert_eq!(v.join, StrokeJoin::Miter.shader_code());
            assert_eq!(v.color, [0.2, 0.4, 0.6, 0.8]);
        }
    }

    // ── chains and interior neighbors ─────────────────────────────────

    #[test]
    fn chain_of_three_yields_two_segments() {
        let verts = [Vec3::xy(0.0, 0.0), Vec3::xy(1.0, 0.0), Vec3::xy(2.0, 0.0)];
        let chains = [vec![0u32, 1, 2]];
        let mesh = build_line_mesh(&[batch(&verts, &chains)]);
        assert_eq!(mesh.len(), 12);

        // Interior vertex (index 1) sees its true neighbors from both
        // segments that touch it.
        let middle: Vec<_> = mesh.iter().filter(|v| v.curr == [1.0, 0.0, 0.0]).collect();
        assert!(!middle.is_empty());
        for v in middle {
            assert_eq!(v.prev, [0.0, 0.0, 0.0]);
            assert_eq!(v.next, [2.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn separate_chains_do_not_share_neighbors() {
        // Two disjoint edges, as border generation produces them.
        let verts = [
            Vec3::xy(0.0, 0.0),
            Vec3::xy(1.0, 0.0),
            Vec3::xy(5.0, 5.0),
            Vec3::xy(6.0, 5.0),
        ];
        let chains = [vec![0u32, 1], vec![2u32, 3]];
        let mesh = build_line_mesh(&[batch(&verts, &chains)]);
        assert_eq!(mesh.len(), 12);

        // The second chain's start must clamp to itself, not peek into
        // the first chain.
        let second_start: Vec<_> = mesh.iter().filter(|v| v.curr == [5.0, 5.0, 0.0]).collect();
        for v in second_start {
            assert_eq!(v.prev, v.curr);
        }
    }

    #[test]
    fn empty_and_single_vertex_chains_are_skipped() {
        let verts = [Vec3::xy(0.0, 0.0)];
        let chains = [vec![], vec![0u32]];
        assert!(build_line_mesh(&[batch(&verts, &chains)]).is_empty());
    }
}
