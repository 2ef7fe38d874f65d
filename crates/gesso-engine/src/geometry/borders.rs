use crate::shape::{ArcMode, Shape, ShapeKind};

use super::primitive::LinePrimitive;

/// Derives the outline primitives for a filled shape.
///
/// Each visible boundary edge appears exactly once; internal diagonals
/// (the strip/fan/quad triangulation edges that are not part of the
/// outline) are never emitted. The index patterns mirror the mesh
/// topology of each kind:
/// - `Triangles`: 3 edges per triangle, offsets (+1, +1, -2)
/// - `TriangleStrip`: spine edges `(i, i+1)` plus cross edges `(i, i+2)`
/// - `TriangleFan`: spokes `(0, i)` plus rim edges `(i, i+1)`
/// - `Quads`: 4 edges per quad, offsets (+1, +1, +1, -3)
/// - `QuadStrip`: rung edges `(2i, 2i+1)` plus rail edges `(i, i+2)`
/// - `Lines`: consecutive pairs
/// - `LineStrip` / `Polygon`: the vertex sequence itself (and each
///   contour) as one connected chain
pub fn borders(shape: &Shape) -> Vec<LinePrimitive> {
    let n = shape.vertices.len();
    let verts = || shape.vertices.clone();

    match shape.kind {
        // Points have no outline; they reach the GPU as a points-kind
        // mesh primitive instead.
        ShapeKind::Points => Vec::new(),

        ShapeKind::Triangles => {
            let mut pairs = Vec::with_capacity(n);
            for t in 0..(n as u32) / 3 {
                let base = t * 3;
                pairs.push((base, base + 1));
                pairs.push((base + 1, base + 2));
                pairs.push((base + 2, base));
            }
            vec![LinePrimitive::edges(verts(), pairs)]
        }

        ShapeKind::TriangleStrip => {
            let mut pairs = Vec::with_capacity(2 * n);
            for i in 0..(n as u32).saturating_sub(1) {
                pairs.push((i, i + 1));
            }
            for i in 0..(n as u32).saturating_sub(2) {
                pairs.push((i, i + 2));
            }
            vec![LinePrimitive::edges(verts(), pairs)]
        }

        ShapeKind::TriangleFan => {
            let mut pairs = Vec::with_capacity(2 * n);
            for i in 1..n as u32 {
                pairs.push((0, i));
            }
            for i in 1..(n as u32).saturating_sub(1) {
                pairs.push((i, i + 1));
            }
            vec![LinePrimitive::edges(verts(), pairs)]
        }

        ShapeKind::Quads => {
            let mut pairs = Vec::with_capacity(n);
            for q in 0..(n as u32) / 4 {
                let base = q * 4;
                pairs.push((base, base + 1));
                pairs.push((base + 1, base + 2));
                pairs.push((base + 2, base + 3));
                pairs.push((base + 3, base));
            }
            vec![LinePrimitive::edges(verts(), pairs)]
        }

        ShapeKind::QuadStrip => {
            let mut pairs = Vec::with_capacity(n + n / 2);
            let mut i = 0;
            while i + 1 < n as u32 {
                pairs.push((i, i + 1));
                i += 2;
            }
            for i in 0..(n as u32).saturating_sub(2) {
                pairs.push((i, i + 2));
            }
            vec![LinePrimitive::edges(verts(), pairs)]
        }

        ShapeKind::Lines => {
            let mut pairs = Vec::with_capacity(n / 2);
            let mut i = 0;
            while i + 1 < n as u32 {
                pairs.push((i, i + 1));
                i += 2;
            }
            vec![LinePrimitive::edges(verts(), pairs)]
        }

        ShapeKind::LineStrip => vec![LinePrimitive::chain(verts())],

        ShapeKind::Polygon => {
            let mut prims = Vec::with_capacity(1 + shape.contours.len());
            prims.push(LinePrimitive::chain(verts()));
            for contour in &shape.contours {
                prims.push(LinePrimitive::chain(contour.clone()));
            }
            prims
        }

        ShapeKind::Arc => arc_borders(shape),
    }
}

/// Mode-specific arc outlines.
///
/// - `Open` / `Chord`: rim-only vertex layout, so the generic polygon
///   chain (plus contours) is the correct outline.
/// - unset mode: the chain over the rim, excluding the leading center
///   vertex.
/// - `Pie`: the full fan chain including the center, closed back to the
///   center to complete the wedge.
fn arc_borders(shape: &Shape) -> Vec<LinePrimitive> {
    let n = shape.vertices.len() as u32;

    match shape.arc_mode {
        Some(ArcMode::Open) | Some(ArcMode::Chord) => {
            let mut prims = Vec::with_capacity(1 + shape.contours.len());
            prims.push(LinePrimitive::chain(shape.vertices.clone()));
            for contour in &shape.contours {
                prims.push(LinePrimitive::chain(contour.clone()));
            }
            prims
        }
        None => {
            let rim: Vec<u32> = (1..n).collect();
            vec![LinePrimitive {
                vertices: shape.vertices.clone(),
                polylines: vec![rim],
            }]
        }
        Some(ArcMode::Pie) => {
            let mut wedge: Vec<u32> = (0..n).collect();
            wedge.push(0);
            vec![LinePrimitive {
                vertices: shape.vertices.clone(),
                polylines: vec![wedge],
            }]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec3;

    fn verts(n: usize) -> Vec<Vec3> {
        (0..n).map(|i| Vec3::xy(i as f32, 0.0)).collect()
    }

    fn shape(kind: ShapeKind, n: usize) -> Shape {
        Shape::new(kind, verts(n))
    }

    fn edge_pairs(prim: &LinePrimitive) -> Vec<(u32, u32)> {
        prim.polylines
            .iter()
            .map(|p| {
                assert_eq!(p.len(), 2, "edge chains must have exactly two indices");
                (p[0], p[1])
            })
            .collect()
    }

    // ── triangle family ───────────────────────────────────────────────

    #[test]
    fn one_triangle_yields_three_closing_edges() {
        let prims = borders(&shape(ShapeKind::Triangles, 3));
        assert_eq!(prims.len(), 1);
        assert_eq!(edge_pairs(&prims[0]), vec![(0, 1), (1, 2), (2, 0)]);
    }

    #[test]
    fn two_triangles_keep_edges_per_triangle() {
        let prims = borders(&shape(ShapeKind::Triangles, 6));
        assert_eq!(
            edge_pairs(&prims[0]),
            vec![(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]
        );
    }

    #[test]
    fn strip_emits_spine_then_cross_edges() {
        let prims = borders(&shape(ShapeKind::TriangleStrip, 4));
        assert_eq!(
            edge_pairs(&prims[0]),
            vec![(0, 1), (1, 2), (2, 3), (0, 2), (1, 3)]
        );
    }

    #[test]
    fn fan_emits_spokes_then_rim() {
        let prims = borders(&shape(ShapeKind::TriangleFan, 4));
        assert_eq!(
            edge_pairs(&prims[0]),
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (2, 3)]
        );
    }

    // ── quad family ───────────────────────────────────────────────────

    #[test]
    fn one_quad_yields_a_closed_loop() {
        let prims = borders(&shape(ShapeKind::Quads, 4));
        let pairs = edge_pairs(&prims[0]);
        assert_eq!(pairs, vec![(0, 1), (1, 2), (2, 3), (3, 0)]);

        // Every vertex appears exactly once as a start and once as an end.
        for v in 0..4u32 {
            assert_eq!(pairs.iter().filter(|&&(s, _)| s == v).count(), 1);
            assert_eq!(pairs.iter().filter(|&&(_, e)| e == v).count(), 1);
        }
    }

    #[test]
    fn quad_strip_emits_rungs_then_rails() {
        let prims = borders(&shape(ShapeKind::QuadStrip, 6));
        assert_eq!(
            edge_pairs(&prims[0]),
            vec![(0, 1), (2, 3), (4, 5), (0, 2), (1, 3), (2, 4), (3, 5)]
        );
    }

    // ── line family ───────────────────────────────────────────────────

    #[test]
    fn lines_pair_consecutive_vertices() {
        let prims = borders(&shape(ShapeKind::Lines, 6));
        assert_eq!(edge_pairs(&prims[0]), vec![(0, 1), (2, 3), (4, 5)]);
    }

    #[test]
    fn line_strip_is_one_chain() {
        let prims = borders(&shape(ShapeKind::LineStrip, 5));
        assert_eq!(prims[0].polylines, vec![vec![0, 1, 2, 3, 4]]);
    }

    // ── polygon ───────────────────────────────────────────────────────

    #[test]
    fn polygon_chains_outer_ring_and_each_contour() {
        let mut s = shape(ShapeKind::Polygon, 5);
        s.contours.push(verts(3));
        let prims = borders(&s);
        assert_eq!(prims.len(), 2);
        assert_eq!(prims[0].polylines, vec![vec![0, 1, 2, 3, 4]]);
        assert_eq!(prims[1].polylines, vec![vec![0, 1, 2]]);
    }

    // ── arcs ──────────────────────────────────────────────────────────

    fn arc_shape(mode: Option<ArcMode>, n: usize) -> Shape {
        let mut s = shape(ShapeKind::Arc, n);
        s.arc_mode = mode;
        s
    }

    #[test]
    fn default_arc_strokes_rim_without_center() {
        let prims = borders(&arc_shape(None, 5));
        assert_eq!(prims[0].polylines, vec![vec![1, 2, 3, 4]]);
    }

    #[test]
    fn pie_arc_closes_back_to_center() {
        let prims = borders(&arc_shape(Some(ArcMode::Pie), 4));
        assert_eq!(prims[0].polylines, vec![vec![0, 1, 2, 3, 0]]);
    }

    #[test]
    fn open_and_chord_arcs_use_the_generic_chain() {
        for mode in [ArcMode::Open, ArcMode::Chord] {
            let prims = borders(&arc_shape(Some(mode), 4));
            assert_eq!(prims[0].polylines, vec![vec![0, 1, 2, 3]]);
        }
    }

    #[test]
    fn no_kind_emits_an_interior_diagonal_twice() {
        // Each edge (as an unordered pair) appears at most once.
        for (kind, n) in [
            (ShapeKind::Triangles, 6),
            (ShapeKind::TriangleStrip, 5),
            (ShapeKind::TriangleFan, 5),
            (ShapeKind::Quads, 8),
            (ShapeKind::QuadStrip, 6),
            (ShapeKind::Lines, 4),
        ] {
            let prims = borders(&shape(kind, n));
            let mut seen = std::collections::HashSet::new();
            for (s, e) in edge_pairs(&prims[0]) {
                let key = (s.min(e), s.max(e));
                assert!(seen.insert(key), "duplicate edge {key:?} for {kind:?}");
            }
        }
    }
}
