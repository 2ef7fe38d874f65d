use crate::shape::{ArcMode, Shape, ShapeKind};

use super::primitive::{MeshKind, MeshPrimitive};
use super::tess::Tessellator;
use super::GeometryError;

/// Validates the shape's vertex-count invariants.
///
/// This runs before any other geometry work: a failure here must leave
/// the renderer untouched. Families and their minimums:
/// - triangle family (incl. fan-backed arcs): 3
/// - line family: 2
/// - quad family: 4
/// - `Triangles` additionally requires a multiple of 3, `Quads` of 4
pub fn validate(shape: &Shape) -> Result<(), GeometryError> {
    let n = shape.vertices.len();
    let kind = shape.kind;

    let min = match kind {
        ShapeKind::Triangles | ShapeKind::TriangleStrip | ShapeKind::TriangleFan => Some(3),
        ShapeKind::Lines | ShapeKind::LineStrip => Some(2),
        ShapeKind::Quads | ShapeKind::QuadStrip => Some(4),
        // Fan-backed arcs (default and pie modes) carry a center vertex
        // plus at least two rim points.
        ShapeKind::Arc => match shape.arc_mode {
            None | Some(ArcMode::Pie) => Some(3),
            Some(ArcMode::Open) | Some(ArcMode::Chord) => None,
        },
        ShapeKind::Points | ShapeKind::Polygon => None,
    };

    if let Some(min) = min {
        if n < min {
            return Err(GeometryError::TooFewVertices { kind, min, got: n });
        }
    }

    let multiple = match kind {
        ShapeKind::Triangles => Some(3),
        ShapeKind::Quads => Some(4),
        _ => None,
    };

    if let Some(multiple) = multiple {
        if n % multiple != 0 {
            return Err(GeometryError::WrongVertexMultiple { kind, multiple, got: n });
        }
    }

    Ok(())
}

/// Produces the filled-interior mesh primitives for a shape.
///
/// Kinds with no fillable interior (points, line families) produce
/// nothing; their geometry reaches the GPU through the points or border
/// paths instead.
pub fn meshes(
    shape: &Shape,
    tess: &mut dyn Tessellator,
) -> Result<Vec<MeshPrimitive>, GeometryError> {
    let prims = match shape.kind {
        ShapeKind::Triangles => {
            vec![MeshPrimitive::sequential(MeshKind::Triangles, shape.vertices.clone())]
        }
        ShapeKind::TriangleStrip => {
            vec![MeshPrimitive::sequential(MeshKind::TriangleStrip, shape.vertices.clone())]
        }
        ShapeKind::TriangleFan => {
            vec![MeshPrimitive::sequential(MeshKind::TriangleFan, shape.vertices.clone())]
        }
        // wgpu (like most modern backends) has no quad-strip topology;
        // the index order is identical, only the label changes.
        ShapeKind::QuadStrip => {
            vec![MeshPrimitive::sequential(MeshKind::TriangleStrip, shape.vertices.clone())]
        }
        ShapeKind::Quads => vec![quads_to_triangles(shape)],
        ShapeKind::Polygon => tess.tessellate(&shape.vertices, &shape.contours)?,
        ShapeKind::Arc => match shape.arc_mode {
            // Center-first vertex layout; fills as a fan wedge.
            None | Some(ArcMode::Pie) => {
                vec![MeshPrimitive::sequential(MeshKind::TriangleFan, shape.vertices.clone())]
            }
            // Rim-only layout; the interior may be concave, so it goes
            // through the tessellator like any polygon.
            Some(ArcMode::Open) | Some(ArcMode::Chord) => {
                tess.tessellate(&shape.vertices, &shape.contours)?
            }
        },
        ShapeKind::Points | ShapeKind::Lines | ShapeKind::LineStrip => Vec::new(),
    };

    Ok(prims)
}

/// Splits each 4-vertex quad into two triangles with the standard
/// `(0, 1, 2, 0, 2, 3)` fan, offset per quad.
fn quads_to_triangles(shape: &Shape) -> MeshPrimitive {
    let n_quads = shape.vertices.len() / 4;
    let mut indices = Vec::with_capacity(n_quads * 6);
    for q in 0..n_quads as u32 {
        let base = q * 4;
        for corner in [0, 1, 2, 0, 2, 3] {
            indices.push(base + corner);
        }
    }
    MeshPrimitive {
        kind: MeshKind::Triangles,
        vertices: shape.vertices.clone(),
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec3;
    use crate::geometry::tess::LyonTessellator;

    fn verts(n: usize) -> Vec<Vec3> {
        (0..n).map(|i| Vec3::xy(i as f32, (i * i) as f32)).collect()
    }

    fn shape(kind: ShapeKind, n: usize) -> Shape {
        Shape::new(kind, verts(n))
    }

    // ── validate ──────────────────────────────────────────────────────

    #[test]
    fn triangle_family_needs_three_vertices() {
        for kind in [ShapeKind::Triangles, ShapeKind::TriangleStrip, ShapeKind::TriangleFan] {
            let err = validate(&shape(kind, 2)).unwrap_err();
            assert!(matches!(err, GeometryError::TooFewVertices { min: 3, got: 2, .. }));
            assert!(validate(&shape(kind, 3)).is_ok());
        }
    }

    #[test]
    fn line_family_needs_two_vertices() {
        for kind in [ShapeKind::Lines, ShapeKind::LineStrip] {
            let err = validate(&shape(kind, 1)).unwrap_err();
            assert!(matches!(err, GeometryError::TooFewVertices { min: 2, got: 1, .. }));
            assert!(validate(&shape(kind, 2)).is_ok());
        }
    }

    #[test]
    fn quad_family_needs_four_vertices() {
        for kind in [ShapeKind::Quads, ShapeKind::QuadStrip] {
            let err = validate(&shape(kind, 3)).unwrap_err();
            assert!(matches!(err, GeometryError::TooFewVertices { min: 4, got: 3, .. }));
            assert!(validate(&shape(kind, 4)).is_ok());
        }
    }

    #[test]
    fn triangles_require_multiple_of_three() {
        let err = validate(&shape(ShapeKind::Triangles, 5)).unwrap_err();
        assert!(matches!(err, GeometryError::WrongVertexMultiple { multiple: 3, got: 5, .. }));
        assert!(validate(&shape(ShapeKind::Triangles, 6)).is_ok());
    }

    #[test]
    fn quads_require_multiple_of_four() {
        let err = validate(&shape(ShapeKind::Quads, 6)).unwrap_err();
        assert!(matches!(err, GeometryError::WrongVertexMultiple { multiple: 4, got: 6, .. }));
        assert!(validate(&shape(ShapeKind::Quads, 8)).is_ok());
    }

    #[test]
    fn points_and_polygons_have_no_minimum() {
        assert!(validate(&shape(ShapeKind::Points, 1)).is_ok());
        assert!(validate(&shape(ShapeKind::Polygon, 0)).is_ok());
    }

    // ── meshes ────────────────────────────────────────────────────────

    #[test]
    fn simple_kinds_reuse_vertex_order() {
        let mut tess = LyonTessellator::new();
        let prims = meshes(&shape(ShapeKind::TriangleFan, 5), &mut tess).unwrap();
        assert_eq!(prims.len(), 1);
        assert_eq!(prims[0].kind, MeshKind::TriangleFan);
        assert_eq!(prims[0].indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn quad_strip_is_relabelled_triangle_strip() {
        let mut tess = LyonTessellator::new();
        let prims = meshes(&shape(ShapeKind::QuadStrip, 6), &mut tess).unwrap();
        assert_eq!(prims[0].kind, MeshKind::TriangleStrip);
        assert_eq!(prims[0].indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn quads_emit_six_indices_per_quad() {
        let mut tess = LyonTessellator::new();
        for n_quads in [1usize, 2, 3] {
            let prims = meshes(&shape(ShapeKind::Quads, n_quads * 4), &mut tess).unwrap();
            assert_eq!(prims.len(), 1);
            let idx = &prims[0].indices;
            assert_eq!(idx.len(), 6 * n_quads);
            assert!(idx.iter().all(|&i| (i as usize) < n_quads * 4));
        }
    }

    #[test]
    fn single_quad_index_pattern() {
        let mut tess = LyonTessellator::new();
        let prims = meshes(&shape(ShapeKind::Quads, 4), &mut tess).unwrap();
        assert_eq!(prims[0].indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn line_kinds_produce_no_fill_meshes() {
        let mut tess = LyonTessellator::new();
        for kind in [ShapeKind::Points, ShapeKind::Lines, ShapeKind::LineStrip] {
            assert!(meshes(&shape(kind, 4), &mut tess).unwrap().is_empty());
        }
    }
}
