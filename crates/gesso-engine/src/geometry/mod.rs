//! Shape-to-primitive conversion.
//!
//! Responsibilities:
//! - vertex-count validation (always first, before any GPU-facing work)
//! - classification of filled interiors into mesh primitives
//! - border/edge generation for stroked outlines
//! - the tessellator bridge for general polygons
//! - expansion of polylines into the antialiased line mesh
//!
//! Everything here is pure CPU code; the `render` module owns buffers,
//! pipelines, and draw calls.

mod borders;
mod classify;
mod line_mesh;
mod primitive;
mod tess;

pub use borders::borders;
pub use classify::{meshes, validate};
pub use line_mesh::{build_line_mesh, LineBatch, LineVertex};
pub use primitive::{LinePrimitive, MeshKind, MeshPrimitive, RenderPrimitive};
pub use tess::{LyonTessellator, Tessellator};

use crate::shape::{Shape, ShapeKind};

/// Geometry precondition and tessellation failures.
///
/// Vertex-count violations are precondition failures: they surface
/// immediately from `Renderer2D::render` and never corrupt queue state
/// accumulated from prior calls. Tessellation failure is fatal to the
/// frame; the renderer performs no retries.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("{kind:?} needs at least {min} vertices (got {got})")]
    TooFewVertices { kind: ShapeKind, min: usize, got: usize },

    #[error("{kind:?} requires a vertex count that is a multiple of {multiple} (got {got})")]
    WrongVertexMultiple { kind: ShapeKind, multiple: usize, got: usize },

    #[error("polygon tessellation failed: {0:?}")]
    Tessellation(lyon::tessellation::TessellationError),
}

/// Everything one shape contributes to the frame, grouped by the color
/// each group is drawn with.
#[derive(Debug, Default)]
pub struct ShapePrimitives {
    /// Raw vertices of a `Points` shape, drawn as a point cloud.
    pub points: Option<MeshPrimitive>,
    /// Filled interior meshes, drawn with the shape's fill color.
    pub meshes: Vec<MeshPrimitive>,
    /// Outline chains, drawn with the shape's stroke.
    pub borders: Vec<LinePrimitive>,
}

/// Converts one shape into its render primitives.
///
/// Validation runs first and aborts the whole conversion on violation.
/// Fill and stroke groups are produced only when the corresponding color
/// is set; a shape with neither contributes nothing.
pub fn shape_primitives(
    shape: &Shape,
    tess: &mut dyn Tessellator,
) -> Result<ShapePrimitives, GeometryError> {
    validate(shape)?;

    let mut out = ShapePrimitives::default();

    if shape.kind == ShapeKind::Points {
        out.points = Some(MeshPrimitive::sequential(
            MeshKind::Points,
            shape.vertices.clone(),
        ));
    }

    if shape.fill.is_some() {
        out.meshes = meshes(shape, tess)?;
    }

    if shape.stroke.is_some() {
        out.borders = borders(shape);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec3;

    fn square(kind: ShapeKind) -> Shape {
        Shape::from_xy(kind, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
    }

    #[test]
    fn validation_failure_short_circuits() {
        let mut tess = LyonTessellator::new();
        let bad = Shape::from_xy(ShapeKind::Triangles, &[(0.0, 0.0), (1.0, 0.0)]);
        assert!(shape_primitives(&bad, &mut tess).is_err());
    }

    #[test]
    fn fill_and_stroke_gate_their_groups() {
        let mut tess = LyonTessellator::new();

        let both = shape_primitives(&square(ShapeKind::Quads), &mut tess).unwrap();
        assert_eq!(both.meshes.len(), 1);
        assert_eq!(both.borders.len(), 1);

        let fill_only = shape_primitives(&square(ShapeKind::Quads).no_stroke(), &mut tess).unwrap();
        assert_eq!(fill_only.meshes.len(), 1);
        assert!(fill_only.borders.is_empty());

        let stroke_only = shape_primitives(&square(ShapeKind::Quads).no_fill(), &mut tess).unwrap();
        assert!(stroke_only.meshes.is_empty());
        assert_eq!(stroke_only.borders.len(), 1);

        let neither =
            shape_primitives(&square(ShapeKind::Quads).no_fill().no_stroke(), &mut tess).unwrap();
        assert!(neither.meshes.is_empty() && neither.borders.is_empty() && neither.points.is_none());
    }

    #[test]
    fn points_emit_one_points_primitive_over_raw_vertices() {
        let mut tess = LyonTessellator::new();
        let shape = Shape::from_xy(ShapeKind::Points, &[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        let prims = shape_primitives(&shape, &mut tess).unwrap();

        let points = prims.points.expect("points primitive");
        assert_eq!(points.kind, MeshKind::Points);
        assert_eq!(points.vertices.len(), 3);
        assert_eq!(points.indices, vec![0, 1, 2]);
    }

    #[test]
    fn polygon_goes_through_the_tessellator() {
        let mut tess = LyonTessellator::new();
        let prims = shape_primitives(&square(ShapeKind::Polygon), &mut tess).unwrap();
        assert!(!prims.meshes.is_empty());
        assert!(prims.meshes.iter().all(|m| m.kind == MeshKind::Triangles));
    }
}
