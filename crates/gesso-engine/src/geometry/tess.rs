use lyon::math::point;
use lyon::path::{FillRule, Path};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers,
};

use crate::coords::Vec3;

use super::primitive::{MeshKind, MeshPrimitive};
use super::GeometryError;

/// Polygon tessellation capability.
///
/// The bridge owns the sequencing contract only — outer ring first, then
/// one begin/end per hole ring — never the tessellation algorithm. The
/// engine behind it resolves self-intersections and holes into a
/// triangulated mesh, which is returned unchanged.
pub trait Tessellator {
    fn tessellate(
        &mut self,
        outer: &[Vec3],
        holes: &[Vec<Vec3>],
    ) -> Result<Vec<MeshPrimitive>, GeometryError>;
}

/// lyon-backed tessellator.
///
/// Uses even-odd winding so hole rings are subtracted by parity,
/// matching the classic GLU tessellator default. Tessellation happens on
/// the z = 0 canvas plane; z components of the input rings are dropped.
pub struct LyonTessellator {
    fill: FillTessellator,
}

impl LyonTessellator {
    pub fn new() -> Self {
        Self { fill: FillTessellator::new() }
    }
}

impl Default for LyonTessellator {
    fn default() -> Self {
        Self::new()
    }
}

impl Tessellator for LyonTessellator {
    fn tessellate(
        &mut self,
        outer: &[Vec3],
        holes: &[Vec<Vec3>],
    ) -> Result<Vec<MeshPrimitive>, GeometryError> {
        if outer.len() < 3 {
            return Ok(Vec::new());
        }

        let mut builder = Path::builder();
        add_ring(&mut builder, outer);
        for ring in holes {
            if ring.len() >= 3 {
                add_ring(&mut builder, ring);
            }
        }
        let path = builder.build();

        let mut buffers: VertexBuffers<Vec3, u32> = VertexBuffers::new();
        let options = FillOptions::default().with_fill_rule(FillRule::EvenOdd);

        self.fill
            .tessellate_path(
                &path,
                &options,
                &mut BuffersBuilder::new(&mut buffers, |v: FillVertex| {
                    let p = v.position();
                    Vec3::xy(p.x, p.y)
                }),
            )
            .map_err(GeometryError::Tessellation)?;

        if buffers.indices.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![MeshPrimitive {
            kind: MeshKind::Triangles,
            vertices: buffers.vertices,
            indices: buffers.indices,
        }])
    }
}

/// One begin/end contour pair: the ring is closed explicitly so the
/// engine sees every boundary edge.
fn add_ring(builder: &mut lyon::path::path::Builder, ring: &[Vec3]) {
    builder.begin(point(ring[0].x, ring[0].y));
    for v in &ring[1..] {
        builder.line_to(point(v.x, v.y));
    }
    builder.end(true);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f32, f32)]) -> Vec<Vec3> {
        points.iter().map(|&(x, y)| Vec3::xy(x, y)).collect()
    }

    #[test]
    fn convex_pentagon_round_trips_as_triangles() {
        let outer = ring(&[(0.0, 0.0), (4.0, 0.0), (5.0, 3.0), (2.0, 5.0), (-1.0, 3.0)]);
        let mut tess = LyonTessellator::new();
        let prims = tess.tessellate(&outer, &[]).unwrap();

        assert!(!prims.is_empty());
        for prim in &prims {
            assert_eq!(prim.kind, MeshKind::Triangles);
            assert_eq!(prim.indices.len() % 3, 0);

            // A convex ring needs no Steiner points: every output vertex
            // must coincide with an input vertex.
            for v in &prim.vertices {
                assert!(
                    outer.iter().any(|o| (o.x - v.x).abs() < 1e-4 && (o.y - v.y).abs() < 1e-4),
                    "unexpected vertex {v:?}"
                );
            }
        }

        // A pentagon triangulates into exactly 3 triangles.
        let total_indices: usize = prims.iter().map(|p| p.indices.len()).sum();
        assert_eq!(total_indices, 9);
    }

    #[test]
    fn hole_ring_reduces_filled_area() {
        let outer = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let hole = ring(&[(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)]);

        let mut tess = LyonTessellator::new();
        let solid = tess.tessellate(&outer, &[]).unwrap();
        let holed = tess.tessellate(&outer, &[hole]).unwrap();

        let area = |prims: &[MeshPrimitive]| -> f32 {
            prims
                .iter()
                .map(|p| {
                    p.indices
                        .chunks(3)
                        .map(|t| {
                            let a = p.vertices[t[0] as usize];
                            let b = p.vertices[t[1] as usize];
                            let c = p.vertices[t[2] as usize];
                            ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs() / 2.0
                        })
                        .sum::<f32>()
                })
                .sum()
        };

        assert!((area(&solid) - 100.0).abs() < 1e-3);
        assert!((area(&holed) - 96.0).abs() < 1e-3);
    }

    #[test]
    fn degenerate_ring_yields_nothing() {
        let mut tess = LyonTessellator::new();
        assert!(tess.tessellate(&ring(&[(0.0, 0.0), (1.0, 1.0)]), &[]).unwrap().is_empty());
        assert!(tess.tessellate(&[], &[]).unwrap().is_empty());
    }
}
