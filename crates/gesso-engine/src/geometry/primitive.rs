use crate::coords::Vec3;

/// GPU-drawable mesh topology.
///
/// `TriangleFan` is kept abstract here even though wgpu has no native
/// fan topology; the mesh renderer lowers fans to triangle lists at
/// upload time, the same way quad strips are relabelled as triangle
/// strips during classification.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MeshKind {
    Points,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// A filled (or point-cloud) primitive: topology + vertices + indices.
///
/// Produced transiently per shape per frame; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPrimitive {
    pub kind: MeshKind,
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl MeshPrimitive {
    /// Primitive reusing the vertex order as a sequential index buffer.
    pub fn sequential(kind: MeshKind, vertices: Vec<Vec3>) -> Self {
        let indices = (0..vertices.len() as u32).collect();
        Self { kind, vertices, indices }
    }
}

/// An outline primitive: vertices plus one or more index chains, each
/// chain describing a connected polyline.
///
/// Edge lists (e.g. triangle borders) are represented as many two-index
/// chains; strips of connected segments as one long chain.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePrimitive {
    pub vertices: Vec<Vec3>,
    pub polylines: Vec<Vec<u32>>,
}

impl LinePrimitive {
    /// Single polyline chaining all vertices in order.
    pub fn chain(vertices: Vec<Vec3>) -> Self {
        let n = vertices.len() as u32;
        Self { vertices, polylines: vec![(0..n).collect()] }
    }

    /// One two-index chain per `(start, end)` edge.
    pub fn edges(vertices: Vec<Vec3>, pairs: Vec<(u32, u32)>) -> Self {
        Self {
            vertices,
            polylines: pairs.into_iter().map(|(s, e)| vec![s, e]).collect(),
        }
    }

    /// Total number of drawable segments across all chains.
    pub fn segment_count(&self) -> usize {
        self.polylines.iter().map(|p| p.len().saturating_sub(1)).sum()
    }
}

/// Output of shape classification: either a fillable mesh or an outline.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPrimitive {
    Mesh(MeshPrimitive),
    Line(LinePrimitive),
}
