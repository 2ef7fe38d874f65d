use crate::coords::{Mat4, Vec3};
use crate::paint::{Color, StrokeCap, StrokeJoin};

use super::{ArcMode, ShapeKind};

/// A drawable shape: geometry plus style plus its own transform.
///
/// Ownership: the shape is borrowed by `Renderer2D::render`, which bakes
/// the current view transform and the shape's own matrix into the
/// emitted vertices at that moment. Mutating either afterwards never
/// affects geometry already queued.
#[derive(Debug, Clone)]
pub struct Shape {
    pub kind: ShapeKind,
    pub vertices: Vec<Vec3>,
    /// Additional contour rings (holes) for [`ShapeKind::Polygon`].
    pub contours: Vec<Vec<Vec3>>,
    /// Interior color; `None` disables fill entirely.
    pub fill: Option<Color>,
    /// Outline color; `None` disables stroke entirely.
    pub stroke: Option<Color>,
    /// Stroke weight in canvas pixels. Must be >= 0.
    pub stroke_weight: f32,
    pub stroke_cap: StrokeCap,
    pub stroke_join: StrokeJoin,
    /// Transform owned by the shape, applied before the renderer's
    /// current transform.
    pub transform: Mat4,
    /// Arc mode; only meaningful when `kind == ShapeKind::Arc`.
    /// `None` on an arc selects the default (rim-only stroke) mode.
    pub arc_mode: Option<ArcMode>,
}

impl Shape {
    /// Creates a shape with the library's default style: white fill,
    /// black hairline stroke, round caps, miter joins.
    pub fn new(kind: ShapeKind, vertices: Vec<Vec3>) -> Self {
        Self {
            kind,
            vertices,
            contours: Vec::new(),
            fill: Some(Color::WHITE),
            stroke: Some(Color::BLACK),
            stroke_weight: 1.0,
            stroke_cap: StrokeCap::default(),
            stroke_join: StrokeJoin::default(),
            transform: Mat4::identity(),
            arc_mode: None,
        }
    }

    /// Convenience for flat geometry given as (x, y) pairs.
    pub fn from_xy(kind: ShapeKind, points: &[(f32, f32)]) -> Self {
        Self::new(kind, points.iter().map(|&(x, y)| Vec3::xy(x, y)).collect())
    }

    // ── style builders ────────────────────────────────────────────────

    pub fn fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn no_fill(mut self) -> Self {
        self.fill = None;
        self
    }

    pub fn stroke(mut self, color: Color) -> Self {
        self.stroke = Some(color);
        self
    }

    pub fn no_stroke(mut self) -> Self {
        self.stroke = None;
        self
    }

    pub fn stroke_weight(mut self, weight: f32) -> Self {
        debug_assert!(weight >= 0.0, "stroke weight must be >= 0");
        self.stroke_weight = weight.max(0.0);
        self
    }

    pub fn stroke_cap(mut self, cap: StrokeCap) -> Self {
        self.stroke_cap = cap;
        self
    }

    pub fn stroke_join(mut self, join: StrokeJoin) -> Self {
        self.stroke_join = join;
        self
    }

    pub fn transform(mut self, matrix: Mat4) -> Self {
        self.transform = matrix;
        self
    }

    /// Adds a hole ring to a [`ShapeKind::Polygon`] shape.
    pub fn contour(mut self, ring: Vec<Vec3>) -> Self {
        debug_assert!(
            self.kind == ShapeKind::Polygon,
            "contours are only meaningful on Polygon shapes"
        );
        self.contours.push(ring);
        self
    }
}
