/// Shape-type tag.
///
/// Extending the renderer:
/// - add a variant here
/// - handle it in `geometry::classify` and `geometry::borders`
///
/// Both sites match exhaustively (no `_` arm), so a new variant fails to
/// compile until every boundary handles it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShapeKind {
    Points,
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
    Quads,
    QuadStrip,
    /// General polygon (possibly concave, self-intersecting, or holed);
    /// filled through the tessellator bridge.
    Polygon,
    /// Ellipse arc. Fill/border topology depends on the shape's
    /// [`ArcMode`]; an unset mode behaves like a fan with an open rim.
    Arc,
}

/// Arc rendering mode.
///
/// `None` (no explicit mode) fills like a pie wedge but strokes only the
/// rim, matching the conventional creative-coding default.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ArcMode {
    /// Rim only, no closing edge; fill tessellates the open ring.
    Open,
    /// Rim closed by a straight chord.
    Chord,
    /// Wedge including the center; stroke closes back to the center.
    Pie,
}
