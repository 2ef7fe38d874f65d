/// Line-end cap style consumed by the antialiased line shader.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum StrokeCap {
    /// Stroke stops exactly at the endpoint.
    Butt,
    /// Semicircular extension past the endpoint.
    #[default]
    Round,
    /// Square extension of half the stroke weight past the endpoint.
    Square,
}

impl StrokeCap {
    /// Numeric code passed to the line shader as a vertex attribute.
    #[inline]
    pub const fn shader_code(self) -> f32 {
        match self {
            StrokeCap::Butt => 0.0,
            StrokeCap::Round => 1.0,
            StrokeCap::Square => 2.0,
        }
    }
}

/// Line-join style consumed by the antialiased line shader.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum StrokeJoin {
    #[default]
    Miter,
    Bevel,
    Round,
}

impl StrokeJoin {
    /// Numeric code passed to the line shader as a vertex attribute.
    #[inline]
    pub const fn shader_code(self) -> f32 {
        match self {
            StrokeJoin::Miter => 0.0,
            StrokeJoin::Bevel => 1.0,
            StrokeJoin::Round => 2.0,
        }
    }
}
