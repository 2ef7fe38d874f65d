//! Paint model shared between shapes and renderers.
//!
//! Scope:
//! - color representation (straight-alpha, normalized channels)
//! - stroke styling (weight lives on the shape; cap/join here)
//!
//! Geometry types remain in `coords`.

mod color;
mod stroke;

pub use color::Color;
pub use stroke::{StrokeCap, StrokeJoin};
