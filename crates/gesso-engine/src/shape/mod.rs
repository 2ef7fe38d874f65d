//! Shape description types.
//!
//! Responsibilities:
//! - the closed set of shape kinds the classifier understands
//! - the `Shape` value handed to `Renderer2D::render`
//! - arc vertex synthesis (center-plus-ring fans, chord/open rings)
//!
//! Shapes are plain data: geometry generation happens in `geometry`,
//! GPU work in `render`.

mod arc;
mod kind;
#[allow(clippy::module_inception)]
mod shape;

pub use kind::{ArcMode, ShapeKind};
pub use shape::Shape;
