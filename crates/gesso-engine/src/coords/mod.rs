//! Coordinate and geometry types shared across the engine.
//!
//! Canonical CPU space:
//! - Canvas pixels, origin top-left
//! - +X right, +Y down
//! - +Z toward the viewer (2D shapes normally sit at z = 0)
//!
//! The renderer converts to camera space with a fixed modelview matrix
//! (Y flip + recentering) and projects with a perspective matrix whose
//! eye distance is chosen so one canvas pixel maps to one screen pixel
//! at z = 0.

mod mat4;
mod vec3;
mod viewport;

pub use mat4::Mat4;
pub use vec3::Vec3;
pub use viewport::Viewport;
