//! GPU rendering subsystem.
//!
//! Renderers consume the per-frame draw queue and issue GPU commands via
//! wgpu. Each renderer owns its GPU resources (pipeline, buffers) and
//! initializes them lazily on first use.
//!
//! Convention:
//! - CPU geometry is in canvas pixels (top-left origin, +Y down).
//! - Shaders convert to clip space with modelview/projection uniforms
//!   uploaded from [`Renderer2D`]'s matrices.

mod common;
mod ctx;
mod image;
mod line;
mod mesh;
mod pingpong;
mod renderer2d;

pub use ctx::{RenderCtx, RenderTarget};
pub use image::TextureImage;
pub use pingpong::FramebufferPair;
pub use renderer2d::Renderer2D;
