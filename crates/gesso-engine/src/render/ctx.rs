use crate::coords::Viewport;

/// Renderer-facing context (device/queue + target format + canvas size).
///
/// This is intentionally small and stable, and is threaded explicitly
/// through every renderer call — there is no implicit global drawing
/// context.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Canvas size in logical pixels.
    pub viewport: Viewport,
    /// Physical pixels per logical pixel.
    pub pixel_density: f32,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
        pixel_density: f32,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            viewport,
            pixel_density,
        }
    }
}

/// Target for drawing (encoder + color view).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }
}
