//! Shared GPU types and utilities used by all renderers.

use bytemuck::{Pod, Zeroable};

use crate::coords::Mat4;

// ── blend ─────────────────────────────────────────────────────────────

/// Classic straight-alpha blending (`src_alpha / one_minus_src_alpha`),
/// matching the straight-alpha [`Color`](crate::paint::Color) model.
pub(super) fn alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── matrix uniform ────────────────────────────────────────────────────

/// Modelview + projection pair shared by the mesh and texture programs.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct MatrixUniform {
    pub modelview: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl MatrixUniform {
    pub(super) fn new(modelview: Mat4, projection: Mat4) -> Self {
        Self {
            modelview: modelview.to_gpu(),
            projection: projection.to_gpu(),
        }
    }
}

/// `wgpu` minimum binding size for a uniform type.
///
/// Centralising this avoids `.unwrap()` at each renderer's
/// pipeline-creation site; uniform structs are never zero-sized.
pub(super) fn ubo_min_binding_size<T>() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<T>() as u64)
        .expect("uniform structs have non-zero size by construction")
}

/// Bind-group-layout entry for a vertex-stage uniform buffer.
pub(super) fn uniform_bgl_entry<T>(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: Some(ubo_min_binding_size::<T>()),
        },
        count: None,
    }
}

// ── growable buffers ──────────────────────────────────────────────────

/// Ensures `buffer` can hold `required` elements of `stride` bytes,
/// recreating it with power-of-two capacity growth when it cannot.
///
/// Returns true when the buffer was (re)created, which invalidates any
/// bind groups referencing it.
pub(super) fn ensure_buffer_capacity(
    device: &wgpu::Device,
    buffer: &mut Option<wgpu::Buffer>,
    capacity: &mut usize,
    required: usize,
    stride: usize,
    usage: wgpu::BufferUsages,
    label: &str,
) -> bool {
    if required <= *capacity && buffer.is_some() {
        return false;
    }

    let new_cap = required.next_power_of_two().max(64);
    *buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (new_cap * stride) as u64,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    }));
    *capacity = new_cap;
    true
}
