use crate::paint::Color;

/// Which of the two slots currently plays the "front" role.
///
/// Front is the persistent canvas from the previous cycle (read); back
/// is the current write target. Swapping relabels the roles — a single
/// bit flip, never a texture copy.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct PingPongState {
    front_is_a: bool,
}

impl PingPongState {
    const fn new() -> Self {
        Self { front_is_a: true }
    }

    #[inline]
    fn front(self) -> usize {
        if self.front_is_a { 0 } else { 1 }
    }

    #[inline]
    fn back(self) -> usize {
        if self.front_is_a { 1 } else { 0 }
    }

    #[inline]
    fn swap(&mut self) {
        self.front_is_a = !self.front_is_a;
    }
}

struct Slot {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// Two offscreen color targets plus the full-screen blit used to carry
/// the persistent canvas across frames.
///
/// Invariant: during drawing, exactly one slot (back) is bound as the
/// write target; the other (front) is only ever sampled.
pub struct FramebufferPair {
    slots: [Slot; 2],
    state: PingPongState,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,

    blit_pipeline: wgpu::RenderPipeline,
    blit_bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
}

impl FramebufferPair {
    /// Creates both color targets at the given physical size.
    ///
    /// The caller should clear both slots (e.g. via
    /// [`clear_both`](Self::clear_both)) before the first frame so stale
    /// memory never shows through.
    pub fn new(device: &wgpu::Device, width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        let slots = [
            create_slot(device, width, height, format, "gesso canvas slot a"),
            create_slot(device, width, height, format, "gesso canvas slot b"),
        ];

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("gesso blit sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("gesso blit shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/blit.wgsl").into()),
        });

        let blit_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("gesso blit bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("gesso blit pipeline layout"),
            bind_group_layouts: &[&blit_bgl],
            immediate_size: 0,
        });

        let blit_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("gesso blit pipeline"),
            layout: Some(&layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    // The source already carries final colors; blending
                    // here would double-apply alpha.
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            slots,
            state: PingPongState::new(),
            width,
            height,
            format,
            blit_pipeline,
            blit_bgl,
            sampler,
        }
    }

    /// Recreates both targets at a new size. Contents are lost; the
    /// caller is expected to clear afterwards.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        self.slots = [
            create_slot(device, width, height, self.format, "gesso canvas slot a"),
            create_slot(device, width, height, self.format, "gesso canvas slot b"),
        ];
    }

    /// Persistent canvas from the previous cycle (sample only).
    pub fn front_view(&self) -> &wgpu::TextureView {
        &self.slots[self.state.front()].view
    }

    /// Current write target.
    pub fn back_view(&self) -> &wgpu::TextureView {
        &self.slots[self.state.back()].view
    }

    /// Exchanges the front/back roles. O(1); no texture data moves.
    pub fn swap(&mut self) {
        self.state.swap();
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Draws `source` as a full-screen quad into `dest`.
    ///
    /// `clear` selects the load op: `Some(color)` clears first (used when
    /// presenting to the visible target), `None` draws over the existing
    /// contents (used when seeding back with front).
    pub fn blit(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        source: &wgpu::TextureView,
        dest: &wgpu::TextureView,
        clear: Option<Color>,
    ) {
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("gesso blit bind group"),
            layout: &self.blit_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(source),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let load = match clear {
            Some(c) => wgpu::LoadOp::Clear(wgpu::Color {
                r: c.r as f64,
                g: c.g as f64,
                b: c.b as f64,
                a: c.a as f64,
            }),
            None => wgpu::LoadOp::Load,
        };

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("gesso blit pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: dest,
                resolve_target: None,
                ops: wgpu::Operations { load, store: wgpu::StoreOp::Store },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.blit_pipeline);
        rpass.set_bind_group(0, &bind_group, &[]);
        rpass.draw(0..3, 0..1);
    }

    /// Clears both slots to `color` (initialization and full-canvas
    /// clears).
    pub fn clear_both(&self, encoder: &mut wgpu::CommandEncoder, color: Color) {
        for slot in &self.slots {
            let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("gesso canvas clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &slot.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: color.r as f64,
                            g: color.g as f64,
                            b: color.b as f64,
                            a: color.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }
    }
}

fn create_slot(
    device: &wgpu::Device,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
    label: &str,
) -> Slot {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    Slot { texture, view }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_and_back_start_distinct() {
        let s = PingPongState::new();
        assert_ne!(s.front(), s.back());
    }

    #[test]
    fn swap_exchanges_roles() {
        let mut s = PingPongState::new();
        let front_before = s.front();
        let back_before = s.back();
        s.swap();
        assert_eq!(s.front(), back_before);
        assert_eq!(s.back(), front_before);
    }

    #[test]
    fn two_swaps_restore_the_original_pairing() {
        // End-of-frame swap alternation: the slot that is front after
        // frame 1 is back after frame 2.
        let mut s = PingPongState::new();
        let frame1_front = {
            s.swap();
            s.front()
        };
        let frame2_back = {
            s.swap();
            s.back()
        };
        assert_eq!(frame1_front, frame2_back);

        // And a full double swap is the identity.
        assert_eq!(s, PingPongState::new());
    }
}
