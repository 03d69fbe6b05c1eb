use bytemuck::{Pod, Zeroable};

use super::line::OutlineVertex;
use super::targets::DEPTH_STENCIL_FORMAT;

// ── blend ─────────────────────────────────────────────────────────────────

/// `src * 1 + dst * (1 - src.a)` for both color and alpha.
pub(crate) fn outline_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: component,
        alpha: component,
    }
}

// ── fullscreen triangle ───────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FullscreenVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl FullscreenVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2  // uv
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<FullscreenVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Triangle whose clipped footprint is exactly the viewport.
///
/// Texture space has +v down, so uv.y = (1 - ndc.y) / 2.
pub const FULLSCREEN_TRIANGLE: [FullscreenVertex; 3] = [
    FullscreenVertex { position: [-1.0, 3.0], uv: [0.0, -1.0] },
    FullscreenVertex { position: [-1.0, -1.0], uv: [0.0, 1.0] },
    FullscreenVertex { position: [3.0, -1.0], uv: [2.0, 1.0] },
];

// ── composite uniform ─────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct CompositeParams {
    pub bloom_strength: f32,
    pub _pad: [f32; 3], // 16-byte alignment
}

// ── pipelines ─────────────────────────────────────────────────────────────

/// Pipeline objects built once at renderer construction.
pub struct Pipelines {
    pub outline: wgpu::RenderPipeline,
    pub fullscreen: wgpu::RenderPipeline,
    pub composite_layout: wgpu::BindGroupLayout,
    pub sampler: wgpu::Sampler,
}

impl Pipelines {
    /// `target_format` is used for the offscreen targets and the surface alike.
    pub fn new(device: &wgpu::Device, target_format: wgpu::TextureFormat, sample_count: u32) -> Self {
        let outline = create_outline_pipeline(device, target_format, sample_count);
        let composite_layout = create_composite_layout(device);
        let fullscreen = create_fullscreen_pipeline(device, target_format, &composite_layout);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("glowline composite sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Self {
            outline,
            fullscreen,
            composite_layout,
            sampler,
        }
    }
}

fn create_outline_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    sample_count: u32,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("glowline outline shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/outline.wgsl").into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("glowline outline pipeline layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    let color_target = Some(wgpu::ColorTargetState {
        format,
        blend: Some(outline_blend()),
        write_mask: wgpu::ColorWrites::ALL,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("glowline outline pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[OutlineVertex::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            // 0 = raw, 1 = bloom.
            targets: &[color_target.clone(), color_target],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Winding flips with the perpendicular's direction; draw both faces.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        // Outlines are translucent and blended; depth is cleared but never tested.
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_STENCIL_FORMAT,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Always,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview_mask: None,
        cache: None,
    })
}

fn create_composite_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    };

    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("glowline composite bgl"),
        entries: &[
            texture_entry(0),
            texture_entry(1),
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 3,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<CompositeParams>() as u64,
                    ),
                },
                count: None,
            },
        ],
    })
}

fn create_fullscreen_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("glowline fullscreen shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/fullscreen.wgsl").into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("glowline fullscreen pipeline layout"),
        bind_group_layouts: &[bind_group_layout],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("glowline fullscreen pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[FullscreenVertex::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
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
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Same-side test for a point against a triangle.
    fn inside(p: [f32; 2], tri: &[FullscreenVertex; 3]) -> bool {
        let edge = |a: [f32; 2], b: [f32; 2]| (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0]);
        let d0 = edge(tri[0].position, tri[1].position);
        let d1 = edge(tri[1].position, tri[2].position);
        let d2 = edge(tri[2].position, tri[0].position);
        (d0 >= 0.0 && d1 >= 0.0 && d2 >= 0.0) || (d0 <= 0.0 && d1 <= 0.0 && d2 <= 0.0)
    }

    #[test]
    fn fullscreen_triangle_covers_clip_square() {
        for corner in [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]] {
            assert!(inside(corner, &FULLSCREEN_TRIANGLE), "{corner:?} not covered");
        }
    }

    #[test]
    fn fullscreen_uv_maps_viewport_to_unit_square() {
        // uv is affine in position; check it against the documented mapping.
        for v in FULLSCREEN_TRIANGLE {
            let expected = [(v.position[0] + 1.0) / 2.0, (1.0 - v.position[1]) / 2.0];
            assert_eq!(v.uv, expected);
        }
    }

    #[test]
    fn outline_blend_is_premultiplied_over() {
        let b = outline_blend();
        assert_eq!(b.color, b.alpha);
        assert_eq!(b.color.src_factor, wgpu::BlendFactor::One);
        assert_eq!(b.color.dst_factor, wgpu::BlendFactor::OneMinusSrcAlpha);
        assert_eq!(b.color.operation, wgpu::BlendOperation::Add);
    }

    #[test]
    fn vertex_strides() {
        assert_eq!(std::mem::size_of::<FullscreenVertex>(), 16);
        assert_eq!(std::mem::size_of::<CompositeParams>(), 16);
    }
}
