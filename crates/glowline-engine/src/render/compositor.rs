use wgpu::util::DeviceExt;

use crate::coords::ViewportSize;
use crate::device::{capture_errors, checked};
use crate::error::RenderError;

use super::geometry::GpuBufferPair;
use super::pipelines::{CompositeParams, Pipelines, FULLSCREEN_TRIANGLE};
use super::targets::OutlineTargets;

/// Viewport rectangle plus depth range, applied to both passes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

/// What one frame's two passes will do, computed without touching the GPU.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FramePlan {
    pub viewport: ViewportRect,
    /// Clear value for both offscreen color targets.
    pub clear: wgpu::Color,
    /// Indices drawn by the outline pass (`lines * 6`).
    pub outline_index_count: u32,
    /// Vertices drawn by the composite pass.
    pub composite_vertex_count: u32,
}

impl FramePlan {
    pub fn new(viewport: ViewportSize, line_count: usize) -> Self {
        Self {
            viewport: ViewportRect {
                x: 0.0,
                y: 0.0,
                width: viewport.width as f32,
                height: viewport.height as f32,
                min_depth: 0.0,
                max_depth: 1.0,
            },
            clear: wgpu::Color::TRANSPARENT,
            outline_index_count: (line_count * 6) as u32,
            composite_vertex_count: FULLSCREEN_TRIANGLE.len() as u32,
        }
    }
}

/// Two-pass frame: outlines into raw + bloom targets, then a fullscreen
/// composite into the surface.
///
/// Pipelines are injected at construction; targets are rebuilt when the
/// viewport size changes.
pub struct Compositor {
    pipelines: Pipelines,
    targets: OutlineTargets,
    bind_group: wgpu::BindGroup,
    fullscreen_vbo: wgpu::Buffer,
    params_ubo: wgpu::Buffer,
}

impl Compositor {
    pub fn new(
        device: &wgpu::Device,
        pipelines: Pipelines,
        targets: OutlineTargets,
        bloom_strength: f32,
    ) -> Self {
        let fullscreen_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("glowline fullscreen vbo"),
            contents: bytemuck::cast_slice(&FULLSCREEN_TRIANGLE),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let params = CompositeParams {
            bloom_strength,
            _pad: [0.0; 3],
        };
        let params_ubo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("glowline composite params ubo"),
            contents: bytemuck::bytes_of(&params),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = create_bind_group(device, &pipelines, &targets, &params_ubo);

        Self {
            pipelines,
            targets,
            bind_group,
            fullscreen_vbo,
            params_ubo,
        }
    }

    pub fn targets(&self) -> &OutlineTargets {
        &self.targets
    }

    /// Recreates the offscreen targets (and the bind group sampling them) if
    /// `size` differs from their current size. On failure the previous
    /// targets stay in place.
    pub fn ensure_targets(&mut self, device: &wgpu::Device, size: ViewportSize) -> Result<(), RenderError> {
        if self.targets.matches(size) {
            return Ok(());
        }

        let (format, sample_count) = (self.targets.format, self.targets.sample_count);
        let (rebuilt, error) = capture_errors(device, || {
            let targets = OutlineTargets::new(device, size, format, sample_count);
            let bind_group = create_bind_group(device, &self.pipelines, &targets, &self.params_ubo);
            (targets, bind_group)
        });
        let (targets, bind_group) = checked(rebuilt, error, |e| {
            RenderError::init(format!("render targets for {}x{}: {e}", size.width, size.height))
        })?;

        self.targets = targets;
        self.bind_group = bind_group;
        Ok(())
    }

    /// Records both passes into `encoder`.
    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
        geometry: &GpuBufferPair<wgpu::Buffer>,
        plan: &FramePlan,
    ) {
        self.encode_outline_pass(encoder, geometry, plan);
        self.encode_composite_pass(encoder, surface_view, plan);
    }

    fn encode_outline_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        geometry: &GpuBufferPair<wgpu::Buffer>,
        plan: &FramePlan,
    ) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("glowline outline pass"),
            color_attachments: &[
                color_attachment(self.targets.raw.attachment(), plan.clear),
                color_attachment(self.targets.bloom.attachment(), plan.clear),
            ],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.targets.depth_view,
                depth_ops: Some(clear_and_store(1.0)),
                stencil_ops: Some(clear_and_store(0)),
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if plan.outline_index_count == 0 {
            return;
        }

        set_viewport(&mut rpass, &plan.viewport);
        rpass.set_pipeline(&self.pipelines.outline);
        rpass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
        rpass.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..plan.outline_index_count, 0, 0..1);
    }

    fn encode_composite_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
        plan: &FramePlan,
    ) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("glowline composite pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: clear_and_store(wgpu::Color::BLACK),
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        set_viewport(&mut rpass, &plan.viewport);
        rpass.set_pipeline(&self.pipelines.fullscreen);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.fullscreen_vbo.slice(..));
        rpass.draw(0..plan.composite_vertex_count, 0..1);
    }
}

/// Offscreen attachment cleared to `clear`, resolving into the sampled texture
/// when multisampled.
fn color_attachment<'t>(
    (view, resolve_target): (&'t wgpu::TextureView, Option<&'t wgpu::TextureView>),
    clear: wgpu::Color,
) -> Option<wgpu::RenderPassColorAttachment<'t>> {
    Some(wgpu::RenderPassColorAttachment {
        view,
        resolve_target,
        ops: clear_and_store(clear),
        depth_slice: None,
    })
}

fn clear_and_store<V>(value: V) -> wgpu::Operations<V> {
    wgpu::Operations {
        load: wgpu::LoadOp::Clear(value),
        store: wgpu::StoreOp::Store,
    }
}

fn set_viewport(rpass: &mut wgpu::RenderPass<'_>, v: &ViewportRect) {
    rpass.set_viewport(v.x, v.y, v.width, v.height, v.min_depth, v.max_depth);
}

/// Texture 0 = raw, texture 1 = bloom.
fn create_bind_group(
    device: &wgpu::Device,
    pipelines: &Pipelines,
    targets: &OutlineTargets,
    params_ubo: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("glowline composite bind group"),
        layout: &pipelines.composite_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&targets.raw.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&targets.bloom.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(&pipelines.sampler),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: params_ubo.as_entire_binding(),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_draws_six_indices_per_line() {
        let plan = FramePlan::new(ViewportSize::new(1280, 720), 80);
        assert_eq!(plan.outline_index_count, 480);
        assert_eq!(plan.composite_vertex_count, 3);
    }

    #[test]
    fn plan_viewport_covers_surface() {
        let plan = FramePlan::new(ViewportSize::new(1024, 768), 1);
        assert_eq!(
            plan.viewport,
            ViewportRect {
                x: 0.0,
                y: 0.0,
                width: 1024.0,
                height: 768.0,
                min_depth: 0.0,
                max_depth: 1.0,
            }
        );
    }

    #[test]
    fn attachments_clear_then_store() {
        let ops = clear_and_store(wgpu::Color::TRANSPARENT);
        assert_eq!(ops.load, wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT));
        assert_eq!(ops.store, wgpu::StoreOp::Store);

        assert_eq!(clear_and_store(1.0f32).load, wgpu::LoadOp::Clear(1.0));
        assert_eq!(clear_and_store(0u32).store, wgpu::StoreOp::Store);
    }

    #[test]
    fn plan_clears_to_transparent_black() {
        let plan = FramePlan::new(ViewportSize::new(1, 1), 0);
        assert_eq!(plan.clear, wgpu::Color::TRANSPARENT);
        assert_eq!(plan.outline_index_count, 0);
    }
}
