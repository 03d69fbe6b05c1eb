use glam::Mat4;
use winit::dpi::PhysicalSize;

use crate::coords::ViewportSize;
use crate::device::{capture_errors, checked, Gpu, SurfaceErrorAction};
use crate::error::RenderError;
use crate::input::{Interaction, InteractionQueue, InteractionSender};
use crate::time::FrameTime;

use super::camera::Camera;
use super::compositor::{Compositor, FramePlan};
use super::config::RendererConfig;
use super::geometry::{GeometryBuffers, HostGeometry, WgpuGeometryBackend};
use super::line::{rasterize_line, LineSegment};
use super::pipelines::Pipelines;
use super::scene::build_frame;
use super::targets::{OutlineTargets, DEPTH_STENCIL_FORMAT};

/// Result of one `render_frame` call that did not fail.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// Both passes were submitted and the surface texture presented.
    Presented,
    /// Nothing to draw into this tick (zero-sized viewport, transient surface state).
    Skipped,
    /// The surface cannot recover; the caller should shut down.
    SurfaceLost,
}

/// Thick-outline renderer with a bloom composite.
///
/// Interaction events are queued and applied at the start of the next frame,
/// so the camera and viewport only ever change between frames.
pub struct OutlineRenderer {
    config: RendererConfig,
    camera: Camera,
    viewport: ViewportSize,
    interactions: InteractionQueue,
    geometry: GeometryBuffers<wgpu::Buffer>,
    compositor: Compositor,
}

impl OutlineRenderer {
    /// Builds pipelines, offscreen targets and the initial geometry buffers.
    pub fn new(gpu: &Gpu<'_>, config: RendererConfig) -> Result<Self, RenderError> {
        let viewport = ViewportSize::from(gpu.size());
        if !viewport.is_drawable() {
            return Err(RenderError::init("surface has zero size"));
        }

        let device = gpu.device();
        let format = gpu.surface_format();
        let sample_count =
            gpu.supported_sample_count(format, DEPTH_STENCIL_FORMAT, config.requested_samples());

        let (compositor, error) = capture_errors(device, || {
            let pipelines = Pipelines::new(device, format, sample_count);
            let targets = OutlineTargets::new(device, viewport, format, sample_count);
            Compositor::new(device, pipelines, targets, config.bloom_strength())
        });
        let compositor = checked(compositor, error, |e| {
            RenderError::init(format!("pipelines and render targets: {e}"))
        })?;

        let backend = WgpuGeometryBackend::new(device, gpu.queue());
        let geometry = GeometryBuffers::new(&backend, config.initial_line_capacity)
            .map_err(|e| RenderError::init(format!("initial geometry buffers: {e}")))?;

        log::info!(
            "outline renderer ready: {}x{} {:?}, {}x sampling, layout {:?}",
            viewport.width,
            viewport.height,
            format,
            sample_count,
            config.layout
        );

        Ok(Self {
            camera: Camera::new(config.pan_sensitivity, config.zoom_in, config.zoom_out),
            viewport,
            interactions: InteractionQueue::new(),
            geometry,
            compositor,
            config,
        })
    }

    /// Handle for posting pan/tap/resize events from any thread.
    pub fn interaction_sender(&self) -> InteractionSender {
        self.interactions.sender()
    }

    pub fn on_pan(&self, dx: f32, dy: f32) {
        self.interactions.sender().pan(dx, dy);
    }

    pub fn on_tap(&self, x: f32, y: f32) {
        self.interactions.sender().tap(x, y);
    }

    pub fn on_resize(&self, width: u32, height: u32) {
        self.interactions.sender().resize(width, height);
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Renders and presents one frame.
    ///
    /// Errors are `RenderError::Allocation` when the geometry buffers cannot
    /// grow and `RenderError::Init` when resized targets cannot be created;
    /// surface trouble is reported as `Skipped` or `SurfaceLost`.
    pub fn render_frame(&mut self, gpu: &mut Gpu<'_>, time: FrameTime) -> Result<FrameOutcome, RenderError> {
        apply_interactions(&mut self.camera, &mut self.viewport, self.interactions.drain());

        if !self.viewport.is_drawable() {
            log::debug!("frame {} skipped: empty viewport", time.frame_index);
            return Ok(FrameOutcome::Skipped);
        }

        // Keep the swapchain in step with the size the frame is planned for.
        if ViewportSize::from(gpu.size()) != self.viewport {
            gpu.resize(PhysicalSize::new(self.viewport.width, self.viewport.height));
        }
        self.compositor.ensure_targets(gpu.device(), self.viewport)?;

        let segments = build_frame(self.config.layout, time.frame_index);

        let aspect = self.viewport.aspect_ratio();
        let view_projection = self.camera.view_projection(aspect);

        self.geometry.begin_frame();
        fill_host_geometry(self.geometry.host_mut(), &segments, view_projection, aspect);

        let backend = WgpuGeometryBackend::new(gpu.device(), gpu.queue());
        self.geometry.sync(&backend)?;

        let mut frame = match gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                return Ok(match gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => {
                        log::error!("surface lost at frame {}", time.frame_index);
                        FrameOutcome::SurfaceLost
                    }
                    action => {
                        log::debug!("frame {} skipped: {action:?}", time.frame_index);
                        FrameOutcome::Skipped
                    }
                });
            }
        };

        let plan = FramePlan::new(self.viewport, self.geometry.host().line_count());
        self.compositor
            .encode(&mut frame.encoder, &frame.view, self.geometry.gpu(), &plan);
        gpu.submit(frame);

        Ok(FrameOutcome::Presented)
    }
}

/// Applies queued events in arrival order.
///
/// A tap reads the viewport height as of its position in the queue, so a resize
/// queued before it is already in effect.
pub(crate) fn apply_interactions(
    camera: &mut Camera,
    viewport: &mut ViewportSize,
    events: impl IntoIterator<Item = Interaction>,
) {
    for event in events {
        match event {
            Interaction::Pan { dx, dy } => camera.apply_pan(dx, dy),
            Interaction::Tap { y, .. } => camera.apply_tap(y, viewport.height as f32),
            Interaction::Resize { width, height } => *viewport = ViewportSize::new(width, height),
        }
    }
}

/// Rasterizes `segments` into `host`, stopping at the 16-bit index ceiling.
pub(crate) fn fill_host_geometry(
    host: &mut HostGeometry,
    segments: &[LineSegment],
    view_projection: Mat4,
    aspect_ratio: f32,
) {
    for segment in segments {
        let Some(base) = host.next_base() else {
            // Records the one-time overflow warning.
            host.push_line(rasterize_line(segment, view_projection, aspect_ratio, 0));
            break;
        };
        host.push_line(rasterize_line(segment, view_projection, aspect_ratio, base));
    }
}
