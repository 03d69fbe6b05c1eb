//! Outline rendering subsystem.
//!
//! Line segments are rasterized on the CPU into screen-space quads, uploaded
//! into growable vertex/index buffers and drawn in two passes: outlines into
//! raw + bloom offscreen targets, then a fullscreen composite into the surface.
//!
//! Convention:
//! - world space is right-handed, +Y up; the scene orbits the origin.
//! - vertex positions are emitted in clip space; depth maps to `[0, 1]`.

pub mod camera;
pub mod compositor;
pub mod config;
pub mod geometry;
pub mod line;
pub mod pipelines;
mod renderer;
pub mod scene;
pub mod targets;

pub use camera::Camera;
pub use compositor::{Compositor, FramePlan, ViewportRect};
pub use config::RendererConfig;
pub use geometry::{
    BufferRole, GeometryBackend, GeometryBuffers, GpuBufferPair, HostGeometry, WgpuGeometryBackend,
    MAX_LINES_PER_FRAME,
};
pub use line::{rasterize_line, LineQuad, LineSegment, OutlineVertex};
pub use pipelines::Pipelines;
pub use renderer::{FrameOutcome, OutlineRenderer};
pub use scene::{build_frame, SceneLayout};
pub use targets::{make_color_target, ColorTarget, OutlineTargets};
