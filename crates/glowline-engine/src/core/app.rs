use crate::device::Gpu;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by the runtime.
///
/// Sizes and positions are physical pixels, origin top-left.
pub trait App {
    /// Called once after the window and its GPU context exist, before the first frame.
    fn on_gpu_ready(&mut self, gpu: &Gpu<'_>) -> AppControl;

    /// Drawable size changed. The surface is already reconfigured.
    fn on_resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// Drag or scroll delta.
    fn on_pan(&mut self, dx: f32, dy: f32) {
        let _ = (dx, dy);
    }

    /// Press and release without leaving the tap slop.
    fn on_tap(&mut self, x: f32, y: f32) {
        let _ = (x, y);
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
