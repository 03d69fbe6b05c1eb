use winit::window::{Window, WindowId};

use crate::coords::ViewportSize;
use crate::device::Gpu;
use crate::time::FrameTime;

/// Window handle and metadata for the current frame.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    /// Drawable size in physical pixels.
    pub fn viewport(&self) -> ViewportSize {
        ViewportSize::from(self.window.inner_size())
    }

    /// Must be called right before presenting so the compositor can pace frames.
    pub fn pre_present_notify(&self) {
        self.window.pre_present_notify();
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
}
