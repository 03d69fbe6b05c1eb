/// Drawable size in physical pixels.
///
/// Updated on surface resize; the camera and rasterizer read the aspect ratio
/// from it every frame.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `width / height`. Not guarded: a zero height yields `inf`/`NaN`,
    /// callers skip rendering for empty viewports via [`is_drawable`](Self::is_drawable).
    #[inline]
    pub fn aspect_ratio(self) -> f32 {
        self.width as f32 / self.height as f32
    }

    #[inline]
    pub fn is_drawable(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Vertical midline in pixels; taps above it zoom in.
    #[inline]
    pub fn half_height(self) -> f32 {
        self.height as f32 / 2.0
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for ViewportSize {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_is_width_over_height() {
        assert_eq!(ViewportSize::new(1600, 800).aspect_ratio(), 2.0);
    }

    #[test]
    fn zero_sized_viewport_is_not_drawable() {
        assert!(!ViewportSize::new(0, 600).is_drawable());
        assert!(!ViewportSize::new(800, 0).is_drawable());
        assert!(ViewportSize::new(1, 1).is_drawable());
    }
}
