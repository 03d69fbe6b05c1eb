//! Screen-space sizes shared by the camera, rasterizer and compositor.

mod viewport;

pub use viewport::ViewportSize;
