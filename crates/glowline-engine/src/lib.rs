//! Glowline engine crate.
//!
//! Thick 3D outlines rendered with wgpu: a CPU line rasterizer feeding growable
//! GPU buffers, a two-pass raw + bloom compositor, and the winit runtime that
//! drives it.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod error;
pub mod coords;
pub mod render;

pub use error::RenderError;
