//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single Window, wires the window to the
//! GPU layer and routes pointer input through the gesture recognizer.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
