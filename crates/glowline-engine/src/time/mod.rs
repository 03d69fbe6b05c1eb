//! Time subsystem.
//!
//! Provides stable, testable frame timing without coupling to the runtime.
//! The runtime owns one `FrameClock` and calls `tick()` once per redraw; the
//! resulting `frame_index` drives the scene builder.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
