//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The runtime translates window events into `PointerEvent`s, the
//! `GestureRecognizer` turns those into gestures, and gestures reach the
//! renderer as `Interaction`s through an `InteractionSender`.

mod gesture;
mod queue;
mod types;

pub use gesture::{GestureRecognizer, DEFAULT_TAP_SLOP, WHEEL_LINE_PIXELS};
pub use queue::{InteractionQueue, InteractionSender};
pub use types::{Gesture, Interaction, PointerEvent};
