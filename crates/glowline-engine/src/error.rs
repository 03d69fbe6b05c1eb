//! Renderer error kinds.
//!
//! Only two conditions are errors: failing to build the GPU objects at startup,
//! and failing to grow a geometry buffer mid-frame. Transient surface states are
//! reported through `FrameOutcome` instead.

/// Errors produced by the outline renderer.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// Device, surface, pipeline or render-target creation failed.
    #[error("renderer initialization failed: {0}")]
    Init(String),

    /// A geometry buffer could not be (re)allocated.
    #[error(
        "failed to allocate {what} buffer for {capacity_lines} lines \
         ({requested_bytes} bytes, device limit {limit_bytes} bytes)"
    )]
    Allocation {
        what: &'static str,
        capacity_lines: usize,
        requested_bytes: u64,
        limit_bytes: u64,
    },
}

impl RenderError {
    pub(crate) fn init(msg: impl std::fmt::Display) -> Self {
        RenderError::Init(msg.to_string())
    }

    /// Whether the error only invalidates the current frame.
    ///
    /// Allocation failures leave the renderer usable; a later frame with less
    /// geometry can still be drawn.
    pub fn is_frame_local(&self) -> bool {
        matches!(self, RenderError::Allocation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_is_frame_local() {
        let err = RenderError::Allocation {
            what: "vertex",
            capacity_lines: 10,
            requested_bytes: 1280,
            limit_bytes: 1024,
        };
        assert!(err.is_frame_local());
        assert!(err.to_string().contains("vertex"));
    }

    #[test]
    fn init_is_fatal() {
        let err = RenderError::init("no adapter");
        assert!(!err.is_frame_local());
        assert_eq!(err.to_string(), "renderer initialization failed: no adapter");
    }
}
