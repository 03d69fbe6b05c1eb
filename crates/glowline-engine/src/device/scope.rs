use std::fmt::Display;

use crate::error::RenderError;

/// Runs `f` with validation and out-of-memory errors captured instead of
/// reaching the device's uncaptured-error handler (which panics by default).
///
/// Scopes are popped innermost first; on native backends the pop resolves
/// immediately, so blocking is cheap.
pub fn capture_errors<T>(device: &wgpu::Device, f: impl FnOnce() -> T) -> (T, Option<wgpu::Error>) {
    let oom = device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    let validation = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let value = f();

    let validation_error = pollster::block_on(validation.pop());
    let oom_error = pollster::block_on(oom.pop());
    (value, validation_error.or(oom_error))
}

/// Keeps `value` only if no error was captured while producing it.
pub(crate) fn checked<T, E: Display>(
    value: T,
    error: Option<E>,
    to_render_error: impl FnOnce(E) -> RenderError,
) -> Result<T, RenderError> {
    match error {
        None => Ok(value),
        Some(e) => Err(to_render_error(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_kept_without_error() {
        let out = checked(7, None::<String>, RenderError::init);
        assert_eq!(out.unwrap(), 7);
    }

    #[test]
    fn captured_error_becomes_init_failure() {
        let err = checked((), Some("invalid shader"), |e| RenderError::init(format!("pipelines: {e}")))
            .unwrap_err();
        assert!(matches!(&err, RenderError::Init(msg) if msg == "pipelines: invalid shader"));
        assert!(!err.is_frame_local());
    }
}
