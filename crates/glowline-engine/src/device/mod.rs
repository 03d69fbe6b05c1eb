//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and providing encoders/views for rendering
//! - turning captured device errors into `RenderError`s

mod error;
mod frame;
mod gpu;
mod init;
mod samples;
mod scope;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use samples::negotiate_sample_count;
pub use scope::capture_errors;
pub(crate) use scope::checked;
