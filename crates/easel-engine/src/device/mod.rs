//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - copying a CPU-rasterized frame into the surface and presenting it

mod error;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use gpu::Gpu;
pub use init::GpuInit;
