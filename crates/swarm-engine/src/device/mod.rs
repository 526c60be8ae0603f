//! GPU device and window surface.
//!
//! Covers:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - configuring the surface from `GpuInit` within what it supports
//! - acquiring, presenting and recovering frames

mod context;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use frame::GpuFrame;
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
