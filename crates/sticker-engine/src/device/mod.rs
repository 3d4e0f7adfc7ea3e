//! wgpu render backend.
//!
//! This module is responsible for:
//! - answering the capability query from a real adapter
//! - creating the wgpu Instance/Adapter/Device/Queue at a capability level
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and drawing the sticker into them

mod environment;
mod frame;
mod gpu;
mod init;
mod surface;

pub use environment::{api_version_for, AdapterEnvironment};
pub use frame::GpuFrame;
pub use gpu::{Gpu, WgpuBackend};
pub use init::{limits_for, GpuInit};
