//! Host integration.
//!
//! Adapts a UI framework's surface callbacks to the lifecycle controller.

mod adapter;
mod shared;

pub use adapter::{HostCallbacks, HostSurfaceAdapter};
pub use shared::SharedSurface;
