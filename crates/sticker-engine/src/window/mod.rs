//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window and plays the host role: surface
//! lifecycle events are forwarded to a [`HostSurfaceAdapter`](crate::host::HostSurfaceAdapter).

mod runtime;

pub use runtime::{register_backend, Runtime, RuntimeConfig};
