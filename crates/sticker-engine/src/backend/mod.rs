//! Render backend contract.
//!
//! The controller only ever talks to a backend through these two traits:
//! - [`RenderBackend`] is a factory that turns a capability level into a live handle
//! - [`BackendHandle`] owns the GPU resources of one surface
//!
//! Implementations include the wgpu backend in `device` and test doubles.

mod error;
mod registry;

pub use error::{BackendInitError, RenderError};
pub use registry::{BackendFactory, BackendRegistry, NotRegistered};

use crate::capability::CapabilityLevel;
use crate::surface::Dimensions;
use crate::time::FrameTime;

/// Creates per-surface backend handles.
pub trait RenderBackend: Send {
    /// Allocates backend resources for a surface at the given capability level.
    fn initialize(
        &mut self,
        capability: CapabilityLevel,
    ) -> Result<Box<dyn BackendHandle>, BackendInitError>;
}

/// What a backend did with a render request.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    /// A frame was drawn and presented.
    Presented,
    /// Nothing to draw into (for example a zero-area surface).
    Skipped,
}

/// Live backend resources for one surface.
///
/// The controller guarantees `teardown` is called at most once and that no
/// other method is called afterwards.
pub trait BackendHandle: Send {
    fn resize(&mut self, size: Dimensions);

    fn render_frame(&mut self, time: FrameTime) -> Result<FrameStatus, RenderError>;

    fn teardown(&mut self);
}

impl<F> RenderBackend for F
where
    F: FnMut(CapabilityLevel) -> Result<Box<dyn BackendHandle>, BackendInitError> + Send,
{
    fn initialize(
        &mut self,
        capability: CapabilityLevel,
    ) -> Result<Box<dyn BackendHandle>, BackendInitError> {
        self(capability)
    }
}
