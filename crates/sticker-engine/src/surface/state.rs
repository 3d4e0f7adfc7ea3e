use std::fmt;

use thiserror::Error;

use crate::backend::RenderError;

/// Lifecycle state of a render surface.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SurfaceState {
    /// No backend handle yet (never created, or creation failed).
    Uninitialized,
    /// Backend handle exists; no size received yet.
    Ready,
    /// Backend handle exists and has a known size.
    Sized,
    /// Terminal. The handle has been torn down.
    Destroyed,
}

impl SurfaceState {
    /// Whether a backend handle is live in this state.
    pub fn is_live(self) -> bool {
        matches!(self, Self::Ready | Self::Sized)
    }
}

impl fmt::Display for SurfaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
            Self::Sized => "sized",
            Self::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

/// Drawable size in physical pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Zero-area sizes are legal (minimized window) but cannot be rendered to.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height, or 1.0 when empty.
    pub fn aspect(self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Controller operation names, used in diagnostics.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Operation {
    Create,
    Resize,
    RenderFrame,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "create",
            Self::Resize => "resize",
            Self::RenderFrame => "render a frame",
        };
        f.write_str(name)
    }
}

/// An operation arrived in a state that does not accept it.
///
/// Never propagated as a failure: the call is ignored and this value is
/// logged and handed back for callers that want to inspect it.
#[derive(Debug, Copy, Clone, Error, Eq, PartialEq)]
#[error("cannot {operation} while surface is {state}")]
pub struct InvalidTransition {
    pub operation: Operation,
    pub state: SurfaceState,
}

/// Result of a lifecycle call that does not render.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[must_use]
pub enum Outcome {
    /// The call reached the backend or changed state.
    Applied,
    /// The call was valid but had nothing to do.
    Unchanged,
    /// The call was ignored.
    Rejected(InvalidTransition),
}

/// Result of a render request.
#[derive(Debug, Clone, Eq, PartialEq)]
#[must_use]
pub enum FrameOutcome {
    Rendered,
    /// The backend had nothing to draw into (zero-area surface).
    Skipped,
    /// The backend failed this frame; state is unchanged.
    Dropped(RenderError),
    Rejected(InvalidTransition),
}

/// Per-surface frame counters.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub rendered: u64,
    pub skipped: u64,
    pub dropped: u64,
    /// Render requests that arrived outside Ready/Sized.
    pub rejected: u64,
}
