//! Surface lifecycle.
//!
//! A surface moves through `Uninitialized -> Ready -> Sized -> Destroyed`.
//! The [`SurfaceController`] enforces that ordering and owns the backend
//! handle for exactly as long as the surface is live.

mod controller;
mod state;

pub use controller::SurfaceController;
pub use state::{
    Dimensions, FrameOutcome, FrameStats, InvalidTransition, Operation, Outcome, SurfaceState,
};
