//! Frame timing.
//!
//! One `FrameClock` per surface; the controller ticks it once per rendered
//! frame and passes the resulting `FrameTime` to the backend.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
