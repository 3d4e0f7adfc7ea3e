//! Sticker engine crate.
//!
//! Coordinates the lifecycle of a GPU render surface (created, sized,
//! rendering, destroyed) and bridges it to a pluggable render backend.
//!
//! Layers, leaf first:
//! - `capability`: graphics API level negotiation
//! - `backend`: the backend contract and process-wide registration
//! - `surface`: the lifecycle state machine
//! - `host`: adapter from host UI callbacks to the state machine
//! - `device` + `render`: the wgpu backend drawing the sticker
//! - `window`: a winit host driving all of the above

pub mod backend;
pub mod capability;
pub mod device;
pub mod host;
pub mod logging;
pub mod render;
pub mod surface;
pub mod time;
pub mod window;

#[cfg(test)]
mod testing;
