//! GPU rendering for the wgpu backend.
//!
//! Convention:
//! - view space spans `[-1, 1]` on the shorter surface axis
//! - renderers own their GPU resources and build them lazily

mod ctx;
mod sticker;
pub mod transform;

pub use ctx::{RenderCtx, RenderTarget};
pub use sticker::{StickerRenderer, StickerStyle};
pub use transform::StickerTransform;
