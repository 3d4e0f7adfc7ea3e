use crate::capability::CapabilityLevel;
use crate::render::StickerStyle;

/// Initialization parameters for the wgpu backend.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior). FIFO is supported everywhere.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Desired maximum frame latency for the surface. A hint only.
    pub desired_maximum_frame_latency: u32,

    /// Color the surface is cleared to before the sticker is drawn.
    pub clear_color: wgpu::Color,

    pub sticker: StickerStyle,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            desired_maximum_frame_latency: 2,
            clear_color: wgpu::Color {
                r: 0.08,
                g: 0.08,
                b: 0.1,
                a: 1.0,
            },
            sticker: StickerStyle::default(),
        }
    }
}

/// Device limits a backend requests at `capability`.
///
/// Lower levels request the downlevel presets so GLES-class adapters can
/// satisfy them; resolution limits always follow the adapter.
pub fn limits_for(capability: CapabilityLevel, adapter_limits: wgpu::Limits) -> wgpu::Limits {
    let base = match capability {
        CapabilityLevel::Basic => wgpu::Limits::downlevel_webgl2_defaults(),
        CapabilityLevel::Standard => wgpu::Limits::downlevel_defaults(),
        CapabilityLevel::Advanced => wgpu::Limits::default(),
    };
    base.using_resolution(adapter_limits)
}
