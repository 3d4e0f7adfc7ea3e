use std::sync::Arc;

use anyhow::{Context, Result};
use sticker_engine::backend::RenderBackend;
use sticker_engine::capability::{decode_api_version, encode_api_version};
use sticker_engine::device::{GpuInit, WgpuBackend};
use sticker_engine::logging::{init_logging, LoggingConfig};
use sticker_engine::render::StickerStyle;
use sticker_engine::window::{register_backend, Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;
use winit::window::Window;

/// Environment variable forcing the reported graphics API version, as
/// `major.minor` (e.g. `2.0`) or encoded hex (e.g. `0x20000`).
const API_VERSION_VAR: &str = "STICKER_API_VERSION";

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let api_version_override = match std::env::var(API_VERSION_VAR) {
        Ok(raw) => Some(
            parse_api_version(&raw)
                .with_context(|| format!("invalid {API_VERSION_VAR} value `{raw}`"))?,
        ),
        Err(_) => None,
    };
    if let Some(v) = api_version_override {
        let (major, minor) = decode_api_version(v);
        log::info!("graphics api forced to {major}.{minor}");
    }

    let init = GpuInit {
        sticker: StickerStyle {
            color: [0.98, 0.62, 0.18, 1.0],
            scale: 0.45,
            spin_speed: 1.2,
            angle: 0.3,
            translation: [0.0, 0.1, 0.0],
        },
        ..GpuInit::default()
    };

    // Registered once, before any surface exists.
    register_backend(move |window: Arc<Window>| -> Box<dyn RenderBackend> {
        Box::new(WgpuBackend::new(window, init.clone()))
    });

    Runtime::run(RuntimeConfig {
        title: "Sticker Studio".to_string(),
        initial_size: LogicalSize::new(640.0, 640.0),
        api_version_override,
        ..RuntimeConfig::default()
    })
}

fn parse_api_version(raw: &str) -> Result<u32> {
    let raw = raw.trim();
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        return u32::from_str_radix(hex, 16).context("not a hex number");
    }
    let (major, minor) = raw.split_once('.').unwrap_or((raw, "0"));
    let major: u16 = major.parse().context("bad major version")?;
    let minor: u16 = minor.parse().context("bad minor version")?;
    Ok(encode_api_version(major, minor))
}
