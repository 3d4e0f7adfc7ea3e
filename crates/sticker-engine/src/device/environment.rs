use crate::capability::{encode_api_version, CapabilityUnavailable, HostEnvironment};

/// Host environment answered by asking wgpu for the best available adapter.
///
/// The adapter's downlevel capabilities are folded into the GLES-style
/// version encoding: a WebGPU-compliant adapter reports 3.2, anything else
/// reports 2.0.
#[derive(Debug, Clone, Default)]
pub struct AdapterEnvironment {
    override_version: Option<u32>,
}

impl AdapterEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports `version` instead of querying the adapter.
    pub fn with_override(mut self, version: Option<u32>) -> Self {
        self.override_version = version;
        self
    }
}

impl HostEnvironment for AdapterEnvironment {
    fn max_api_version(&self) -> Result<u32, CapabilityUnavailable> {
        if let Some(version) = self.override_version {
            log::debug!("using configured api version {version:#x}");
            return Ok(version);
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let adapter = pollster::block_on(instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            },
        ))
        .map_err(|e| CapabilityUnavailable::new(format!("no graphics adapter: {e}")))?;

        let info = adapter.get_info();
        let version = api_version_for(&adapter.get_downlevel_capabilities());
        log::debug!("adapter {} ({:?}) maps to api version {version:#x}", info.name, info.backend);
        Ok(version)
    }
}

/// Encodes an adapter's downlevel capabilities as a GLES-style version.
pub fn api_version_for(downlevel: &wgpu::DownlevelCapabilities) -> u32 {
    if downlevel.is_webgpu_compliant() {
        encode_api_version(3, 2)
    } else {
        encode_api_version(2, 0)
    }
}
