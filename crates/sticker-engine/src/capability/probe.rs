use thiserror::Error;

use super::level::{decode_api_version, CapabilityLevel};

/// The host could not report its supported graphics API version.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
#[error("graphics capability unavailable: {reason}")]
pub struct CapabilityUnavailable {
    pub reason: String,
}

impl CapabilityUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Host descriptor that can be asked for its maximum graphics API version.
///
/// The encoding is host-defined; the reference encoding is `major << 16 | minor`.
pub trait HostEnvironment {
    fn max_api_version(&self) -> Result<u32, CapabilityUnavailable>;
}

impl<F> HostEnvironment for F
where
    F: Fn() -> Result<u32, CapabilityUnavailable>,
{
    fn max_api_version(&self) -> Result<u32, CapabilityUnavailable> {
        self()
    }
}

/// Environment reporting a fixed, already-known version.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FixedEnvironment(pub u32);

impl HostEnvironment for FixedEnvironment {
    fn max_api_version(&self) -> Result<u32, CapabilityUnavailable> {
        Ok(self.0)
    }
}

/// Queries `env` and maps the reported version to a capability level.
pub fn probe(env: &dyn HostEnvironment) -> Result<CapabilityLevel, CapabilityUnavailable> {
    let version = env.max_api_version()?;
    let level = CapabilityLevel::from_api_version(version);
    let (major, minor) = decode_api_version(version);
    log::debug!("host reports graphics api {major}.{minor} ({version:#x}) -> {level}");
    Ok(level)
}

/// Like [`probe`], but degrades to [`CapabilityLevel::FALLBACK`] when the host
/// cannot be queried.
pub fn probe_or_fallback(env: &dyn HostEnvironment) -> CapabilityLevel {
    match probe(env) {
        Ok(level) => level,
        Err(e) => {
            log::warn!("{e}; falling back to {}", CapabilityLevel::FALLBACK);
            CapabilityLevel::FALLBACK
        }
    }
}
