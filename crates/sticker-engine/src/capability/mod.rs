//! Graphics capability negotiation.
//!
//! The host reports the highest graphics API version it supports; this module
//! turns that number into a [`CapabilityLevel`] before any backend exists.

mod level;
mod probe;

pub use level::{decode_api_version, encode_api_version, CapabilityLevel};
pub use probe::{probe, probe_or_fallback, CapabilityUnavailable, FixedEnvironment, HostEnvironment};
