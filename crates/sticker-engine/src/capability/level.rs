use std::fmt;

/// Graphics API level a backend may assume for a surface.
///
/// Levels are ordered: `Basic < Standard < Advanced`. A level is chosen once,
/// before the backend handle exists, and stays fixed for the handle's lifetime.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum CapabilityLevel {
    /// GLES 1.x class hardware (fixed function).
    Basic,
    /// GLES 2.0 class hardware (programmable shaders).
    Standard,
    /// GLES 3.0 class hardware and newer.
    Advanced,
}

impl CapabilityLevel {
    /// All levels, lowest first.
    pub const ALL: [CapabilityLevel; 3] = [Self::Basic, Self::Standard, Self::Advanced];

    /// Lowest level; used whenever the host cannot be queried.
    pub const FALLBACK: CapabilityLevel = Self::Basic;

    /// Minimum encoded API version (`major << 16 | minor`) for this level.
    pub const fn min_api_version(self) -> u32 {
        match self {
            Self::Basic => 0,
            Self::Standard => encode_api_version(2, 0),
            Self::Advanced => encode_api_version(3, 0),
        }
    }

    /// Maps an encoded API version to the highest level it satisfies.
    pub fn from_api_version(version: u32) -> Self {
        Self::ALL
            .into_iter()
            .rev()
            .find(|level| version >= level.min_api_version())
            .unwrap_or(Self::FALLBACK)
    }

    /// GLES client version to request for a context at this level.
    pub const fn gles_client_version(self) -> u8 {
        match self {
            Self::Basic => 1,
            Self::Standard => 2,
            Self::Advanced => 3,
        }
    }
}

impl fmt::Display for CapabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Basic => "basic",
            Self::Standard => "standard",
            Self::Advanced => "advanced",
        };
        f.write_str(name)
    }
}

/// Encodes a `major.minor` API version the way Android reports `reqGlEsVersion`.
pub const fn encode_api_version(major: u16, minor: u16) -> u32 {
    ((major as u32) << 16) | minor as u32
}

/// Splits an encoded API version back into `(major, minor)`.
pub const fn decode_api_version(version: u32) -> (u16, u16) {
    ((version >> 16) as u16, (version & 0xffff) as u16)
}
