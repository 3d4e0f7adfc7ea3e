use thiserror::Error;

/// Backend could not produce a handle for a surface.
///
/// Recoverable: the surface stays uninitialized and creation may be retried.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
#[error("render backend initialization failed: {message}")]
pub struct BackendInitError {
    pub message: String,
}

impl BackendInitError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for BackendInitError {
    fn from(err: anyhow::Error) -> Self {
        // Alternate formatting keeps the whole context chain.
        Self::new(format!("{err:#}"))
    }
}

/// A single frame could not be rendered. The frame is dropped; the next one
/// is attempted normally.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RenderError {
    /// Surface was lost or outdated and has been reconfigured.
    #[error("surface lost or outdated")]
    SurfaceLost,

    /// Acquiring the next drawable timed out.
    #[error("timed out acquiring the next frame")]
    Timeout,

    #[error("out of memory")]
    OutOfMemory,

    #[error("{0}")]
    Other(String),
}
