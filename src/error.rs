//! Error types for container operations.

use thiserror::Error;

/// Error type for container operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Optional operation not provided by this container variant
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Operation not allowed in the container's current state
    #[error("Invalid state: {0}")]
    InvalidState(&'static str),

    /// Postcard serialization error
    #[error("Postcard error: {0}")]
    Postcard(#[from] postcard::Error),

    /// Invalid encoded format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Unsupported format version
    #[error("Unsupported format version: {version} (max supported: {max_supported})")]
    UnsupportedVersion {
        /// Version found in the header.
        version: u8,
        /// Highest version this build can decode.
        max_supported: u8,
    },
}

impl Error {
    /// `true` for failures raised while encoding or decoding bytes.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(
            self,
            Self::Postcard(_) | Self::InvalidFormat(_) | Self::UnsupportedVersion { .. }
        )
    }
}

/// Result type for container operations.
pub type Result<T> = std::result::Result<T, Error>;
