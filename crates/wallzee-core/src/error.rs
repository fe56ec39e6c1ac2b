//! Error types for engine operations.

use thiserror::Error;

use crate::validate::ValidationError;

/// Primary error type for the wallpaper engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A record carried a device type outside `phone`/`desktop`.
    #[error("unknown device type '{value}'")]
    UnknownDeviceType {
        /// Raw value found on the record.
        value: String,
    },
    /// A record had neither a stored file nor a fallback URL.
    #[error("wallpaper has no downloadable source")]
    NoDownloadSource {
        /// Wallpaper identifier.
        id: String,
    },
    /// Client-side validation rejected the input.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Convenience alias for engine results.
pub type CoreResult<T> = Result<T, CoreError>;
