//! Error types for backend operations.

use thiserror::Error;

/// Boxed source error carried by [`BackendError`] variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for cache store and cache handle operations.
///
/// This enum categorizes errors that can occur during storage interactions
/// into distinct groups for appropriate handling.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Internal backend error, state or computation error.
    ///
    /// Any error not related to I/O with an external system.
    #[error(transparent)]
    InternalError(BoxError),

    /// Storage I/O error.
    ///
    /// Errors occurring while talking to the underlying storage medium
    /// (disk file, remote service).
    #[error(transparent)]
    ConnectionError(BoxError),

    /// Serialization or deserialization error.
    #[error("format error: {0}")]
    FormatError(BoxError),
}

impl BackendError {
    /// Wraps any error as [`BackendError::InternalError`].
    pub fn internal<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        BackendError::InternalError(error.into())
    }

    /// Wraps any error as [`BackendError::FormatError`].
    pub fn format<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        BackendError::FormatError(error.into())
    }
}
