use bincode::error::{DecodeError, EncodeError};
use feoxdb::FeoxError;
use offline_backend::BackendError;
use thiserror::Error;

/// Errors that can occur when using [`FeOxDbStore`](crate::FeOxDbStore).
#[derive(Debug, Error)]
pub enum FeOxDbError {
    /// An error from the underlying FeOxDB database.
    #[error("FeOxDB error: {0}")]
    FeOxDb(#[from] FeoxError),

    /// Failed to serialize a cache value.
    #[error("Serialization error: {0}")]
    Serialization(#[from] EncodeError),

    /// Failed to deserialize a cache value.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] DecodeError),

    /// An I/O error occurred while preparing the database file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The provided configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<FeOxDbError> for BackendError {
    fn from(error: FeOxDbError) -> Self {
        match error {
            FeOxDbError::Serialization(_) | FeOxDbError::Deserialization(_) => {
                BackendError::FormatError(Box::new(error))
            }
            FeOxDbError::FeOxDb(_) | FeOxDbError::Io(_) => {
                BackendError::ConnectionError(Box::new(error))
            }
            FeOxDbError::InvalidConfig(_) => BackendError::InternalError(Box::new(error)),
        }
    }
}
