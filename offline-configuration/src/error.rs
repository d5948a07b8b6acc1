use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_saphyr::Error),

    #[error("Store not available: {0}")]
    StoreNotAvailable(String),

    #[error("Invalid store configuration: {0}")]
    InvalidStore(String),

    #[error(transparent)]
    Offline(#[from] offline::OfflineError),
}
