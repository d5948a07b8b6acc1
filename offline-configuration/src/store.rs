//! `store` section: which cache store backs the mediator.

use std::sync::Arc;

use bytesize::ByteSize;
use offline_backend::CacheStore;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Entry capacity of the default in-memory store.
pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Store {
    Moka(Moka),
    FeOxDb(FeOxDb),
}

impl Default for Store {
    fn default() -> Self {
        Store::Moka(Moka::default())
    }
}

impl Store {
    pub fn into_store(self) -> Result<Arc<dyn CacheStore>, ConfigError> {
        match self {
            Store::Moka(config) => config.into_store(),
            Store::FeOxDb(config) => config.into_store(),
        }
    }
}

/// In-memory store. Set at most one of `max_entries` and `max_bytes`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Moka {
    pub max_entries: Option<u64>,
    pub max_bytes: Option<ByteSize>,
    /// Drop entries once their expiry passes instead of keeping them readable.
    pub evict_expired: bool,
    /// Optional label for this store (used in tracing).
    pub name: Option<String>,
}

impl Moka {
    #[cfg(feature = "moka")]
    pub fn into_store(self) -> Result<Arc<dyn CacheStore>, ConfigError> {
        use offline_moka::MokaStore;

        let builder = MokaStore::builder();
        let store = match (self.max_entries, self.max_bytes) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::InvalidStore(
                    "Moka: max_entries and max_bytes are mutually exclusive".to_string(),
                ));
            }
            (_, Some(bytes)) => {
                let mut builder = builder
                    .max_bytes(bytes.as_u64())
                    .evict_expired(self.evict_expired);
                if let Some(name) = self.name {
                    builder = builder.name(name);
                }
                builder.build()
            }
            (entries, None) => {
                let mut builder = builder
                    .max_entries(entries.unwrap_or(DEFAULT_MAX_ENTRIES))
                    .evict_expired(self.evict_expired);
                if let Some(name) = self.name {
                    builder = builder.name(name);
                }
                builder.build()
            }
        };
        Ok(Arc::new(store))
    }

    #[cfg(not(feature = "moka"))]
    pub fn into_store(self) -> Result<Arc<dyn CacheStore>, ConfigError> {
        Err(ConfigError::StoreNotAvailable("Moka".to_string()))
    }
}

/// Durable store. Without `path` the database lives in memory only.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeOxDb {
    pub path: Option<String>,
    pub max_file_size: Option<ByteSize>,
    pub max_memory: Option<ByteSize>,
    pub evict_expired: bool,
    pub name: Option<String>,
}

impl FeOxDb {
    #[cfg(feature = "feoxdb")]
    pub fn into_store(self) -> Result<Arc<dyn CacheStore>, ConfigError> {
        use offline_feoxdb::FeOxDbStore;

        let mut builder = FeOxDbStore::builder().evict_expired(self.evict_expired);
        if let Some(path) = self.path {
            builder = builder.path(path);
        }
        if let Some(size) = self.max_file_size {
            builder = builder.max_file_size(size.as_u64());
        }
        if let Some(memory) = self.max_memory {
            let memory = usize::try_from(memory.as_u64()).map_err(|_| {
                ConfigError::InvalidStore(format!("FeOxDb: max_memory {memory} is too large"))
            })?;
            builder = builder.max_memory(memory);
        }
        if let Some(name) = self.name {
            builder = builder.name(name);
        }

        let store = builder
            .build()
            .map_err(|e| ConfigError::StoreNotAvailable(format!("FeOxDb: {}", e)))?;
        Ok(Arc::new(store))
    }

    #[cfg(not(feature = "feoxdb"))]
    pub fn into_store(self) -> Result<Arc<dyn CacheStore>, ConfigError> {
        Err(ConfigError::StoreNotAvailable("FeOxDb".to_string()))
    }
}
