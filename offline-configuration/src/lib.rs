#![doc = include_str!("../README.md")]

pub mod error;
pub mod store;

use std::path::Path;
use std::sync::Arc;

use offline::{Offline, OfflineConfig};
use offline_backend::CacheStore;
use offline_core::Reachability;
use serde::{Deserialize, Serialize};

pub use error::ConfigError;
pub use store::{FeOxDb, Moka, Store};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigFile {
    /// Mediator policy.
    pub policy: OfflineConfig,
    /// Cache store holding responses and the replay queue.
    pub store: Store,
}

impl ConfigFile {
    /// Parses a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_saphyr::from_str(yaml)?)
    }

    /// Reads and parses a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Splits the file into the policy and an opened store.
    pub fn into_parts(self) -> Result<(OfflineConfig, Arc<dyn CacheStore>), ConfigError> {
        let store = self.store.into_store()?;
        Ok((self.policy, store))
    }

    /// Builds a mediator over the configured store.
    pub fn into_offline<R>(self, reachability: R) -> Result<Offline, ConfigError>
    where
        R: Reachability + 'static,
    {
        let (policy, store) = self.into_parts()?;
        Ok(Offline::new(policy, store, reachability)?)
    }
}
