use std::sync::Arc;

use async_trait::async_trait;
use bincode::{
    config::standard as bincode_config,
    serde::{decode_from_slice, encode_to_vec},
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use feoxdb::{FeoxError, FeoxStore};
use offline_backend::{BackendError, BackendResult, CacheHandle, CacheInfo, DeleteStatus};
use offline_core::{CacheId, CacheValue, Raw};
use serde::{Deserialize, Serialize};

use crate::FeOxDbError;

#[derive(Serialize, Deserialize)]
struct SerializableCacheValue {
    #[serde(with = "serde_bytes")]
    data: Vec<u8>,
    expire: Option<DateTime<Utc>>,
}

impl From<CacheValue<Raw>> for SerializableCacheValue {
    fn from(value: CacheValue<Raw>) -> Self {
        Self {
            expire: value.expire(),
            data: value.into_inner().to_vec(),
        }
    }
}

impl From<SerializableCacheValue> for CacheValue<Raw> {
    fn from(value: SerializableCacheValue) -> Self {
        CacheValue::new(Bytes::from(value.data), value.expire)
    }
}

fn encode(value: CacheValue<Raw>) -> Result<Vec<u8>, FeOxDbError> {
    let serializable = SerializableCacheValue::from(value);
    Ok(encode_to_vec(&serializable, bincode_config())?)
}

fn decode(bytes: &[u8]) -> Result<CacheValue<Raw>, FeOxDbError> {
    let (serializable, _): (SerializableCacheValue, _) =
        decode_from_slice(bytes, bincode_config())?;
    Ok(serializable.into())
}

/// One named cache inside a [`FeOxDbStore`](crate::FeOxDbStore).
///
/// Keys are stored as `<cache id>/<key>` so caches sharing the database never
/// see each other's entries. Cloning is cheap.
#[derive(Clone)]
pub struct FeOxDbCache {
    id: CacheId,
    store: Arc<FeoxStore>,
    evict_expired: bool,
}

impl FeOxDbCache {
    pub(crate) fn new(id: CacheId, store: Arc<FeoxStore>, evict_expired: bool) -> Self {
        FeOxDbCache {
            id,
            store,
            evict_expired,
        }
    }

    /// Identifier of this cache.
    pub fn id(&self) -> &CacheId {
        &self.id
    }

    fn storage_key(&self, key: &str) -> Vec<u8> {
        self.id.scoped(key).into_bytes()
    }
}

#[async_trait]
impl CacheHandle for FeOxDbCache {
    async fn get(&self, key: &str) -> BackendResult<Option<CacheValue<Raw>>> {
        let store = self.store.clone();
        let key_bytes = self.storage_key(key);
        let evict_expired = self.evict_expired;

        tokio::task::spawn_blocking(move || -> BackendResult<Option<CacheValue<Raw>>> {
            match store.get(&key_bytes) {
                Ok(encoded) => {
                    let value = decode(&encoded)?;
                    // FeOxDB TTL has second granularity; hide the remainder.
                    if evict_expired && value.is_expired() {
                        return Ok(None);
                    }
                    Ok(Some(value))
                }
                Err(FeoxError::KeyNotFound) => Ok(None),
                Err(e) => Err(FeOxDbError::from(e).into()),
            }
        })
        .await
        .map_err(BackendError::internal)?
    }

    async fn put(&self, key: &str, value: CacheValue<Raw>) -> BackendResult<()> {
        let store = self.store.clone();
        let key_bytes = self.storage_key(key);

        if self.evict_expired && value.is_expired() {
            self.remove(key).await?;
            return Ok(());
        }
        let ttl_secs = if self.evict_expired {
            value.ttl().map(|ttl| ttl.as_secs().max(1))
        } else {
            None
        };
        let value_bytes = encode(value)?;

        tokio::task::spawn_blocking(move || -> BackendResult<()> {
            let result = match ttl_secs {
                Some(secs) => store.insert_with_ttl(&key_bytes, &value_bytes, secs),
                None => store.insert(&key_bytes, &value_bytes),
            };
            result.map_err(FeOxDbError::from)?;
            Ok(())
        })
        .await
        .map_err(BackendError::internal)?
    }

    async fn remove(&self, key: &str) -> BackendResult<DeleteStatus> {
        let store = self.store.clone();
        let key_bytes = self.storage_key(key);

        tokio::task::spawn_blocking(move || -> BackendResult<DeleteStatus> {
            if !store.contains_key(&key_bytes) {
                return Ok(DeleteStatus::Missing);
            }
            store.delete(&key_bytes).map_err(FeOxDbError::from)?;
            Ok(DeleteStatus::Deleted(1))
        })
        .await
        .map_err(BackendError::internal)?
    }

    async fn info(&self, key: Option<&str>) -> BackendResult<CacheInfo> {
        let info = CacheInfo::new(self.id.clone());
        match key {
            Some(key) => {
                let is_expired = self.get(key).await?.map(|value| value.is_expired());
                Ok(info.with_expired(is_expired))
            }
            None => Ok(info),
        }
    }
}
