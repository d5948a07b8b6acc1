use std::sync::Arc;

use async_trait::async_trait;
use offline_core::{CacheId, CacheValue, Raw};

use crate::{BackendError, DeleteStatus};

pub type BackendResult<T> = Result<T, BackendError>;

/// Metadata reported by [`CacheHandle::info`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheInfo {
    /// Identifier of the cache the handle belongs to.
    pub id: CacheId,
    /// Number of entries, when the store can tell cheaply.
    pub size: Option<usize>,
    /// Expiry state of the requested key.
    ///
    /// `None` when no key was requested or the key is absent.
    pub is_expired: Option<bool>,
}

impl CacheInfo {
    /// Info for a whole cache.
    pub fn new(id: CacheId) -> Self {
        CacheInfo {
            id,
            size: None,
            is_expired: None,
        }
    }

    /// Sets the entry count.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets the expiry state of the requested key.
    pub fn with_expired(mut self, is_expired: Option<bool>) -> Self {
        self.is_expired = is_expired;
        self
    }

    /// Whether the requested key was reported as expired.
    pub fn expired(&self) -> bool {
        self.is_expired == Some(true)
    }
}

/// Narrow cache capability: exactly get, put, remove and info.
///
/// A handle is used as the response cache on the GET path and as the
/// persistence medium of the replay queue. [`info`](CacheHandle::info) reports
/// `is_expired = Some(true)` for an entry the store still holds past its
/// expiry, which is what online cache maintenance evicts.
#[async_trait]
pub trait CacheHandle: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> BackendResult<Option<CacheValue<Raw>>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: CacheValue<Raw>) -> BackendResult<()>;

    /// Delete the value stored under `key`.
    async fn remove(&self, key: &str) -> BackendResult<DeleteStatus>;

    /// Cache metadata, plus the expiry state of `key` when given.
    async fn info(&self, key: Option<&str>) -> BackendResult<CacheInfo>;
}

#[async_trait]
impl<T> CacheHandle for Arc<T>
where
    T: CacheHandle + ?Sized,
{
    async fn get(&self, key: &str) -> BackendResult<Option<CacheValue<Raw>>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &str, value: CacheValue<Raw>) -> BackendResult<()> {
        (**self).put(key, value).await
    }

    async fn remove(&self, key: &str) -> BackendResult<DeleteStatus> {
        (**self).remove(key).await
    }

    async fn info(&self, key: Option<&str>) -> BackendResult<CacheInfo> {
        (**self).info(key).await
    }
}

#[async_trait]
impl<T> CacheHandle for Box<T>
where
    T: CacheHandle + ?Sized,
{
    async fn get(&self, key: &str) -> BackendResult<Option<CacheValue<Raw>>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &str, value: CacheValue<Raw>) -> BackendResult<()> {
        (**self).put(key, value).await
    }

    async fn remove(&self, key: &str) -> BackendResult<DeleteStatus> {
        (**self).remove(key).await
    }

    async fn info(&self, key: Option<&str>) -> BackendResult<CacheInfo> {
        (**self).info(key).await
    }
}
