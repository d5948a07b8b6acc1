//! Simple in-memory test handle implementation using DashMap.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use offline_backend::{
    BackendError, BackendResult, CacheHandle, CacheInfo, CacheStore, DeleteStatus,
};
use offline_core::{CacheId, CacheValue, Raw};

/// Simple in-memory handle for testing using DashMap.
#[derive(Clone)]
pub struct TestHandle {
    id: CacheId,
    entries: Arc<DashMap<String, CacheValue<Raw>>>,
}

impl TestHandle {
    pub fn new(id: impl Into<CacheId>) -> Self {
        Self {
            id: id.into(),
            entries: Arc::new(DashMap::new()),
        }
    }
}

#[async_trait]
impl CacheHandle for TestHandle {
    async fn get(&self, key: &str) -> BackendResult<Option<CacheValue<Raw>>> {
        Ok(self.entries.get(key).map(|v| v.clone()))
    }

    async fn put(&self, key: &str, value: CacheValue<Raw>) -> BackendResult<()> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> BackendResult<DeleteStatus> {
        Ok(match self.entries.remove(key) {
            Some(_) => DeleteStatus::Deleted(1),
            None => DeleteStatus::Missing,
        })
    }

    async fn info(&self, key: Option<&str>) -> BackendResult<CacheInfo> {
        let is_expired = key.and_then(|key| self.entries.get(key).map(|v| v.is_expired()));
        Ok(CacheInfo::new(self.id.clone())
            .with_size(self.entries.len())
            .with_expired(is_expired))
    }
}

/// Store creating [`TestHandle`]s on demand.
#[derive(Default)]
pub struct TestStore {
    handles: DashMap<CacheId, Arc<TestHandle>>,
}

impl CacheStore for TestStore {
    fn get_or_create(&self, name: &CacheId) -> BackendResult<Arc<dyn CacheHandle>> {
        let handle = self
            .handles
            .entry(name.clone())
            .or_insert_with(|| Arc::new(TestHandle::new(name.clone())))
            .clone();
        Ok(handle)
    }

    fn get(&self, name: &CacheId) -> Option<Arc<dyn CacheHandle>> {
        self.handles
            .get(name)
            .map(|h| h.clone() as Arc<dyn CacheHandle>)
    }

    fn name(&self) -> &str {
        "test"
    }
}

/// Handle that always returns errors (for error testing).
#[derive(Clone, Default)]
pub struct ErrorHandle;

#[async_trait]
impl CacheHandle for ErrorHandle {
    async fn get(&self, _key: &str) -> BackendResult<Option<CacheValue<Raw>>> {
        Err(BackendError::internal(std::io::Error::other("simulated error")))
    }

    async fn put(&self, _key: &str, _value: CacheValue<Raw>) -> BackendResult<()> {
        Err(BackendError::internal(std::io::Error::other("simulated error")))
    }

    async fn remove(&self, _key: &str) -> BackendResult<DeleteStatus> {
        Err(BackendError::internal(std::io::Error::other("simulated error")))
    }

    async fn info(&self, _key: Option<&str>) -> BackendResult<CacheInfo> {
        Err(BackendError::internal(std::io::Error::other("simulated error")))
    }
}
