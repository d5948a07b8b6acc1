//! In-memory cache store that records evictions.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dashmap::DashMap;
use offline::{CacheHandle, CacheId, CacheInfo, CacheStore, CacheValue};
use offline_backend::{BackendResult, DeleteStatus};
use offline_core::Raw;

/// DashMap-backed cache handle.
pub struct TestHandle {
    id: CacheId,
    entries: DashMap<String, CacheValue<Raw>>,
    removed: Mutex<Vec<String>>,
}

impl TestHandle {
    pub fn new(id: impl Into<CacheId>) -> Self {
        Self {
            id: id.into(),
            entries: DashMap::new(),
            removed: Mutex::new(Vec::new()),
        }
    }

    /// Inserts an entry without going through the trait.
    pub fn seed(&self, key: &str, value: CacheValue<Raw>) {
        self.entries.insert(key.to_owned(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn raw(&self, key: &str) -> Option<CacheValue<Raw>> {
        self.entries.get(key).map(|v| v.clone())
    }

    /// Keys passed to `remove`, in call order.
    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().unwrap().clone()
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
        self.removed.lock().unwrap().push(key.to_owned());
        Ok(match self.entries.remove(key) {
            Some(_) => DeleteStatus::Deleted(1),
            None => DeleteStatus::Missing,
        })
    }

    async fn info(&self, key: Option<&str>) -> BackendResult<CacheInfo> {
        let info = CacheInfo::new(self.id.clone()).with_size(self.entries.len());
        Ok(match key {
            Some(key) => info.with_expired(self.entries.get(key).map(|v| v.is_expired())),
            None => info,
        })
    }
}

/// Store of [`TestHandle`]s with typed access for assertions.
#[derive(Default)]
pub struct TestStore {
    caches: DashMap<CacheId, Arc<TestHandle>>,
}

impl TestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Typed handle named `id`, created on first use.
    pub fn handle(&self, id: &str) -> Arc<TestHandle> {
        let id = CacheId::from(id);
        self.caches
            .entry(id.clone())
            .or_insert_with(|| Arc::new(TestHandle::new(id)))
            .value()
            .clone()
    }
}

impl CacheStore for TestStore {
    fn get_or_create(&self, name: &CacheId) -> BackendResult<Arc<dyn CacheHandle>> {
        Ok(self.handle(name.as_str()))
    }

    fn get(&self, name: &CacheId) -> Option<Arc<dyn CacheHandle>> {
        self.caches
            .get(name)
            .map(|entry| entry.value().clone() as Arc<dyn CacheHandle>)
    }
}
