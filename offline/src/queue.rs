//! Durable FIFO of deferred requests.
//!
//! The whole queue is stored as one JSON array under a reserved key of a
//! cache handle. Every operation reads the snapshot, changes it and writes it
//! back while holding the queue's mutex, so the stored array is always a
//! complete snapshot and no record is duplicated or skipped.

use std::sync::Arc;

use bytes::Bytes;
use offline_backend::{CacheHandle, CacheStore};
use offline_core::{CacheValue, PendingRequest};
use tokio::sync::Mutex;

use crate::config::QueueConfig;
use crate::{OfflineError, OfflineResult};

/// Replay queue stored under one key of a cache handle.
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use http::Method;
/// use offline::ReplayQueue;
/// use offline::config::QueueConfig;
/// use offline_core::PendingRequest;
/// use offline_moka::MokaStore;
///
/// let store = MokaStore::new(100);
/// let queue = ReplayQueue::from_store(&store, &QueueConfig::default())?;
///
/// queue.append(PendingRequest::new(Method::POST, "/a")).await?;
/// queue.append(PendingRequest::new(Method::POST, "/b")).await?;
///
/// assert_eq!(queue.take_first().await?.url(), "/a");
/// assert_eq!(queue.len().await?, 1);
/// # Ok(())
/// # }
/// ```
pub struct ReplayQueue {
    cache: Arc<dyn CacheHandle>,
    key: String,
    lock: Mutex<()>,
}

impl ReplayQueue {
    /// Queue stored under `key` of `cache`.
    pub fn new(cache: Arc<dyn CacheHandle>, key: impl Into<String>) -> Self {
        ReplayQueue {
            cache,
            key: key.into(),
            lock: Mutex::new(()),
        }
    }

    /// Queue at the location named by `config`, creating its cache on first use.
    pub fn from_store(store: &dyn CacheStore, config: &QueueConfig) -> OfflineResult<Self> {
        let cache = store.get_or_create(&config.cache)?;
        Ok(Self::new(cache, config.key.clone()))
    }

    /// Reserved key holding the snapshot.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Appends `record` at the tail.
    ///
    /// The record is durable in the backing cache when this returns. Returns
    /// the new queue length.
    pub async fn append(&self, record: PendingRequest) -> OfflineResult<usize> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        records.push(record);
        self.save(&records).await?;
        Ok(records.len())
    }

    /// Removes and returns the head record.
    ///
    /// Fails with [`OfflineError::EmptyQueue`] when there is nothing to take.
    pub async fn take_first(&self) -> OfflineResult<PendingRequest> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        if records.is_empty() {
            return Err(OfflineError::EmptyQueue);
        }
        let first = records.remove(0);
        self.save(&records).await?;
        Ok(first)
    }

    /// Number of queued records.
    pub async fn len(&self) -> OfflineResult<usize> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.len())
    }

    /// Whether no record is queued.
    pub async fn is_empty(&self) -> OfflineResult<bool> {
        Ok(self.len().await? == 0)
    }

    /// Queued records in replay order, without removing them.
    pub async fn peek_all(&self) -> OfflineResult<Vec<PendingRequest>> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// Drops every queued record. Returns how many were dropped.
    pub async fn clear(&self) -> OfflineResult<usize> {
        let _guard = self.lock.lock().await;
        let dropped = self.load().await?.len();
        self.cache.remove(&self.key).await?;
        Ok(dropped)
    }

    async fn load(&self) -> OfflineResult<Vec<PendingRequest>> {
        match self.cache.get(&self.key).await? {
            Some(value) => Ok(serde_json::from_slice(value.data())?),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, records: &[PendingRequest]) -> OfflineResult<()> {
        let snapshot = Bytes::from(serde_json::to_vec(records)?);
        self.cache
            .put(&self.key, CacheValue::permanent(snapshot))
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for ReplayQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplayQueue")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
