use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use feoxdb::FeoxStore;
use offline_backend::{BackendResult, CacheHandle, CacheStore};
use offline_core::CacheId;
use tracing::debug;

use crate::{FeOxDbCache, FeOxDbError};

/// Disk-based cache store using FeOxDB.
///
/// All named caches live in one database file. Use this store when the
/// replay queue must survive restarts; for pure speed without persistence,
/// prefer `MokaStore`.
///
/// ```no_run
/// use offline_feoxdb::FeOxDbStore;
///
/// let store = FeOxDbStore::builder()
///     .path("/var/lib/myapp/offline")
///     .max_file_size(1024 * 1024 * 1024) // 1 GB
///     .max_memory(64 * 1024 * 1024)      // 64 MB
///     .build()?;
/// # Ok::<(), offline_feoxdb::FeOxDbError>(())
/// ```
pub struct FeOxDbStore {
    store: Arc<FeoxStore>,
    caches: DashMap<CacheId, Arc<FeOxDbCache>>,
    evict_expired: bool,
    name: String,
}

impl FeOxDbStore {
    /// Starts building a new store.
    pub fn builder() -> FeOxDbStoreBuilder {
        FeOxDbStoreBuilder::default()
    }

    /// In-memory store for tests.
    ///
    /// Data is lost when dropped. Equivalent to `builder().build()`.
    ///
    /// ```
    /// use offline_feoxdb::FeOxDbStore;
    ///
    /// let store = FeOxDbStore::in_memory().expect("Failed to create in-memory store");
    /// ```
    pub fn in_memory() -> Result<Self, FeOxDbError> {
        Self::builder().build()
    }

    /// Forces pending writes to disk.
    ///
    /// FeOxDB buffers writes and flushes them periodically (~100ms). No-op in
    /// memory-only mode.
    pub fn flush(&self) {
        self.store.flush();
    }
}

impl CacheStore for FeOxDbStore {
    fn get_or_create(&self, name: &CacheId) -> BackendResult<Arc<dyn CacheHandle>> {
        let cache = self
            .caches
            .entry(name.clone())
            .or_insert_with(|| {
                debug!(store = %self.name, cache = %name, "opening cache");
                Arc::new(FeOxDbCache::new(
                    name.clone(),
                    self.store.clone(),
                    self.evict_expired,
                ))
            })
            .value()
            .clone();
        Ok(cache)
    }

    fn get(&self, name: &CacheId) -> Option<Arc<dyn CacheHandle>> {
        self.caches
            .get(name)
            .map(|entry| entry.value().clone() as Arc<dyn CacheHandle>)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for [`FeOxDbStore`].
pub struct FeOxDbStoreBuilder {
    path: Option<PathBuf>,
    max_file_size: Option<u64>,
    max_memory: Option<usize>,
    evict_expired: bool,
    name: String,
}

impl Default for FeOxDbStoreBuilder {
    fn default() -> Self {
        Self {
            path: None,
            max_file_size: None,
            max_memory: None,
            evict_expired: false,
            name: "feoxdb".to_owned(),
        }
    }
}

impl FeOxDbStoreBuilder {
    /// Enables persistent storage at the given path.
    ///
    /// Without this, data lives only in memory and is lost on restart.
    /// If path is a directory, creates `offline.db` inside it. Missing parent
    /// directories are created.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Pre-allocates disk space and caps maximum storage.
    ///
    /// Writes fail when full. Ignored in memory-only mode.
    ///
    /// Default: 1 GB
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }

    /// Limits RAM usage.
    ///
    /// FeOxDB has no automatic eviction; writes fail with `OutOfMemory` when
    /// the limit is reached.
    ///
    /// Default: 1 GB
    pub fn max_memory(mut self, bytes: usize) -> Self {
        self.max_memory = Some(bytes);
        self
    }

    /// Lets FeOxDB drop entries once their expiry passes.
    ///
    /// Disabled by default so expired responses stay available offline.
    pub fn evict_expired(mut self, enabled: bool) -> Self {
        self.evict_expired = enabled;
        self
    }

    /// Identifies this store in logs.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Creates the store.
    ///
    /// Fails if the database file can't be opened or created.
    pub fn build(self) -> Result<FeOxDbStore, FeOxDbError> {
        let mut builder = FeoxStore::builder().enable_ttl(true);

        if let Some(mut path) = self.path {
            if path.is_dir() {
                path.push("offline.db");
            } else if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            builder = builder.device_path(path.to_string_lossy().to_string());
        }

        if let Some(file_size) = self.max_file_size {
            if file_size == 0 {
                return Err(FeOxDbError::InvalidConfig(
                    "max_file_size must be greater than zero".to_owned(),
                ));
            }
            builder = builder.file_size(file_size);
        }

        if let Some(memory) = self.max_memory {
            builder = builder.max_memory(memory);
        }

        let store = builder.build()?;

        Ok(FeOxDbStore {
            store: Arc::new(store),
            caches: DashMap::new(),
            evict_expired: self.evict_expired,
            name: self.name,
        })
    }
}
