//! Cache identifier type.
//!
//! `CacheId` names one cache handle inside a store. The interception policy
//! compares it against the configured exclusion set, and the replay queue uses
//! it to locate its reserved cache.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// Identifier of a cache handle.
///
/// Used for:
/// - Store lookups in `CacheStore::get_or_create`
/// - Exclusion checks against `exclude_cache_ids`
/// - Reporting the owning cache in `CacheInfo::id`
///
/// # Example
/// ```
/// use offline_core::CacheId;
///
/// let id = CacheId::new("http");
/// assert_eq!(id.as_str(), "http");
/// assert_eq!(id.scoped("/users"), "4:http:/users");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheId(SmolStr);

impl CacheId {
    /// Creates a new cache identifier.
    #[inline]
    pub fn new(s: impl Into<SmolStr>) -> Self {
        Self(s.into())
    }

    /// Creates a cache identifier from a static string (no allocation).
    #[inline]
    pub const fn new_static(s: &'static str) -> Self {
        Self(SmolStr::new_static(s))
    }

    /// Returns the identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Physical key `{len}:{id}:{key}` of `key` in this cache.
    ///
    /// Stores that keep several named caches in one keyspace use this to
    /// namespace entries. The byte length of the identifier comes first, so
    /// distinct `(id, key)` pairs never map to the same string.
    pub fn scoped(&self, key: &str) -> String {
        format!("{}:{}:{}", self.0.len(), self.0, key)
    }
}

impl fmt::Display for CacheId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for CacheId {
    #[inline]
    fn from(s: &str) -> Self {
        Self(SmolStr::new(s))
    }
}

impl From<String> for CacheId {
    #[inline]
    fn from(s: String) -> Self {
        Self(SmolStr::from(s))
    }
}

impl From<SmolStr> for CacheId {
    #[inline]
    fn from(s: SmolStr) -> Self {
        Self(s)
    }
}

impl AsRef<str> for CacheId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for CacheId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_static() {
        let id = CacheId::new_static("offline-request-stack");
        assert_eq!(id.as_str(), "offline-request-stack");
    }

    #[test]
    fn test_scoped_keeps_key_verbatim() {
        let id = CacheId::new("http");
        assert_eq!(id.scoped("/api/items"), "4:http:/api/items");
        assert_ne!(id.scoped("/a"), id.scoped("a"));
    }

    #[test]
    fn test_scoped_pairs_do_not_collide() {
        assert_ne!(CacheId::new("a").scoped("b/c"), CacheId::new("a/b").scoped("c"));
        assert_ne!(CacheId::new("a").scoped("b:c"), CacheId::new("a:b").scoped("c"));
        assert_ne!(CacheId::new("1:a").scoped("b"), CacheId::new("1").scoped("a:b"));
    }

    #[test]
    fn test_borrow_lookup() {
        let mut set = std::collections::HashSet::new();
        set.insert(CacheId::new("X"));
        assert!(set.contains("X"));
        assert!(!set.contains("Y"));
    }

    #[test]
    fn test_serde_transparent() {
        let id: CacheId = serde_json::from_str("\"templates\"").unwrap();
        assert_eq!(id, CacheId::new("templates"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"templates\"");
    }
}
