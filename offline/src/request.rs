//! Intercepted request descriptor.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, Method};
use offline_backend::CacheHandle;
use offline_core::{CacheId, OfflineFlag, PendingRequest};

/// Which response cache a request uses.
#[derive(Clone, Default)]
pub enum CacheSelector {
    /// The cache named by `OfflineConfig::default_cache`.
    #[default]
    Default,
    /// A cache looked up in the store by name.
    Named(CacheId),
    /// A handle supplied by the caller.
    Handle(Arc<dyn CacheHandle>),
}

impl fmt::Debug for CacheSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheSelector::Default => f.write_str("Default"),
            CacheSelector::Named(id) => f.debug_tuple("Named").field(id).finish(),
            CacheSelector::Handle(_) => f.write_str("Handle(..)"),
        }
    }
}

impl From<CacheId> for CacheSelector {
    fn from(id: CacheId) -> Self {
        CacheSelector::Named(id)
    }
}

impl From<&str> for CacheSelector {
    fn from(id: &str) -> Self {
        CacheSelector::Named(CacheId::from(id))
    }
}

impl From<Arc<dyn CacheHandle>> for CacheSelector {
    fn from(handle: Arc<dyn CacheHandle>) -> Self {
        CacheSelector::Handle(handle)
    }
}

/// Outgoing request as seen by the interception policy.
///
/// ```
/// use http::Method;
/// use offline::RequestDescriptor;
/// use offline_core::OfflineFlag;
///
/// let request = RequestDescriptor::new(Method::POST, "https://api.example.com/items")
///     .with_data(&b"{}"[..])
///     .with_offline(OfflineFlag::Offline)
///     .with_cache("items");
///
/// assert!(!request.is_get());
/// ```
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    url: String,
    headers: HeaderMap,
    data: Option<Bytes>,
    offline: OfflineFlag,
    cache: CacheSelector,
    timeout: Option<Duration>,
}

impl RequestDescriptor {
    /// Descriptor with no body, headers, flag, or timeout, using the default cache.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        RequestDescriptor {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            data: None,
            offline: OfflineFlag::Unset,
            cache: CacheSelector::Default,
            timeout: None,
        }
    }

    /// Shorthand for a GET descriptor.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Sets the headers.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the body.
    pub fn with_data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Sets the per-request offline flag.
    pub fn with_offline(mut self, offline: impl Into<OfflineFlag>) -> Self {
        self.offline = offline.into();
        self
    }

    /// Selects the response cache.
    pub fn with_cache(mut self, cache: impl Into<CacheSelector>) -> Self {
        self.cache = cache.into();
        self
    }

    /// Sets the timeout carried into the queued record.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Target URL; also the response cache key.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Request body.
    pub fn data(&self) -> Option<&Bytes> {
        self.data.as_ref()
    }

    /// Per-request offline flag.
    pub fn offline(&self) -> OfflineFlag {
        self.offline
    }

    /// Selected response cache.
    pub fn cache(&self) -> &CacheSelector {
        &self.cache
    }

    /// Request timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Whether this is a GET request.
    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    /// Record stored in the replay queue for this request.
    pub fn to_pending(&self) -> PendingRequest {
        let record = PendingRequest::new(self.method.clone(), self.url.clone())
            .with_headers(self.headers.clone())
            .with_offline(self.offline)
            .with_timeout(self.timeout);
        match &self.data {
            Some(data) => record.with_data(data.clone()),
            None => record,
        }
    }
}
