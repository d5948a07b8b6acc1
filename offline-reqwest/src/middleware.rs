//! Offline middleware for reqwest-middleware.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::Extensions;
use http::header::HeaderValue;
use offline::{Interception, Offline, RequestDescriptor};
use offline_backend::CacheHandle;
use offline_core::{CacheId, CacheValue};
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};
use tracing::warn;

use crate::concurrency::InFlight;
use crate::options::OfflineOptions;
use crate::response::CachedResponse;

/// Header reporting whether a response came from the response cache.
pub const CACHE_STATUS_HEADER: &str = "X-Offline-Cache";

/// Offline middleware for reqwest-middleware.
///
/// Each request is classified by the [`Offline`] mediator:
///
/// - pass-through requests go to the next middleware untouched;
/// - cached GETs are served from the response cache on a hit, otherwise
///   sent and stored when the status is a success. Concurrent misses for the
///   same URL are sent once; the others wait and are served from the cache;
/// - mutating requests issued while offline are queued and fail with
///   `reqwest_middleware::Error::Middleware` wrapping
///   [`OfflineError::RequestQueued`](offline::OfflineError::RequestQueued).
#[derive(Clone)]
pub struct OfflineMiddleware {
    offline: Offline,
    ttl: Option<Duration>,
    in_flight: Arc<InFlight>,
}

impl OfflineMiddleware {
    /// Create a new middleware over `offline`. Cached responses never expire.
    pub fn new(offline: Offline) -> Self {
        Self {
            offline,
            ttl: None,
            in_flight: Arc::new(InFlight::default()),
        }
    }

    /// Time-to-live of stored responses.
    ///
    /// Expired responses are still served offline and evicted by the next
    /// online GET for the same URL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// The mediator.
    pub fn offline(&self) -> &Offline {
        &self.offline
    }

    #[allow(clippy::too_many_arguments)]
    async fn cached(
        &self,
        cache: Arc<dyn CacheHandle>,
        id: CacheId,
        key: String,
        ttl: Option<Duration>,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        if let Some(hit) = lookup(cache.as_ref(), &key).await {
            return Ok(hit.into_response(HeaderValue::from_static("HIT")));
        }

        let _slot = self.in_flight.acquire(&id, &key).await;
        // A request for the same URL may have stored the response meanwhile.
        if let Some(hit) = lookup(cache.as_ref(), &key).await {
            return Ok(hit.into_response(HeaderValue::from_static("HIT")));
        }

        let response = next.run(req, extensions).await?;
        let status = response.status();
        if !status.is_success() {
            if let Err(error) = cache.remove(&key).await {
                warn!(key = %key, %error, "response cache eviction failed");
            }
            return Ok(with_cache_status(response, "MISS"));
        }

        let headers = response.headers().clone();
        let body = response.bytes().await?;
        let stored = CachedResponse::new(status, headers, body);
        if let Err(error) = store(cache.as_ref(), &key, &stored, ttl).await {
            warn!(key = %key, %error, "response cache write failed");
        }
        Ok(stored.into_response(HeaderValue::from_static("MISS")))
    }
}

async fn lookup(cache: &dyn CacheHandle, key: &str) -> Option<CachedResponse> {
    match cache.get(key).await {
        Ok(Some(value)) => match CachedResponse::decode(value.data()) {
            Ok(hit) => Some(hit),
            Err(error) => {
                warn!(key, %error, "undecodable cached response");
                None
            }
        },
        Ok(None) => None,
        Err(error) => {
            warn!(key, %error, "response cache lookup failed");
            None
        }
    }
}

async fn store(
    cache: &dyn CacheHandle,
    key: &str,
    response: &CachedResponse,
    ttl: Option<Duration>,
) -> offline_backend::BackendResult<()> {
    let raw = response.encode()?;
    let value = match ttl {
        Some(ttl) => CacheValue::with_ttl(raw, ttl),
        None => CacheValue::permanent(raw),
    };
    cache.put(key, value).await
}

fn with_cache_status(mut response: Response, status: &'static str) -> Response {
    response
        .headers_mut()
        .insert(CACHE_STATUS_HEADER, HeaderValue::from_static(status));
    response
}

fn describe(req: &Request, options: &OfflineOptions) -> RequestDescriptor {
    let descriptor = RequestDescriptor::new(req.method().clone(), req.url().as_str())
        .with_headers(req.headers().clone())
        .with_offline(options.flag())
        .with_cache(options.cache().clone())
        .with_timeout(req.timeout().copied());
    match req.body().and_then(|body| body.as_bytes()) {
        Some(data) => descriptor.with_data(Bytes::copy_from_slice(data)),
        None => descriptor,
    }
}

#[async_trait]
impl Middleware for OfflineMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        let options = extensions
            .get::<OfflineOptions>()
            .cloned()
            .unwrap_or_default();
        let descriptor = describe(&req, &options);

        match self.offline.intercept(&descriptor).await {
            Ok(Interception::PassThrough) => next.run(req, extensions).await,
            Ok(Interception::Cached { cache, id, key }) => {
                let ttl = options.ttl().or(self.ttl);
                self.cached(cache, id, key, ttl, req, extensions, next)
                    .await
            }
            Err(error) => Err(reqwest_middleware::Error::middleware(error)),
        }
    }
}
