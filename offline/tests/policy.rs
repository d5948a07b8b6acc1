//! Interception policy decisions.

mod common;

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use http::Method;
use offline::{CacheHandle, CacheValue, Interception, OfflineConfig, OfflineError, RequestDescriptor};
use offline_core::OfflineFlag;

use common::{TestHandle, mediator, post};

fn stale() -> CacheValue<Bytes> {
    CacheValue::new(
        Bytes::from_static(b"old"),
        Some(Utc::now() - chrono::Duration::minutes(1)),
    )
}

#[tokio::test]
async fn test_offline_mutation_is_queued_and_rejected() {
    let (offline, _, _) = mediator(OfflineConfig::default(), false);

    let request = post("/items")
        .with_data(&b"{\"name\":\"a\"}"[..])
        .with_timeout(Some(std::time::Duration::from_secs(3)));
    let result = offline.intercept(&request).await;

    assert!(matches!(result, Err(OfflineError::RequestQueued)));
    let pending = offline.pending_requests().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].method(), &Method::POST);
    assert_eq!(pending[0].url(), "/items");
    assert_eq!(pending[0].data().unwrap().as_ref(), b"{\"name\":\"a\"}");
    assert_eq!(pending[0].offline(), OfflineFlag::Offline);
    assert_eq!(pending[0].timeout(), Some(std::time::Duration::from_secs(3)));
}

#[tokio::test]
async fn test_each_queued_mutation_grows_queue_by_one() {
    let (offline, _, _) = mediator(OfflineConfig::default(), false);

    for (i, method) in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE]
        .into_iter()
        .enumerate()
    {
        let request = RequestDescriptor::new(method, format!("/items/{i}")).with_offline(true);
        let result = offline.intercept(&request).await;
        assert!(result.unwrap_err().is_request_queued());
        assert_eq!(offline.pending().await.unwrap(), i + 1);
    }
}

#[tokio::test]
async fn test_explicit_online_get_passes_through_untouched() {
    let config = OfflineConfig::builder()
        .always_offline(true)
        .always_refresh(true)
        .build();
    let (offline, store, _) = mediator(config, true);
    let cache = store.handle("http");
    cache.seed("/users", stale());

    let request = RequestDescriptor::get("/users").with_offline(false);
    let decision = offline.intercept(&request).await.unwrap();

    assert!(decision.is_pass_through());
    assert!(cache.removed().is_empty());
    assert!(cache.contains("/users"));
    assert_eq!(offline.pending().await.unwrap(), 0);
}

#[tokio::test]
async fn test_unset_flag_without_always_offline_passes_through() {
    let (offline, _, _) = mediator(OfflineConfig::default(), false);

    let request = RequestDescriptor::new(Method::POST, "/items");
    let decision = offline.intercept(&request).await.unwrap();

    assert!(decision.is_pass_through());
    assert_eq!(offline.pending().await.unwrap(), 0);
}

#[tokio::test]
async fn test_excluded_cache_always_passes_through() {
    let config = OfflineConfig::builder()
        .always_offline(true)
        .exclude_cache_id("X")
        .build();

    for online in [true, false] {
        let (offline, store, _) = mediator(config.clone(), online);
        let excluded = store.handle("X");
        excluded.seed("/x", stale());

        let get = RequestDescriptor::get("/x").with_cache("X");
        assert!(offline.intercept(&get).await.unwrap().is_pass_through());

        let post = RequestDescriptor::new(Method::POST, "/x").with_cache("X");
        assert!(offline.intercept(&post).await.unwrap().is_pass_through());

        let handle: Arc<dyn CacheHandle> = Arc::new(TestHandle::new("X"));
        let by_handle = RequestDescriptor::new(Method::PUT, "/x").with_cache(handle);
        assert!(offline.intercept(&by_handle).await.unwrap().is_pass_through());

        assert_eq!(offline.pending().await.unwrap(), 0);
        assert!(excluded.removed().is_empty());
    }
}

#[tokio::test]
async fn test_online_mutation_passes_through() {
    let config = OfflineConfig::builder().always_offline(true).build();
    let (offline, _, _) = mediator(config, true);

    let decision = offline.intercept(&post("/items")).await.unwrap();

    assert!(decision.is_pass_through());
    assert_eq!(offline.pending().await.unwrap(), 0);
}

#[tokio::test]
async fn test_offline_get_uses_cache_without_maintenance() {
    let config = OfflineConfig::builder().always_refresh(true).build();
    let (offline, store, _) = mediator(config, false);
    let cache = store.handle("http");
    cache.seed("/users", stale());

    let request = RequestDescriptor::get("/users").with_offline(true);
    let decision = offline.intercept(&request).await.unwrap();

    match decision {
        Interception::Cached {
            cache: handle,
            id,
            key,
        } => {
            assert_eq!(key, "/users");
            assert_eq!(id.as_str(), "http");
            let info = handle.info(None).await.unwrap();
            assert_eq!(info.id.as_str(), "http");
        }
        Interception::PassThrough => panic!("expected the cache path"),
    }
    assert!(cache.removed().is_empty());
    assert_eq!(offline.pending().await.unwrap(), 0);
}

#[tokio::test]
async fn test_named_cache_selector() {
    let config = OfflineConfig::builder().always_offline(true).build();
    let (offline, _, _) = mediator(config, false);

    let request = RequestDescriptor::get("/posts").with_cache("posts");
    let decision = offline.intercept(&request).await.unwrap();

    let handle = decision.cache().expect("cache path");
    assert_eq!(handle.info(None).await.unwrap().id.as_str(), "posts");
}

#[tokio::test]
async fn test_default_cache_follows_config() {
    let config = OfflineConfig::builder()
        .always_offline(true)
        .default_cache("responses")
        .build();
    let (offline, _, _) = mediator(config, true);

    let decision = offline.intercept(&RequestDescriptor::get("/a")).await.unwrap();

    let handle = decision.cache().expect("cache path");
    assert_eq!(handle.info(None).await.unwrap().id.as_str(), "responses");
}
