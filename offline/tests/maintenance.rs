//! Cache maintenance on the online GET path.

mod common;

use bytes::Bytes;
use chrono::Utc;
use offline::maintenance::clean;
use offline::{CacheValue, OfflineConfig, RequestDescriptor};
use offline_backend::DeleteStatus;

use common::{TestHandle, mediator};

fn fresh() -> CacheValue<Bytes> {
    CacheValue::new(
        Bytes::from_static(b"fresh"),
        Some(Utc::now() + chrono::Duration::hours(1)),
    )
}

fn stale() -> CacheValue<Bytes> {
    CacheValue::new(
        Bytes::from_static(b"stale"),
        Some(Utc::now() - chrono::Duration::seconds(1)),
    )
}

#[tokio::test]
async fn test_fresh_entry_is_kept() {
    let cache = TestHandle::new("http");
    cache.seed("/users", fresh());

    let status = clean(&OfflineConfig::default(), &cache, "/users")
        .await
        .unwrap();

    assert_eq!(status, None);
    assert!(cache.removed().is_empty());
    assert!(cache.contains("/users"));
}

#[tokio::test]
async fn test_expired_entry_is_evicted_once() {
    let cache = TestHandle::new("http");
    cache.seed("/users", stale());
    cache.seed("/posts", stale());

    let status = clean(&OfflineConfig::default(), &cache, "/users")
        .await
        .unwrap();

    assert_eq!(status, Some(DeleteStatus::Deleted(1)));
    assert_eq!(cache.removed(), vec!["/users".to_owned()]);
    assert!(cache.contains("/posts"));
}

#[tokio::test]
async fn test_always_refresh_evicts_fresh_entry() {
    let config = OfflineConfig::builder().always_refresh(true).build();
    let cache = TestHandle::new("http");
    cache.seed("/users", fresh());

    let status = clean(&config, &cache, "/users").await.unwrap();

    assert_eq!(status, Some(DeleteStatus::Deleted(1)));
    assert!(!cache.contains("/users"));
}

#[tokio::test]
async fn test_missing_entry_is_left_alone() {
    let cache = TestHandle::new("http");

    let status = clean(&OfflineConfig::default(), &cache, "/none")
        .await
        .unwrap();

    assert_eq!(status, None);
    assert!(cache.removed().is_empty());
}

#[tokio::test]
async fn test_online_get_runs_maintenance() {
    let config = OfflineConfig::builder().always_offline(true).build();
    let (offline, store, _) = mediator(config, true);
    let cache = store.handle("http");
    cache.seed("/users", stale());
    cache.seed("/posts", fresh());

    offline
        .intercept(&RequestDescriptor::get("/users"))
        .await
        .unwrap();
    offline
        .intercept(&RequestDescriptor::get("/posts"))
        .await
        .unwrap();

    assert_eq!(cache.removed(), vec!["/users".to_owned()]);
    assert!(cache.contains("/posts"));
}
