mod common;

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use common::{ErrorHandle, TestHandle, TestStore};
use offline_backend::{BackendError, CacheHandle, CacheStore, DeleteStatus};
use offline_core::{CacheId, CacheValue};

#[tokio::test]
async fn test_trait_object_forwarding() {
    let handle: Arc<dyn CacheHandle> = Arc::new(TestHandle::new("http"));
    let boxed: Box<dyn CacheHandle> = Box::new(TestHandle::new("boxed"));

    handle
        .put("/a", CacheValue::permanent(Bytes::from_static(b"a")))
        .await
        .unwrap();
    boxed
        .put("/b", CacheValue::permanent(Bytes::from_static(b"b")))
        .await
        .unwrap();

    assert_eq!(
        handle.get("/a").await.unwrap().unwrap().data().as_ref(),
        b"a"
    );
    assert_eq!(boxed.info(None).await.unwrap().id, CacheId::new("boxed"));
    assert_eq!(handle.remove("/a").await.unwrap(), DeleteStatus::Deleted(1));
    assert_eq!(handle.remove("/a").await.unwrap(), DeleteStatus::Missing);
}

#[tokio::test]
async fn test_info_reports_expiry() {
    let handle = TestHandle::new("http");
    let expired = CacheValue::new(
        Bytes::from_static(b"old"),
        Some(Utc::now() - chrono::Duration::seconds(1)),
    );
    handle.put("/old", expired).await.unwrap();
    handle
        .put("/fresh", CacheValue::permanent(Bytes::from_static(b"new")))
        .await
        .unwrap();

    assert!(handle.info(Some("/old")).await.unwrap().expired());
    assert!(!handle.info(Some("/fresh")).await.unwrap().expired());
    assert_eq!(handle.info(Some("/missing")).await.unwrap().is_expired, None);
    assert_eq!(handle.info(None).await.unwrap().size, Some(2));
}

#[tokio::test]
async fn test_store_returns_same_entries_for_same_name() {
    let store = TestStore::default();
    let name = CacheId::new("offline-request-stack");
    assert!(store.get(&name).is_none());

    let first = store.get_or_create(&name).unwrap();
    first
        .put("stack", CacheValue::permanent(Bytes::from_static(b"[]")))
        .await
        .unwrap();

    let second = store.get(&name).unwrap();
    assert!(second.get("stack").await.unwrap().is_some());
}

#[tokio::test]
async fn test_error_handle_reports_internal_error() {
    let handle = ErrorHandle;
    let err = handle.get("/x").await.unwrap_err();
    assert!(matches!(err, BackendError::InternalError(_)));
    assert_eq!(err.to_string(), "simulated error");
}
