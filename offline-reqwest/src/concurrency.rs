//! Merging of concurrent cache misses for the same URL.

use std::sync::Arc;

use dashmap::DashMap;
use offline_core::CacheId;
use tokio::sync::{Mutex, OwnedMutexGuard};

type SlotKey = (CacheId, String);

/// Tracks cache misses in flight so that concurrent GETs for the same
/// `(cache, key)` dispatch once and the followers are served from the
/// response the first one stored (prevents the dogpile effect).
#[derive(Default)]
pub(crate) struct InFlight {
    slots: DashMap<SlotKey, Arc<Mutex<()>>>,
}

impl InFlight {
    /// Waits until no other request holds `(id, key)`, then holds it until the
    /// returned guard is dropped.
    pub(crate) async fn acquire(self: &Arc<Self>, id: &CacheId, key: &str) -> InFlightGuard {
        let slot_key = (id.clone(), key.to_owned());
        let slot = self.slots.entry(slot_key.clone()).or_default().clone();
        let guard = slot.lock_owned().await;
        InFlightGuard {
            in_flight: self.clone(),
            slot_key,
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.slots.len()
    }
}

/// Ownership of one `(cache, key)` slot.
pub(crate) struct InFlightGuard {
    in_flight: Arc<InFlight>,
    slot_key: SlotKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map holds the slot once no request is waiting on it.
        self.in_flight
            .slots
            .remove_if(&self.slot_key, |_, slot| Arc::strong_count(slot) == 1);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_second_request_waits_for_the_first() {
        let in_flight = Arc::new(InFlight::default());
        let id = CacheId::new("http");

        let first = in_flight.acquire(&id, "/users").await;
        let waiting = {
            let in_flight = in_flight.clone();
            let id = id.clone();
            tokio::spawn(async move {
                let _second = in_flight.acquire(&id, "/users").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        drop(first);
        tokio::time::timeout(Duration::from_secs(5), waiting)
            .await
            .expect("second request should proceed")
            .unwrap();
        assert_eq!(in_flight.len(), 0);
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_wait() {
        let in_flight = Arc::new(InFlight::default());

        let _users = in_flight.acquire(&CacheId::new("http"), "/users").await;
        let _posts = tokio::time::timeout(
            Duration::from_secs(1),
            in_flight.acquire(&CacheId::new("http"), "/posts"),
        )
        .await
        .expect("other keys are independent");
        let _other_cache = tokio::time::timeout(
            Duration::from_secs(1),
            in_flight.acquire(&CacheId::new("auth"), "/users"),
        )
        .await
        .expect("other caches are independent");
        assert_eq!(in_flight.len(), 3);
    }
}
