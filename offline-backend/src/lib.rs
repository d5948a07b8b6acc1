//! Traits and structs for storage interaction.
//!
//! If you want to keep cached responses or the replay queue somewhere
//! specific, implement [`CacheHandle`] and [`CacheStore`].
mod error;
mod handle;
mod store;

pub use error::{BackendError, BoxError};
pub use handle::{BackendResult, CacheHandle, CacheInfo};
pub use store::CacheStore;

/// Status of deleting result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStatus {
    /// Record successfully deleted.
    Deleted(u32),
    /// Record already missing.
    Missing,
}

impl DeleteStatus {
    /// Whether a record was actually removed.
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteStatus::Deleted(_))
    }
}
