//! Port interfaces for progress record storage

use async_trait::async_trait;
use slipway_domain::{ProgressRecord, RemoteError, ReworkEvent};

/// Trait for the remote `avances` collection.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Create a record document; returns the store-assigned identifier.
    async fn create_record(&self, record: &ProgressRecord) -> Result<String, RemoteError>;

    /// Records owned by the user, ordered by creation time descending.
    ///
    /// Implementations must degrade transparently to an unordered result
    /// when the backing store rejects the ordered query for lack of a
    /// composite index; callers never see that error.
    async fn records_by_user(&self, user_id: &str) -> Result<Vec<ProgressRecord>, RemoteError>;

    /// Atomically append a rework event to the embedded sequence and
    /// increment the parent's invested hours by the event's additional
    /// hours. Both effects apply together or not at all.
    async fn append_rework(
        &self,
        record_id: &str,
        event: &ReworkEvent,
    ) -> Result<(), RemoteError>;
}
