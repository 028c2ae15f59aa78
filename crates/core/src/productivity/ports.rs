//! Port interfaces for productivity event storage

use async_trait::async_trait;
use slipway_domain::{ProductivityEvent, RemoteError};

/// Trait for the remote `productividad` collection.
#[async_trait]
pub trait ProductivityStore: Send + Sync {
    /// Create an event document; returns the store-assigned identifier.
    async fn create_event(&self, event: &ProductivityEvent) -> Result<String, RemoteError>;

    /// All events, ordered by creation time descending, with the same
    /// unordered degraded mode as progress records.
    async fn list_events(&self) -> Result<Vec<ProductivityEvent>, RemoteError>;
}

/// Trait for the local productivity event store.
///
/// Best-effort by contract, like the profile cache: failures are logged
/// inside the implementation and treated as absent data.
#[async_trait]
pub trait ProductivityLocalStore: Send + Sync {
    /// Persist (or replace) an event row.
    async fn save(&self, event: &ProductivityEvent);

    /// Events still flagged `pending_sync`.
    async fn pending(&self) -> Vec<ProductivityEvent>;

    /// Flip an event to synced after a successful remote create.
    async fn mark_synced(&self, id: &str);

    /// Every locally stored event.
    async fn all(&self) -> Vec<ProductivityEvent>;
}
