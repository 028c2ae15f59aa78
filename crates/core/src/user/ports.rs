//! Port interfaces for user profile storage
//!
//! These traits define the boundaries between core business logic and
//! infrastructure implementations for profile operations.

use async_trait::async_trait;
use slipway_domain::{RemoteError, Role, UserProfile};

/// Trait for the remote `users` collection.
#[async_trait]
pub trait RemoteUserStore: Send + Sync {
    /// Write a full profile document keyed by the account id and return the
    /// stored document (server timestamps applied).
    async fn create_profile(
        &self,
        id: &str,
        profile: &UserProfile,
    ) -> Result<UserProfile, RemoteError>;

    /// Fetch a profile; `None` when the document does not exist (distinct
    /// from an error).
    async fn fetch_profile(&self, id: &str) -> Result<Option<UserProfile>, RemoteError>;

    /// Merge-write a profile (partial update, server `updatedAt`).
    async fn merge_profile(&self, id: &str, profile: &UserProfile) -> Result<(), RemoteError>;

    /// Update only the role field. Role validity is guaranteed by the closed
    /// enum before any network call.
    async fn update_role(&self, id: &str, rol: Role) -> Result<(), RemoteError>;

    /// All profiles (lead administration view).
    async fn list_profiles(&self) -> Result<Vec<UserProfile>, RemoteError>;

    /// Profiles filtered by role.
    async fn profiles_by_role(&self, rol: Role) -> Result<Vec<UserProfile>, RemoteError>;
}

/// Cached profile snapshot flagged for a later push, with its sweep budget.
#[derive(Debug, Clone)]
pub struct PendingProfile {
    pub profile: UserProfile,
    /// Failed sweep attempts so far.
    pub attempts: u32,
}

/// Trait for the local profile cache.
///
/// The cache is best-effort by contract: storage failures and corrupt
/// entries are handled inside the implementation (logged, treated as a
/// miss) and never surface to callers.
#[async_trait]
pub trait ProfileCache: Send + Sync {
    /// Snapshot for the given account id, if one is readable.
    async fn get(&self, id: &str) -> Option<UserProfile>;

    /// Store a snapshot. Failures are logged, not returned.
    async fn put(&self, profile: &UserProfile);

    /// All snapshots flagged `pending_sync`, with their attempt counts.
    async fn pending_profiles(&self) -> Vec<PendingProfile>;

    /// Record a failed sweep attempt; returns the updated count.
    async fn record_failed_attempt(&self, id: &str) -> u32;

    /// Replace the snapshot with its synced form and reset the attempt
    /// counter.
    async fn mark_synced(&self, profile: &UserProfile);

    /// Dead-letter: clear the pending flag without syncing, keeping the
    /// snapshot readable.
    async fn abandon_pending(&self, id: &str);
}
