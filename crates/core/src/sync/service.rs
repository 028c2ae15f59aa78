//! Pending-profile sweep
//!
//! Scans the local cache for profiles created while offline and pushes each
//! to the remote store as a merge write. Attempts are bounded: an entry that
//! keeps failing is dead-lettered (logged and dropped from the pending set)
//! instead of retried forever.

use std::sync::Arc;

use slipway_common::RetryStrategy;
use tracing::{debug, info, warn};

use crate::user::ports::{ProfileCache, RemoteUserStore};

/// Counters for one sweep pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub synced: u32,
    pub failed: u32,
    pub dead_lettered: u32,
}

impl SweepSummary {
    /// Whether any entry is still pending after this pass.
    pub fn has_retryable_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Sweeps `pending_sync` profiles to the remote store.
pub struct PendingProfileSync {
    remote: Arc<dyn RemoteUserStore>,
    cache: Arc<dyn ProfileCache>,
    strategy: RetryStrategy,
}

impl PendingProfileSync {
    /// Create a sweep over the given adapters.
    pub fn new(
        remote: Arc<dyn RemoteUserStore>,
        cache: Arc<dyn ProfileCache>,
        strategy: RetryStrategy,
    ) -> Self {
        Self { remote, cache, strategy }
    }

    /// The retry bounds in effect.
    pub fn strategy(&self) -> &RetryStrategy {
        &self.strategy
    }

    /// Run one sweep pass over every pending profile.
    ///
    /// Each entry is pushed as a merge write with the local-only flags
    /// stripped. Failures leave the flag set for a later pass; entries past
    /// the attempt budget are dropped from the pending set.
    pub async fn sweep(&self) -> SweepSummary {
        let pending = self.cache.pending_profiles().await;
        if pending.is_empty() {
            debug!("no pending profiles to sync");
            return SweepSummary::default();
        }

        info!(count = pending.len(), "syncing pending profiles");
        let mut summary = SweepSummary::default();

        for entry in pending {
            let id = entry.profile.id.clone();

            if !self.strategy.allows(entry.attempts) {
                warn!(
                    id = %id,
                    attempts = entry.attempts,
                    "pending profile exhausted its attempt budget, dropping"
                );
                self.cache.abandon_pending(&id).await;
                summary.dead_lettered += 1;
                continue;
            }

            let payload = entry.profile.without_local_flags();
            match self.remote.merge_profile(&id, &payload).await {
                Ok(()) => {
                    self.cache.mark_synced(&payload).await;
                    debug!(id = %id, "pending profile synced");
                    summary.synced += 1;
                }
                Err(err) => {
                    let attempts = self.cache.record_failed_attempt(&id).await;
                    warn!(id = %id, attempts, error = %err, "pending profile sync failed");
                    if self.strategy.allows(attempts) {
                        summary.failed += 1;
                    } else {
                        warn!(id = %id, attempts, "attempt budget exhausted, dropping");
                        self.cache.abandon_pending(&id).await;
                        summary.dead_lettered += 1;
                    }
                }
            }
        }

        info!(
            synced = summary.synced,
            failed = summary.failed,
            dead_lettered = summary.dead_lettered,
            "sweep completed"
        );
        summary
    }
}
