//! Explicit pending-sync invocation.

use std::sync::Arc;
use std::time::Instant;

use slipway_core::SweepSummary;

use crate::context::AppContext;
use crate::utils::logging::log_command_execution;

/// Run one pending-profile sweep pass right now.
///
/// The background worker covers offline-to-online transitions; this is the
/// manual trigger.
pub async fn sync_pending_profiles(context: &Arc<AppContext>) -> Result<SweepSummary, String> {
    let started = Instant::now();

    let summary = context.sweep.sweep().await;

    log_command_execution("sync::sync_pending_profiles", started.elapsed(), true);
    Ok(summary)
}
