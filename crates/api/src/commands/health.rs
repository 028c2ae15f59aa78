//! Health check command.

use std::sync::Arc;
use std::time::Instant;

use crate::context::AppContext;
use crate::utils::health::HealthStatus;
use crate::utils::logging::log_command_execution;

/// Probe the context's components.
pub async fn health_check(context: &Arc<AppContext>) -> HealthStatus {
    let started = Instant::now();

    let status = context.health_check().await;

    log_command_execution("health::health_check", started.elapsed(), status.healthy);
    status
}
