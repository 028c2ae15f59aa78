//! Command execution logging helpers.

use std::time::Duration;

use slipway_domain::SlipwayError;
use tracing::{info, warn};

/// Log the outcome of a command execution with structured fields.
///
/// `command` is the logical command identifier (e.g.
/// `"records::create_progress_record"`). Callers must not forward sensitive
/// values in it.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Convert a `SlipwayError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &SlipwayError) -> &'static str {
    match error {
        SlipwayError::Database(_) => "database",
        SlipwayError::Config(_) => "config",
        SlipwayError::Network(_) => "network",
        SlipwayError::Auth(_) => "auth",
        SlipwayError::NotFound(_) => "not_found",
        SlipwayError::InvalidInput(_) => "invalid_input",
        SlipwayError::Internal(_) => "internal",
    }
}
