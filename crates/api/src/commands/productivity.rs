//! Productivity event commands.

use std::sync::Arc;
use std::time::Instant;

use slipway_core::productivity::NewEventInput;
use slipway_domain::ProductivityEvent;

use crate::context::AppContext;
use crate::utils::logging::log_command_execution;

/// Record a productivity event.
///
/// The event is captured locally no matter what; a failed remote push
/// leaves it pending for the next load cycle, which is not an error here.
pub async fn record_productivity_event(
    context: &Arc<AppContext>,
    input: NewEventInput,
) -> Result<ProductivityEvent, String> {
    let started = Instant::now();

    let event = context.productivity.record_event(input).await;

    log_command_execution("productivity::record_productivity_event", started.elapsed(), true);
    Ok(event)
}

/// Load the merged (remote + local pending) event set.
pub async fn load_productivity_events(
    context: &Arc<AppContext>,
) -> Result<Vec<ProductivityEvent>, String> {
    let started = Instant::now();

    let events = context.productivity.load_events().await;

    log_command_execution("productivity::load_productivity_events", started.elapsed(), true);
    Ok(events)
}
