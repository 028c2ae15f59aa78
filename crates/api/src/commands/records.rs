//! Progress record commands.

use std::sync::Arc;
use std::time::Instant;

use slipway_core::records::{NewRecordInput, NewReworkInput};
use slipway_core::CreateOutcome;
use slipway_domain::{ProgressRecord, ReworkEvent};

use crate::context::AppContext;
use crate::utils::logging::log_command_execution;

/// Outcome of a record creation handed to the presentation layer.
#[derive(Debug, Clone)]
pub struct CreatedRecord {
    pub record: ProgressRecord,
    /// Rework events that failed to replay after the record committed; the
    /// record itself stands.
    pub replay_warnings: Vec<String>,
}

/// Create a progress record for the current session's user.
///
/// Unauthenticated sessions keep the record as a permanent local-only
/// entry; that is a success, not an error.
pub async fn create_progress_record(
    context: &Arc<AppContext>,
    input: NewRecordInput,
) -> Result<CreatedRecord, String> {
    let started = Instant::now();
    let user_id = context.session.current().map(|user| user.uid);

    let result = match context.ledger.create_record(user_id.as_deref(), input).await {
        Ok(CreateOutcome::Committed(report)) => Ok(CreatedRecord {
            record: report.record,
            replay_warnings: report
                .replay_failures
                .into_iter()
                .map(|failure| {
                    format!("Rework #{} was not synced: {}", failure.numero, failure.message)
                })
                .collect(),
        }),
        Ok(CreateOutcome::LocalOnly(record)) => {
            Ok(CreatedRecord { record, replay_warnings: Vec::new() })
        }
        Err(err) => Err(err.to_string()),
    };

    log_command_execution("records::create_progress_record", started.elapsed(), result.is_ok());
    result
}

/// Append a rework event to a record in the display list.
pub async fn append_rework_event(
    context: &Arc<AppContext>,
    record_id: &str,
    input: NewReworkInput,
) -> Result<ReworkEvent, String> {
    let started = Instant::now();

    let target = context
        .ledger
        .snapshot()
        .into_iter()
        .map(|record| record.id)
        .find(|id| id.as_str() == record_id);

    let result = match target {
        Some(id) => {
            let authenticated = context.session.current().is_some();
            context
                .ledger
                .append_rework(&id, input, authenticated)
                .await
                .map_err(|err| err.to_string())
        }
        None => Err(format!("Record {record_id} not found")),
    };

    log_command_execution("records::append_rework_event", started.elapsed(), result.is_ok());
    result
}

/// Load a user's records into the display list and return them.
pub async fn list_progress_records(
    context: &Arc<AppContext>,
    user_id: &str,
) -> Result<Vec<ProgressRecord>, String> {
    let started = Instant::now();

    let result =
        context.ledger.load_for_user(user_id).await.map_err(|err| err.to_string());

    log_command_execution("records::list_progress_records", started.elapsed(), result.is_ok());
    result
}
