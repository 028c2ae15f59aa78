//! Progress ledger - optimistic record creation and rework append
//!
//! The ledger owns the observable display list. Every optimistic mutation
//! is visible to readers before the corresponding remote call resolves, and
//! every rollback restores exactly the prior visible state.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use slipway_domain::{ProgressRecord, RecordId, RecordStatus, ReworkEvent};
use thiserror::Error;
use tracing::{info, warn};

use super::ports::ProgressStore;
use crate::connectivity::ConnectivityProbe;

/// Fields for a new progress record.
#[derive(Debug, Clone)]
pub struct NewRecordInput {
    pub proyecto: String,
    pub swbs: String,
    pub actividad: String,
    pub horas_invertidas: f64,
    pub avance_mm: f64,
    pub total_mm: f64,
    pub estado: RecordStatus,
    pub comentarios: String,
}

/// Fields for a new rework event.
#[derive(Debug, Clone)]
pub struct NewReworkInput {
    pub horas_adicionales: f64,
    pub motivo: String,
}

/// A rework event that could not be replayed after its parent committed.
/// The parent record itself is not rolled back.
#[derive(Debug, Clone)]
pub struct ReplayFailure {
    pub numero: u32,
    pub message: String,
}

/// Result of a committed record creation.
#[derive(Debug, Clone)]
pub struct CommitReport {
    pub record: ProgressRecord,
    pub replay_failures: Vec<ReplayFailure>,
}

/// Outcome of a record creation attempt.
#[derive(Debug, Clone)]
pub enum CreateOutcome {
    /// Remote create succeeded; the permanent id replaced the local one.
    Committed(CommitReport),
    /// No authenticated user: the record stays local-only, never retried.
    LocalOnly(ProgressRecord),
}

/// Ledger failures, each carrying a user-displayable message.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Record {0} not found")]
    RecordNotFound(String),

    #[error("Could not save the record: {0}")]
    CreateFailed(String),

    #[error("Could not save the rework event: {0}")]
    ReworkFailed(String),

    #[error("Could not load records: {0}")]
    LoadFailed(String),
}

/// Observable list of progress records with optimistic remote persistence.
pub struct ProgressLedger {
    store: Arc<dyn ProgressStore>,
    connectivity: Arc<dyn ConnectivityProbe>,
    records: RwLock<Vec<ProgressRecord>>,
}

impl ProgressLedger {
    /// Create an empty ledger over the given store.
    pub fn new(store: Arc<dyn ProgressStore>, connectivity: Arc<dyn ConnectivityProbe>) -> Self {
        Self { store, connectivity, records: RwLock::new(Vec::new()) }
    }

    /// Current display list.
    pub fn snapshot(&self) -> Vec<ProgressRecord> {
        self.records.read().clone()
    }

    /// Look up a record by identifier.
    pub fn find(&self, id: &RecordId) -> Option<ProgressRecord> {
        self.records.read().iter().find(|r| &r.id == id).cloned()
    }

    /// Create a record optimistically and persist it remotely.
    ///
    /// The record is inserted into the display list with a local `Pending`
    /// id and `syncing = true` before the remote call is issued. On success
    /// the permanent id is swapped in place and any rework events queued
    /// against the local id are replayed in order. On failure the optimistic
    /// record is removed. Without an authenticated user the record stays
    /// local-only and no remote call is made.
    pub async fn create_record(
        &self,
        user_id: Option<&str>,
        input: NewRecordInput,
    ) -> Result<CreateOutcome, LedgerError> {
        let record = ProgressRecord {
            id: RecordId::new_pending(),
            user_id: user_id.unwrap_or_default().to_string(),
            proyecto: input.proyecto,
            swbs: input.swbs,
            actividad: input.actividad,
            horas_invertidas: input.horas_invertidas,
            avance_mm: input.avance_mm,
            total_mm: input.total_mm,
            estado: input.estado,
            comentarios: input.comentarios,
            created_at: Some(Utc::now()),
            reprocesos: Vec::new(),
            pending_reprocesos: Vec::new(),
            syncing: true,
        };
        let local_id = record.id.clone();

        self.records.write().push(record.clone());

        let Some(user_id) = user_id else {
            info!(id = %local_id, "no authenticated user: record kept as local-only");
            return Ok(CreateOutcome::LocalOnly(record));
        };

        match self.store.create_record(&record).await {
            Ok(remote_id) => {
                let (committed, queued) = {
                    let mut records = self.records.write();
                    let Some(entry) = records.iter_mut().find(|r| r.id == local_id) else {
                        // List was torn down while the create was in flight;
                        // drop the late result rather than erroring.
                        warn!(id = %local_id, "record vanished before commit, dropping result");
                        return Err(LedgerError::RecordNotFound(local_id.to_string()));
                    };
                    entry.id = RecordId::Committed(remote_id.clone());
                    entry.syncing = false;
                    let queued = std::mem::take(&mut entry.pending_reprocesos);
                    (entry.clone(), queued)
                };

                info!(user_id, id = %remote_id, "record committed");

                let mut replay_failures = Vec::new();
                for event in queued {
                    if let Err(err) = self.store.append_rework(&remote_id, &event).await {
                        warn!(
                            id = %remote_id,
                            numero = event.numero,
                            error = %err,
                            "rework replay failed"
                        );
                        replay_failures.push(ReplayFailure {
                            numero: event.numero,
                            message: err.to_string(),
                        });
                    }
                }

                Ok(CreateOutcome::Committed(CommitReport { record: committed, replay_failures }))
            }
            Err(err) => {
                self.records.write().retain(|r| r.id != local_id);
                warn!(user_id, error = %err, "record create failed, optimistic entry removed");
                Err(LedgerError::CreateFailed(err.to_string()))
            }
        }
    }

    /// Append a rework event, branching on the parent record's state.
    pub async fn append_rework(
        &self,
        record_id: &RecordId,
        input: NewReworkInput,
        authenticated: bool,
    ) -> Result<ReworkEvent, LedgerError> {
        // Optimistic local mutation first, under the lock
        let (event, remote_target, snapshot) = {
            let mut records = self.records.write();
            let Some(entry) = records.iter_mut().find(|r| &r.id == record_id) else {
                return Err(LedgerError::RecordNotFound(record_id.to_string()));
            };

            let event = ReworkEvent::new(
                entry.next_rework_number(),
                input.horas_adicionales,
                input.motivo,
            );

            match &entry.id {
                RecordId::Pending(_) => {
                    // Parent not committed yet: embed and queue for replay
                    entry.reprocesos.push(event.clone());
                    entry.pending_reprocesos.push(event.clone());
                    entry.horas_invertidas += event.horas_adicionales;
                    entry.syncing = true;
                    (event, None, None)
                }
                RecordId::Committed(remote_id) => {
                    let online = authenticated && self.connectivity.is_online();
                    let snapshot = online.then(|| entry.clone());
                    let remote_id = remote_id.clone();

                    entry.reprocesos.push(event.clone());
                    entry.horas_invertidas += event.horas_adicionales;
                    if online {
                        (event, Some(remote_id), snapshot)
                    } else {
                        // Unsynced local mutation, no retry scheduled
                        entry.syncing = true;
                        (event, None, None)
                    }
                }
            }
        };

        let Some(remote_id) = remote_target else {
            return Ok(event);
        };

        match self.store.append_rework(&remote_id, &event).await {
            Ok(()) => Ok(event),
            Err(err) => {
                // Restore the exact pre-append state
                if let Some(snapshot) = snapshot {
                    let mut records = self.records.write();
                    if let Some(entry) =
                        records.iter_mut().find(|r| r.id == RecordId::Committed(remote_id.clone()))
                    {
                        *entry = snapshot;
                    }
                }
                warn!(id = %remote_id, error = %err, "rework append failed, rolled back");
                Err(LedgerError::ReworkFailed(err.to_string()))
            }
        }
    }

    /// Load the user's records from the store into the display list.
    ///
    /// Local-only records (still carrying a pending id) survive the reload;
    /// committed entries are replaced by the fetched sequence.
    pub async fn load_for_user(&self, user_id: &str) -> Result<Vec<ProgressRecord>, LedgerError> {
        let fetched = self
            .store
            .records_by_user(user_id)
            .await
            .map_err(|err| LedgerError::LoadFailed(err.to_string()))?;

        let mut records = self.records.write();
        records.retain(|r| r.id.is_pending());
        records.extend(fetched);
        Ok(records.clone())
    }
}
