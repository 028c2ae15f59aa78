//! Productivity service - optimistic event capture with merge dedup
//!
//! Events are written locally first and pushed to the remote store
//! opportunistically. Failed pushes stay flagged `pending_sync` and are
//! retried on the next load cycle. Merged views deduplicate by the
//! composite (fecha, operario, bloque, sistema, tipo, duración) signature
//! so a merge never double-counts an entry.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use slipway_domain::{EventType, ProductivityEvent};
use tracing::{debug, warn};

use super::ports::{ProductivityLocalStore, ProductivityStore};
use crate::connectivity::ConnectivityProbe;

/// Fields for a new productivity event.
#[derive(Debug, Clone)]
pub struct NewEventInput {
    pub fecha: NaiveDate,
    pub operario: String,
    pub bloque: String,
    pub sistema: String,
    pub tipo: EventType,
    pub duracion_min: u32,
}

/// Optimistic capture and merged reads of productivity events.
pub struct ProductivityService {
    remote: Arc<dyn ProductivityStore>,
    local: Arc<dyn ProductivityLocalStore>,
    connectivity: Arc<dyn ConnectivityProbe>,
}

impl ProductivityService {
    /// Create a new productivity service.
    pub fn new(
        remote: Arc<dyn ProductivityStore>,
        local: Arc<dyn ProductivityLocalStore>,
        connectivity: Arc<dyn ConnectivityProbe>,
    ) -> Self {
        Self { remote, local, connectivity }
    }

    /// Record an event optimistically.
    ///
    /// The event is stored locally at once; the remote create is attempted
    /// when online and a failure merely leaves the event pending for the
    /// next load cycle.
    pub async fn record_event(&self, input: NewEventInput) -> ProductivityEvent {
        let mut event = ProductivityEvent::new(
            input.fecha,
            input.operario,
            input.bloque,
            input.sistema,
            input.tipo,
            input.duracion_min,
        );
        event.pending_sync = true;
        self.local.save(&event).await;

        if !self.connectivity.is_online() {
            debug!(id = %event.id, "offline: productivity event kept pending");
            return event;
        }

        match self.remote.create_event(&event).await {
            Ok(remote_id) => {
                debug!(id = %event.id, remote_id = %remote_id, "productivity event persisted");
                event.pending_sync = false;
                event.synced = true;
                self.local.mark_synced(&event.id).await;
            }
            Err(err) => {
                warn!(id = %event.id, error = %err, "productivity event push failed, left pending");
            }
        }

        event
    }

    /// Load the merged event set.
    ///
    /// Pending local events are re-pushed first (the load-cycle retry), then
    /// remote and local rows are merged with composite-signature dedup.
    /// Remote fetch failures degrade to the local set alone.
    pub async fn load_events(&self) -> Vec<ProductivityEvent> {
        if self.connectivity.is_online() {
            self.retry_pending().await;
        }

        let remote = if self.connectivity.is_online() {
            match self.remote.list_events().await {
                Ok(events) => events,
                Err(err) => {
                    warn!(error = %err, "productivity fetch failed, serving local events only");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        let mut seen: HashSet<_> = remote.iter().map(ProductivityEvent::signature).collect();
        let mut merged = remote;

        for event in self.local.all().await {
            if seen.insert(event.signature()) {
                merged.push(event);
            }
        }

        merged
    }

    async fn retry_pending(&self) {
        for event in self.local.pending().await {
            match self.remote.create_event(&event).await {
                Ok(_) => {
                    debug!(id = %event.id, "pending productivity event synced");
                    self.local.mark_synced(&event.id).await;
                }
                Err(err) => {
                    warn!(id = %event.id, error = %err, "pending productivity event still failing");
                }
            }
        }
    }
}
