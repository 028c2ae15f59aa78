//! Local productivity event store over SQLite
//!
//! Same best-effort contract as the profile cache: failures are logged and
//! treated as absent data.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::params;
use slipway_core::productivity::ports::ProductivityLocalStore;
use slipway_domain::ProductivityEvent;
use tokio::task;
use tracing::warn;

use super::manager::DbManager;
use crate::errors::InfraError;

/// SQLite-backed implementation of the local productivity store.
pub struct SqliteProductivityStore {
    db: Arc<DbManager>,
}

impl SqliteProductivityStore {
    /// Create a new store over the given database.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    async fn rows_where(&self, clause: &'static str) -> Vec<ProductivityEvent> {
        let db = Arc::clone(&self.db);

        let result = task::spawn_blocking(move || -> Result<Vec<String>, InfraError> {
            let conn = db.get_connection().map_err(|err| InfraError::Database(err.to_string()))?;
            let sql = format!("SELECT payload FROM productivity_events {clause} ORDER BY created_at ASC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await;

        let rows = match result {
            Ok(Ok(rows)) => rows,
            Ok(Err(err)) => {
                warn!(error = %err, "productivity event scan failed");
                return Vec::new();
            }
            Err(err) => {
                warn!(error = %err, "productivity event scan task failed");
                return Vec::new();
            }
        };

        rows.into_iter()
            .filter_map(|payload| match serde_json::from_str(&payload) {
                Ok(event) => Some(event),
                Err(err) => {
                    warn!(error = %err, "corrupt productivity event, skipping");
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl ProductivityLocalStore for SqliteProductivityStore {
    async fn save(&self, event: &ProductivityEvent) {
        let db = Arc::clone(&self.db);
        let id = event.id.clone();
        let pending = event.pending_sync;
        let synced = event.synced;
        let created_at =
            event.created_at.map_or_else(|| Utc::now().timestamp(), |ts| ts.timestamp());
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(id = %event.id, error = %err, "productivity event not serializable, skipping");
                return;
            }
        };

        let result = task::spawn_blocking(move || -> Result<(), InfraError> {
            let conn = db.get_connection().map_err(|err| InfraError::Database(err.to_string()))?;
            conn.execute(
                "INSERT INTO productivity_events (id, payload, pending_sync, synced, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                    payload = excluded.payload,
                    pending_sync = excluded.pending_sync,
                    synced = excluded.synced",
                params![&id, &payload, pending as i64, synced as i64, created_at],
            )?;
            Ok(())
        })
        .await;

        match result {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(error = %err, "productivity event write failed"),
            Err(err) => warn!(error = %err, "productivity event task failed"),
        }
    }

    async fn pending(&self) -> Vec<ProductivityEvent> {
        self.rows_where("WHERE pending_sync = 1").await
    }

    async fn mark_synced(&self, id: &str) {
        let events = self.rows_where("WHERE pending_sync = 1 OR synced = 0").await;
        let Some(mut event) = events.into_iter().find(|e| e.id == id) else {
            return;
        };
        event.pending_sync = false;
        event.synced = true;
        self.save(&event).await;
    }

    async fn all(&self) -> Vec<ProductivityEvent> {
        self.rows_where("").await
    }
}
