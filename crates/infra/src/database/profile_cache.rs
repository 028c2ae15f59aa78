//! Profile snapshot cache over SQLite
//!
//! Implements the best-effort cache contract: every storage failure and
//! every corrupt payload is logged and treated as a miss. Nothing here
//! propagates an error to callers.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use slipway_core::user::ports::{PendingProfile, ProfileCache};
use slipway_domain::constants::USER_CACHE_PREFIX;
use slipway_domain::UserProfile;
use tokio::task;
use tracing::warn;

use super::manager::DbManager;
use crate::errors::InfraError;

/// SQLite-backed implementation of the profile cache.
pub struct SqliteProfileCache {
    db: Arc<DbManager>,
}

impl SqliteProfileCache {
    /// Create a new cache over the given database.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

fn cache_key(id: &str) -> String {
    format!("{USER_CACHE_PREFIX}{id}")
}

#[async_trait]
impl ProfileCache for SqliteProfileCache {
    async fn get(&self, id: &str) -> Option<UserProfile> {
        let db = Arc::clone(&self.db);
        let key = cache_key(id);

        let result = task::spawn_blocking(move || -> Result<Option<String>, InfraError> {
            let conn = db.get_connection().map_err(|err| InfraError::Database(err.to_string()))?;
            let payload = conn
                .query_row(
                    "SELECT payload FROM profile_snapshots WHERE cache_key = ?1",
                    params![&key],
                    |row| row.get::<_, String>(0),
                )
                .optional()?;
            Ok(payload)
        })
        .await;

        let payload = match result {
            Ok(Ok(payload)) => payload?,
            Ok(Err(err)) => {
                warn!(id, error = %err, "profile cache read failed, treating as miss");
                return None;
            }
            Err(err) => {
                warn!(id, error = %err, "profile cache task failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(profile) => Some(profile),
            Err(err) => {
                // Corrupt snapshot: a miss, not a failure
                warn!(id, error = %err, "corrupt profile snapshot, treating as miss");
                None
            }
        }
    }

    async fn put(&self, profile: &UserProfile) {
        let db = Arc::clone(&self.db);
        let key = cache_key(&profile.id);
        let pending = profile.pending_sync;
        let payload = match serde_json::to_string(profile) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(id = %profile.id, error = %err, "profile snapshot not serializable, skipping");
                return;
            }
        };

        let result = task::spawn_blocking(move || -> Result<(), InfraError> {
            let conn = db.get_connection().map_err(|err| InfraError::Database(err.to_string()))?;
            conn.execute(
                "INSERT INTO profile_snapshots (cache_key, payload, pending_sync, sync_attempts, updated_at)
                 VALUES (?1, ?2, ?3, 0, ?4)
                 ON CONFLICT(cache_key) DO UPDATE SET
                    payload = excluded.payload,
                    pending_sync = excluded.pending_sync,
                    updated_at = excluded.updated_at",
                params![&key, &payload, pending as i64, Utc::now().timestamp()],
            )?;
            Ok(())
        })
        .await;

        match result {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(error = %err, "profile cache write failed"),
            Err(err) => warn!(error = %err, "profile cache task failed"),
        }
    }

    async fn pending_profiles(&self) -> Vec<PendingProfile> {
        let db = Arc::clone(&self.db);

        let result = task::spawn_blocking(move || -> Result<Vec<(String, u32)>, InfraError> {
            let conn = db.get_connection().map_err(|err| InfraError::Database(err.to_string()))?;
            let mut stmt = conn.prepare(
                "SELECT payload, sync_attempts FROM profile_snapshots WHERE pending_sync = 1",
            )?;
            let rows = stmt
                .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await;

        let rows = match result {
            Ok(Ok(rows)) => rows,
            Ok(Err(err)) => {
                warn!(error = %err, "pending profile scan failed");
                return Vec::new();
            }
            Err(err) => {
                warn!(error = %err, "pending profile scan task failed");
                return Vec::new();
            }
        };

        rows.into_iter()
            .filter_map(|(payload, attempts)| match serde_json::from_str(&payload) {
                Ok(profile) => Some(PendingProfile { profile, attempts }),
                Err(err) => {
                    warn!(error = %err, "corrupt pending snapshot, skipping");
                    None
                }
            })
            .collect()
    }

    async fn record_failed_attempt(&self, id: &str) -> u32 {
        let db = Arc::clone(&self.db);
        let key = cache_key(id);

        let result = task::spawn_blocking(move || -> Result<u32, InfraError> {
            let conn = db.get_connection().map_err(|err| InfraError::Database(err.to_string()))?;
            conn.execute(
                "UPDATE profile_snapshots SET sync_attempts = sync_attempts + 1 WHERE cache_key = ?1",
                params![&key],
            )?;
            let attempts = conn
                .query_row(
                    "SELECT sync_attempts FROM profile_snapshots WHERE cache_key = ?1",
                    params![&key],
                    |row| row.get::<_, u32>(0),
                )
                .optional()?
                .unwrap_or(0);
            Ok(attempts)
        })
        .await;

        match result {
            Ok(Ok(attempts)) => attempts,
            Ok(Err(err)) => {
                warn!(id, error = %err, "failed to record sweep attempt");
                0
            }
            Err(err) => {
                warn!(id, error = %err, "sweep attempt task failed");
                0
            }
        }
    }

    async fn mark_synced(&self, profile: &UserProfile) {
        let synced = profile.without_local_flags();
        let db = Arc::clone(&self.db);
        let key = cache_key(&synced.id);
        let payload = match serde_json::to_string(&synced) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(id = %synced.id, error = %err, "synced snapshot not serializable, skipping");
                return;
            }
        };

        let result = task::spawn_blocking(move || -> Result<(), InfraError> {
            let conn = db.get_connection().map_err(|err| InfraError::Database(err.to_string()))?;
            conn.execute(
                "INSERT INTO profile_snapshots (cache_key, payload, pending_sync, sync_attempts, updated_at)
                 VALUES (?1, ?2, 0, 0, ?3)
                 ON CONFLICT(cache_key) DO UPDATE SET
                    payload = excluded.payload,
                    pending_sync = 0,
                    sync_attempts = 0,
                    updated_at = excluded.updated_at",
                params![&key, &payload, Utc::now().timestamp()],
            )?;
            Ok(())
        })
        .await;

        match result {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(error = %err, "mark synced failed"),
            Err(err) => warn!(error = %err, "mark synced task failed"),
        }
    }

    async fn abandon_pending(&self, id: &str) {
        // Clear the flag in both the column and the payload so later reads
        // agree with the pending scan.
        let Some(mut profile) = self.get(id).await else {
            return;
        };
        profile.pending_sync = false;

        let db = Arc::clone(&self.db);
        let key = cache_key(id);
        let payload = match serde_json::to_string(&profile) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(id, error = %err, "abandoned snapshot not serializable, skipping");
                return;
            }
        };

        let result = task::spawn_blocking(move || -> Result<(), InfraError> {
            let conn = db.get_connection().map_err(|err| InfraError::Database(err.to_string()))?;
            conn.execute(
                "UPDATE profile_snapshots SET payload = ?2, pending_sync = 0, updated_at = ?3
                 WHERE cache_key = ?1",
                params![&key, &payload, Utc::now().timestamp()],
            )?;
            Ok(())
        })
        .await;

        match result {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(id, error = %err, "abandon pending failed"),
            Err(err) => warn!(id, error = %err, "abandon pending task failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::params;
    use slipway_domain::Role;
    use tempfile::TempDir;

    use super::*;

    fn setup() -> (SqliteProfileCache, Arc<DbManager>, TempDir) {
        let temp_dir = TempDir::new().expect("temp dir");
        let db_path = temp_dir.path().join("cache.db");
        let db = Arc::new(DbManager::new(&db_path, 4).expect("manager"));
        db.run_migrations().expect("migrations");
        (SqliteProfileCache::new(Arc::clone(&db)), db, temp_dir)
    }

    fn profile(id: &str) -> UserProfile {
        UserProfile::new(id, format!("{id}@astillero.com"), "Ana Suárez", Some(Role::Modelista))
    }

    #[tokio::test]
    async fn put_and_get_round_trip() {
        let (cache, _db, _dir) = setup();
        let stored = profile("uid-1");

        cache.put(&stored).await;
        let loaded = cache.get("uid-1").await.expect("snapshot present");
        assert_eq!(loaded.email, stored.email);
        assert_eq!(loaded.rol, Role::Modelista);
    }

    #[tokio::test]
    async fn missing_entry_is_a_miss() {
        let (cache, _db, _dir) = setup();
        assert!(cache.get("nobody").await.is_none());
    }

    #[tokio::test]
    async fn corrupt_payload_is_a_miss() {
        let (cache, db, _dir) = setup();
        let conn = db.get_connection().expect("connection");
        conn.execute(
            "INSERT INTO profile_snapshots (cache_key, payload, pending_sync, sync_attempts, updated_at)
             VALUES (?1, ?2, 0, 0, 0)",
            params!["user_uid-bad", "{not json"],
        )
        .expect("insert");

        assert!(cache.get("uid-bad").await.is_none());
    }

    #[tokio::test]
    async fn pending_scan_returns_flagged_snapshots_with_attempts() {
        let (cache, _db, _dir) = setup();

        let mut pending = profile("uid-2");
        pending.pending_sync = true;
        pending.offline = true;
        cache.put(&pending).await;
        cache.put(&profile("uid-3")).await;

        assert_eq!(cache.record_failed_attempt("uid-2").await, 1);
        assert_eq!(cache.record_failed_attempt("uid-2").await, 2);

        let entries = cache.pending_profiles().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].profile.id, "uid-2");
        assert_eq!(entries[0].attempts, 2);
    }

    #[tokio::test]
    async fn mark_synced_clears_flags_and_attempts() {
        let (cache, _db, _dir) = setup();

        let mut pending = profile("uid-4");
        pending.pending_sync = true;
        cache.put(&pending).await;
        cache.record_failed_attempt("uid-4").await;

        cache.mark_synced(&pending).await;

        assert!(cache.pending_profiles().await.is_empty());
        let loaded = cache.get("uid-4").await.expect("snapshot present");
        assert!(!loaded.pending_sync);
        assert_eq!(cache.record_failed_attempt("uid-4").await, 1);
    }

    #[tokio::test]
    async fn abandon_pending_keeps_snapshot_readable() {
        let (cache, _db, _dir) = setup();

        let mut pending = profile("uid-5");
        pending.pending_sync = true;
        cache.put(&pending).await;

        cache.abandon_pending("uid-5").await;

        assert!(cache.pending_profiles().await.is_empty());
        let loaded = cache.get("uid-5").await.expect("snapshot still readable");
        assert!(!loaded.pending_sync);
        assert_eq!(loaded.email, "uid-5@astillero.com");
    }
}
