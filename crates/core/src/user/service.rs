//! User directory - cache-backed profile reads and writes
//!
//! Implements the write-through-with-local-fallback pattern: reads prefer
//! the remote store and fall back to cached snapshots (or a synthesized
//! placeholder) on connectivity failures; creates fall back to local-only
//! pending writes when offline.

use std::sync::Arc;

use slipway_domain::{Result, Role, SlipwayError, UserProfile};
use tracing::{debug, warn};

use super::ports::{ProfileCache, RemoteUserStore};
use crate::connectivity::ConnectivityProbe;

/// Fields for a profile that does not exist yet.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub email: String,
    pub nombre: String,
    /// Defaults to `modelista` when omitted.
    pub rol: Option<Role>,
}

/// Cache-backed view over the remote `users` collection.
pub struct UserDirectory {
    remote: Arc<dyn RemoteUserStore>,
    cache: Arc<dyn ProfileCache>,
    connectivity: Arc<dyn ConnectivityProbe>,
}

impl UserDirectory {
    /// Create a new directory over the given adapters.
    pub fn new(
        remote: Arc<dyn RemoteUserStore>,
        cache: Arc<dyn ProfileCache>,
        connectivity: Arc<dyn ConnectivityProbe>,
    ) -> Self {
        Self { remote, cache, connectivity }
    }

    /// Fetch a profile by account id.
    ///
    /// Offline or on connectivity errors the cached snapshot is served
    /// flagged `offline`; with no snapshot available a temporary
    /// `modelista` placeholder is synthesized. Data errors propagate.
    pub async fn get_user(&self, id: &str) -> Result<Option<UserProfile>> {
        let cached = self.cache.get(id).await;

        if !self.connectivity.is_online() {
            debug!(id, "offline: serving profile from local cache");
            return Ok(Some(offline_fallback(id, cached)));
        }

        match self.remote.fetch_profile(id).await {
            Ok(Some(mut profile)) => {
                profile.offline = false;
                self.cache.put(&profile).await;
                Ok(Some(profile))
            }
            Ok(None) => match cached {
                Some(mut snapshot) => {
                    snapshot.offline = true;
                    Ok(Some(snapshot))
                }
                None => Ok(None),
            },
            Err(err) if err.is_connectivity() => {
                warn!(id, error = %err, "profile fetch failed, falling back to cache");
                Ok(Some(offline_fallback(id, cached)))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Create a profile for a new account.
    ///
    /// Online: remote write, read-back existence check, recache. Offline (or
    /// when the write fails without connectivity): local-only snapshot
    /// flagged `offline` + `pending_sync`, returned as a success the caller
    /// must inspect.
    pub async fn create_profile(&self, id: &str, fields: NewProfile) -> Result<UserProfile> {
        let profile =
            UserProfile::new(id, fields.email.clone(), fields.nombre.clone(), fields.rol);

        match self.remote.create_profile(id, &profile).await {
            Ok(_) => {
                // Confirm the document is readable back before reporting success
                let saved = self.remote.fetch_profile(id).await?.ok_or_else(|| {
                    SlipwayError::Internal(format!("profile {id} not readable after create"))
                })?;
                self.cache.put(&saved).await;
                Ok(saved)
            }
            Err(err) => {
                if !self.connectivity.is_online() {
                    warn!(id, error = %err, "offline: keeping profile as local-only pending");
                    let mut local = profile;
                    local.offline = true;
                    local.pending_sync = true;
                    self.cache.put(&local).await;
                    return Ok(local);
                }
                Err(err.into())
            }
        }
    }

    /// Change a user's role (lead-only operation at the command layer).
    pub async fn update_role(&self, id: &str, rol: Role) -> Result<()> {
        self.remote.update_role(id, rol).await?;
        if let Some(mut snapshot) = self.cache.get(id).await {
            snapshot.rol = rol;
            self.cache.put(&snapshot).await;
        }
        Ok(())
    }

    /// All profiles, for the lead administration view.
    pub async fn list_users(&self) -> Result<Vec<UserProfile>> {
        Ok(self.remote.list_profiles().await?)
    }

    /// Profiles holding the given role.
    pub async fn users_by_role(&self, rol: Role) -> Result<Vec<UserProfile>> {
        Ok(self.remote.profiles_by_role(rol).await?)
    }
}

fn offline_fallback(id: &str, cached: Option<UserProfile>) -> UserProfile {
    match cached {
        Some(mut snapshot) => {
            snapshot.offline = true;
            snapshot
        }
        None => UserProfile::placeholder(id),
    }
}
