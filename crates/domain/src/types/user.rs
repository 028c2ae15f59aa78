//! User profile types
//!
//! Profiles live in the remote `users` collection and are snapshotted into
//! the local cache for offline reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operational role. Validated at the deserialization boundary; unknown
/// strings never enter the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Division lead with global dashboards and user administration.
    Lider,
    /// Modeler logging avances and productivity events.
    Modelista,
    /// Transitional role for accounts created before reconciliation.
    Pendiente,
}

impl Default for Role {
    fn default() -> Self {
        Self::Modelista
    }
}

impl Role {
    /// Wire representation (`lider` / `modelista` / `pendiente`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lider => "lider",
            Self::Modelista => "modelista",
            Self::Pendiente => "pendiente",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User profile document plus local-only state flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Identity-provider account id.
    pub id: String,
    pub email: String,
    pub nombre: String,
    pub rol: Role,
    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Snapshot served from the local cache, not confirmed against remote.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub offline: bool,
    /// Created while offline; awaiting a push to the remote store.
    #[serde(default, rename = "pendingSync", skip_serializing_if = "std::ops::Not::not")]
    pub pending_sync: bool,
    /// Synthesized placeholder carrying no real data.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub temporary: bool,
}

impl UserProfile {
    /// Build a fresh profile with the given role (default `modelista`).
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        nombre: impl Into<String>,
        rol: Option<Role>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            nombre: nombre.into(),
            rol: rol.unwrap_or_default(),
            created_at: None,
            updated_at: None,
            offline: false,
            pending_sync: false,
            temporary: false,
        }
    }

    /// Synthesized placeholder used when neither remote nor cache has data.
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: String::new(),
            nombre: String::new(),
            rol: Role::Modelista,
            created_at: None,
            updated_at: None,
            offline: true,
            pending_sync: false,
            temporary: true,
        }
    }

    /// Whether this profile grants lead privileges.
    pub fn is_lider(&self) -> bool {
        self.rol == Role::Lider
    }

    /// Copy with the local-only flags cleared, as pushed during sync.
    pub fn without_local_flags(&self) -> Self {
        let mut profile = self.clone();
        profile.offline = false;
        profile.pending_sync = false;
        profile.temporary = false;
        profile
    }
}
