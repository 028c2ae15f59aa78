//! Progress record ("avance") types
//!
//! A record measures construction completion in millimeters against a
//! planned total and embeds its rework events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::PENDING_ID_PREFIX;

/// Record identifier state.
///
/// A record is born with a locally generated `Pending` token and swaps to
/// `Committed` once the remote store assigns the permanent id. Keeping the
/// two states as distinct variants makes identifier confusion impossible at
/// call sites; no prefix sniffing anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordId {
    /// Local token awaiting remote assignment.
    Pending(String),
    /// Remote-assigned permanent identifier.
    Committed(String),
}

impl RecordId {
    /// Generate a fresh local token.
    pub fn new_pending() -> Self {
        Self::Pending(format!("{PENDING_ID_PREFIX}{}", Uuid::new_v4().simple()))
    }

    /// Whether the record still awaits its permanent identifier.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// The permanent identifier, when committed.
    pub fn committed(&self) -> Option<&str> {
        match self {
            Self::Committed(id) => Some(id),
            Self::Pending(_) => None,
        }
    }

    /// Display form: the raw token either way.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending(id) | Self::Committed(id) => id,
        }
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RecordId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.starts_with(PENDING_ID_PREFIX) {
            Ok(Self::Pending(raw))
        } else {
            Ok(Self::Committed(raw))
        }
    }
}

/// Record status. Wire names keep the Spanish labels the dashboards render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordStatus {
    #[serde(rename = "En progreso")]
    EnProgreso,
    #[serde(rename = "Completado")]
    Completado,
    #[serde(rename = "Bloqueado")]
    Bloqueado,
}

impl Default for RecordStatus {
    fn default() -> Self {
        Self::EnProgreso
    }
}

/// Rework event ("reproceso") embedded in its parent record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReworkEvent {
    pub id: String,
    /// 1-based sequence number, unique only within the parent record.
    pub numero: u32,
    #[serde(rename = "horasAdicionales")]
    pub horas_adicionales: f64,
    pub motivo: String,
    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ReworkEvent {
    /// Build a rework event with a fresh id and the given sequence number.
    pub fn new(numero: u32, horas_adicionales: f64, motivo: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            numero,
            horas_adicionales,
            motivo: motivo.into(),
            created_at: Some(Utc::now()),
        }
    }
}

/// Progress record ("avance") plus local-only sync state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub id: RecordId,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub proyecto: String,
    pub swbs: String,
    pub actividad: String,
    #[serde(rename = "horasInvertidas")]
    pub horas_invertidas: f64,
    #[serde(rename = "avanceMm")]
    pub avance_mm: f64,
    #[serde(rename = "totalMm")]
    pub total_mm: f64,
    pub estado: RecordStatus,
    #[serde(default)]
    pub comentarios: String,
    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reprocesos: Vec<ReworkEvent>,

    /// Rework events recorded before the record received a permanent id,
    /// queued for replay after commit.
    #[serde(default, rename = "pendingReprocesos", skip_serializing_if = "Vec::is_empty")]
    pub pending_reprocesos: Vec<ReworkEvent>,
    /// Remote persistence in flight (or never attempted for local-only rows).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub syncing: bool,
}

impl ProgressRecord {
    /// Completion ratio `avance / total`, unclamped.
    ///
    /// `None` when `total_mm` is zero: the dashboards render an undefined
    /// marker instead of charting an infinity.
    pub fn completion_ratio(&self) -> Option<f64> {
        if self.total_mm == 0.0 {
            None
        } else {
            Some(self.avance_mm / self.total_mm)
        }
    }

    /// Completion percentage, rounded the way the dashboards display it.
    pub fn completion_percent(&self) -> Option<f64> {
        self.completion_ratio().map(|r| (r * 100.0).round())
    }

    /// Sequence number for the next rework event: prior count + 1.
    pub fn next_rework_number(&self) -> u32 {
        self.reprocesos.len() as u32 + 1
    }
}
