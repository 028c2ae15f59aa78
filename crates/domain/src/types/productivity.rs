//! Productivity event types
//!
//! Time entries by operator, work block, and ship system, measured in
//! minutes. Merged from remote and local-pending sources, deduplicated by a
//! composite signature.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Productivity entry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Directly productive time.
    Productivo,
    /// Non-productive time (paradas no programadas).
    Pnp,
    /// Dead time (tiempo muerto).
    Tm,
    /// Rework time.
    Rw,
    /// Administrative time.
    Adm,
    /// Non-planned training.
    CapNp,
}

impl EventType {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Productivo => "PRODUCTIVO",
            Self::Pnp => "PNP",
            Self::Tm => "TM",
            Self::Rw => "RW",
            Self::Adm => "ADM",
            Self::CapNp => "CAP_NP",
        }
    }
}

/// Productivity event plus local-only sync flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductivityEvent {
    pub id: String,
    pub fecha: NaiveDate,
    pub operario: String,
    #[serde(default)]
    pub bloque: String,
    /// Ship system code; open set (HVAC, PIPE, CBTR, ...).
    pub sistema: String,
    pub tipo: EventType,
    #[serde(rename = "duracionMin")]
    pub duracion_min: u32,
    #[serde(default, rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Remote persistence failed; retried on the next load cycle.
    #[serde(default, rename = "pendingSync", skip_serializing_if = "std::ops::Not::not")]
    pub pending_sync: bool,
    /// Confirmed present in the remote store.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synced: bool,
}

impl ProductivityEvent {
    /// Build a fresh event with a locally generated identifier.
    pub fn new(
        fecha: NaiveDate,
        operario: impl Into<String>,
        bloque: impl Into<String>,
        sistema: impl Into<String>,
        tipo: EventType,
        duracion_min: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            fecha,
            operario: operario.into(),
            bloque: bloque.into(),
            sistema: sistema.into(),
            tipo,
            duracion_min,
            created_at: Some(Utc::now()),
            pending_sync: false,
            synced: false,
        }
    }

    /// Composite identity used to deduplicate merged event sets.
    pub fn signature(&self) -> EventSignature {
        EventSignature {
            fecha: self.fecha,
            operario: self.operario.clone(),
            bloque: self.bloque.clone(),
            sistema: self.sistema.clone(),
            tipo: self.tipo,
            duracion_min: self.duracion_min,
        }
    }
}

/// Composite signature of (fecha, operario, bloque, sistema, tipo, duración).
///
/// Two events with equal signatures are the same logical entry regardless of
/// which side of a merge they came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventSignature {
    pub fecha: NaiveDate,
    pub operario: String,
    pub bloque: String,
    pub sistema: String,
    pub tipo: EventType,
    pub duracion_min: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn event_type_uses_screaming_wire_names() {
        assert_eq!(serde_json::to_string(&EventType::Productivo).unwrap(), "\"PRODUCTIVO\"");
        assert_eq!(serde_json::to_string(&EventType::CapNp).unwrap(), "\"CAP_NP\"");
        let back: EventType = serde_json::from_str("\"PNP\"").unwrap();
        assert_eq!(back, EventType::Pnp);
    }

    #[test]
    fn unknown_event_type_is_rejected() {
        let result: std::result::Result<EventType, _> = serde_json::from_str("\"LUNCH\"");
        assert!(result.is_err());
    }

    #[test]
    fn signatures_ignore_identifier_and_flags() {
        let a = ProductivityEvent::new(date(), "Modelista 1", "B1110", "HVAC", EventType::Productivo, 60);
        let mut b = ProductivityEvent::new(date(), "Modelista 1", "B1110", "HVAC", EventType::Productivo, 60);
        b.pending_sync = true;

        assert_ne!(a.id, b.id);
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn signatures_differ_on_duration() {
        let a = ProductivityEvent::new(date(), "Modelista 1", "B1110", "HVAC", EventType::Productivo, 60);
        let b = ProductivityEvent::new(date(), "Modelista 1", "B1110", "HVAC", EventType::Productivo, 45);
        assert_ne!(a.signature(), b.signature());
    }
}
