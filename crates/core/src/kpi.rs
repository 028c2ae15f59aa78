//! Dashboard KPI aggregation
//!
//! Pure grouping and summing over in-memory record/event sets. Productivity
//! durations are captured in minutes and converted to hours wherever they
//! are combined with avance hours.

use std::collections::{BTreeMap, BTreeSet};

use slipway_domain::{EventType, ProductivityEvent, ProgressRecord, RecordStatus};

/// Count of records per status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBreakdown {
    pub completadas: usize,
    pub en_progreso: usize,
    pub bloqueadas: usize,
}

/// Tally records by status.
pub fn status_breakdown(records: &[ProgressRecord]) -> StatusBreakdown {
    let mut breakdown = StatusBreakdown::default();
    for record in records {
        match record.estado {
            RecordStatus::Completado => breakdown.completadas += 1,
            RecordStatus::EnProgreso => breakdown.en_progreso += 1,
            RecordStatus::Bloqueado => breakdown.bloqueadas += 1,
        }
    }
    breakdown
}

/// Total hours: avance invested hours plus productivity minutes as hours.
pub fn total_hours(records: &[ProgressRecord], events: &[ProductivityEvent]) -> f64 {
    let avance_hours: f64 = records.iter().map(|r| r.horas_invertidas).sum();
    let productivity_hours: f64 =
        events.iter().map(|e| f64::from(e.duracion_min) / 60.0).sum();
    avance_hours + productivity_hours
}

/// Hours grouped by activity, with productivity events grouped under a
/// `Prod: <sistema>` label, sorted by label.
pub fn hours_by_activity(
    records: &[ProgressRecord],
    events: &[ProductivityEvent],
) -> Vec<(String, f64)> {
    let mut acc: BTreeMap<String, f64> = BTreeMap::new();

    for record in records {
        let key = if record.actividad.is_empty() {
            "Sin actividad".to_string()
        } else {
            record.actividad.clone()
        };
        *acc.entry(key).or_default() += record.horas_invertidas;
    }

    for event in events {
        let label = if event.sistema.is_empty() {
            event.tipo.as_str().to_string()
        } else {
            event.sistema.clone()
        };
        *acc.entry(format!("Prod: {label}")).or_default() +=
            f64::from(event.duracion_min) / 60.0;
    }

    acc.into_iter().collect()
}

/// Per-project aggregate for the active-projects panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRollup {
    pub proyecto: String,
    pub horas: f64,
    pub avance_mm: f64,
    pub total_mm: f64,
    pub count: usize,
    pub estado: RecordStatus,
    /// `None` when the planned total is zero (undefined, not infinity).
    pub completion_percent: Option<f64>,
}

/// Group records by project, summing hours and millimeters.
///
/// A project shows `Completado` as soon as any of its records does,
/// otherwise `En progreso`.
pub fn project_rollups(records: &[ProgressRecord]) -> Vec<ProjectRollup> {
    let mut acc: BTreeMap<String, ProjectRollup> = BTreeMap::new();

    for record in records {
        let key = if record.proyecto.is_empty() {
            "Sin proyecto".to_string()
        } else {
            record.proyecto.clone()
        };
        let entry = acc.entry(key.clone()).or_insert_with(|| ProjectRollup {
            proyecto: key,
            horas: 0.0,
            avance_mm: 0.0,
            total_mm: 0.0,
            count: 0,
            estado: RecordStatus::EnProgreso,
            completion_percent: None,
        });
        entry.horas += record.horas_invertidas;
        entry.avance_mm += record.avance_mm;
        entry.total_mm += record.total_mm;
        entry.count += 1;
        if record.estado == RecordStatus::Completado {
            entry.estado = RecordStatus::Completado;
        }
    }

    let mut rollups: Vec<ProjectRollup> = acc.into_values().collect();
    for rollup in &mut rollups {
        rollup.completion_percent = if rollup.total_mm == 0.0 {
            None
        } else {
            Some((rollup.avance_mm / rollup.total_mm * 100.0).round())
        };
    }
    rollups
}

/// Per-operator productivity shares.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorProductivity {
    pub operario: String,
    /// Distinct days with at least one event.
    pub dias: usize,
    /// Productive minutes.
    pub tpr: u32,
    /// Total minutes across all entry types.
    pub td: u32,
    pub pct_prod: f64,
    pub pct_pnp: f64,
    pub pct_tm: f64,
    pub pct_rw: f64,
}

/// Productivity percentages per operator, sorted by operator name.
pub fn operator_productivity(events: &[ProductivityEvent]) -> Vec<OperatorProductivity> {
    #[derive(Default)]
    struct Tally {
        dias: BTreeSet<chrono::NaiveDate>,
        tpr: u32,
        pnp: u32,
        tm: u32,
        rw: u32,
        td: u32,
    }

    let mut acc: BTreeMap<String, Tally> = BTreeMap::new();
    for event in events {
        let tally = acc.entry(event.operario.clone()).or_default();
        tally.dias.insert(event.fecha);
        match event.tipo {
            EventType::Productivo => tally.tpr += event.duracion_min,
            EventType::Pnp => tally.pnp += event.duracion_min,
            EventType::Tm => tally.tm += event.duracion_min,
            EventType::Rw => tally.rw += event.duracion_min,
            EventType::Adm | EventType::CapNp => {}
        }
        tally.td += event.duracion_min;
    }

    acc.into_iter()
        .map(|(operario, tally)| {
            let pct = |part: u32| {
                if tally.td > 0 {
                    f64::from(part) / f64::from(tally.td) * 100.0
                } else {
                    0.0
                }
            };
            OperatorProductivity {
                operario,
                dias: tally.dias.len(),
                tpr: tally.tpr,
                td: tally.td,
                pct_prod: pct(tally.tpr),
                pct_pnp: pct(tally.pnp),
                pct_tm: pct(tally.tm),
                pct_rw: pct(tally.rw),
            }
        })
        .collect()
}

/// Bloque × sistema matrix of productive minutes.
///
/// Returns the sorted block list alongside the cell map keyed by
/// `(bloque, sistema)`. Only `PRODUCTIVO` entries count.
pub fn block_system_matrix(
    events: &[ProductivityEvent],
) -> (Vec<String>, BTreeMap<(String, String), u32>) {
    let mut bloques: BTreeSet<String> = BTreeSet::new();
    let mut cells: BTreeMap<(String, String), u32> = BTreeMap::new();

    for event in events {
        if event.tipo != EventType::Productivo {
            continue;
        }
        let bloque = if event.bloque.is_empty() { "-".to_string() } else { event.bloque.clone() };
        bloques.insert(bloque.clone());
        *cells.entry((bloque, event.sistema.clone())).or_default() += event.duracion_min;
    }

    (bloques.into_iter().collect(), cells)
}
