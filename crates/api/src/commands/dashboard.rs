//! Dashboard KPI commands.
//!
//! Pure aggregation over the loaded record and event sets; the math lives
//! in `slipway_core::kpi`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use slipway_core::kpi::{self, OperatorProductivity, ProjectRollup, StatusBreakdown};
use slipway_domain::ProgressRecord;
use tracing::warn;

use crate::context::AppContext;
use crate::utils::logging::log_command_execution;

/// KPI panel for one modelista's own records.
#[derive(Debug, Clone)]
pub struct ModelistaDashboard {
    pub records: Vec<ProgressRecord>,
    pub status: StatusBreakdown,
    pub total_horas: f64,
    pub horas_por_actividad: Vec<(String, f64)>,
    pub proyectos: Vec<ProjectRollup>,
}

/// Division-wide KPI panel for the lead view.
#[derive(Debug, Clone)]
pub struct LiderDashboard {
    pub status: StatusBreakdown,
    pub total_horas: f64,
    pub proyectos: Vec<ProjectRollup>,
    pub registros: usize,
}

/// Productivity analysis panel.
#[derive(Debug, Clone)]
pub struct ProductivityDashboard {
    pub operarios: Vec<OperatorProductivity>,
    pub bloques: Vec<String>,
    pub matriz: BTreeMap<(String, String), u32>,
}

/// Aggregate one user's records for the modelista dashboard.
pub async fn modelista_dashboard(
    context: &Arc<AppContext>,
    user_id: &str,
) -> Result<ModelistaDashboard, String> {
    let started = Instant::now();

    let result = match context.ledger.load_for_user(user_id).await {
        Ok(records) => Ok(ModelistaDashboard {
            status: kpi::status_breakdown(&records),
            total_horas: kpi::total_hours(&records, &[]),
            horas_por_actividad: kpi::hours_by_activity(&records, &[]),
            proyectos: kpi::project_rollups(&records),
            records,
        }),
        Err(err) => Err(err.to_string()),
    };

    log_command_execution("dashboard::modelista_dashboard", started.elapsed(), result.is_ok());
    result
}

/// Aggregate every user's records for the lead dashboard.
///
/// A user whose records fail to load is skipped with a warning; the
/// dashboard renders from whatever loaded.
pub async fn lider_dashboard(context: &Arc<AppContext>) -> Result<LiderDashboard, String> {
    let started = Instant::now();

    let result = match context.directory.list_users().await {
        Ok(users) => {
            let mut records: Vec<ProgressRecord> = Vec::new();
            for user in &users {
                match context.progress_store.records_by_user(&user.id).await {
                    Ok(user_records) => records.extend(user_records),
                    Err(err) => {
                        warn!(uid = %user.id, error = %err, "records skipped in lead dashboard");
                    }
                }
            }
            Ok(LiderDashboard {
                status: kpi::status_breakdown(&records),
                total_horas: kpi::total_hours(&records, &[]),
                proyectos: kpi::project_rollups(&records),
                registros: records.len(),
            })
        }
        Err(err) => Err(err.to_string()),
    };

    log_command_execution("dashboard::lider_dashboard", started.elapsed(), result.is_ok());
    result
}

/// Aggregate the merged productivity event set.
pub async fn productivity_dashboard(
    context: &Arc<AppContext>,
) -> Result<ProductivityDashboard, String> {
    let started = Instant::now();

    let events = context.productivity.load_events().await;
    let (bloques, matriz) = kpi::block_system_matrix(&events);
    let dashboard = ProductivityDashboard {
        operarios: kpi::operator_productivity(&events),
        bloques,
        matriz,
    };

    log_command_execution("dashboard::productivity_dashboard", started.elapsed(), true);
    Ok(dashboard)
}
