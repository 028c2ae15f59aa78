//! Health check types.

use serde::Serialize;

/// State of one probed component.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ComponentHealth {
    /// Healthy component.
    pub fn ok() -> Self {
        Self { ok: true, detail: None }
    }

    /// Failed component with a diagnostic detail.
    pub fn failed(detail: impl Into<String>) -> Self {
        Self { ok: false, detail: Some(detail.into()) }
    }
}

/// Aggregate context health.
///
/// Being offline is reported but is not unhealthy; the whole point of the
/// local cache is operating through it.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub healthy: bool,
    pub database: ComponentHealth,
    pub online: bool,
    pub session_active: bool,
}
