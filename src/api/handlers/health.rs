//! Health and metrics handlers

use crate::api::{state::AppState, types::*};
use axum::{extract::State, http::StatusCode, Json};
use std::collections::HashMap;
use std::time::SystemTime;

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    let mut checks = HashMap::new();

    checks.insert(
        "server".to_string(),
        CheckResult {
            status: "healthy".to_string(),
            message: Some("Server is running".to_string()),
        },
    );

    let consistent = state.sessions.is_consistent();
    checks.insert(
        "sessions".to_string(),
        CheckResult {
            status: if consistent { "healthy" } else { "degraded" }.to_string(),
            message: Some(format!("{} active session(s)", state.sessions.active_sessions())),
        },
    );

    let overall_status = if checks.values().all(|c| c.status == "healthy") {
        "healthy"
    } else {
        "degraded"
    };

    let uptime = SystemTime::now()
        .duration_since(state.start_time)
        .unwrap_or_default()
        .as_secs();

    Json(ApiResponse::success(HealthStatus {
        status: overall_status.to_string(),
        checks,
        uptime_seconds: uptime,
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// Prometheus scrape endpoint
pub async fn export_metrics(State(state): State<AppState>) -> Result<String, StatusCode> {
    if !state.config.monitoring.metrics_enabled {
        return Err(StatusCode::NOT_FOUND);
    }

    state.metrics.set_active_sessions(state.sessions.active_sessions());
    Ok(state.metrics.export_prometheus())
}
