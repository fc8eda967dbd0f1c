use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use super::error::ApiError;
use crate::app::AppState;
use crate::scheduler::TaskStatus;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: chrono::DateTime<chrono::Utc>,
    checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    storage: ComponentHealth,
    /// `None` when the daily trigger is disabled
    scheduler: Option<TaskStatus>,
}

/// Health status of a component
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ComponentHealth {
    fn healthy(latency_ms: u64) -> Self {
        Self {
            status: "healthy".to_string(),
            latency_ms: Some(latency_ms),
            error: None,
        }
    }

    fn unhealthy(error: String) -> Self {
        Self {
            status: "unhealthy".to_string(),
            latency_ms: None,
            error: Some(error),
        }
    }

    fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// GET /health - Storage reachability plus daily task statistics
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let storage = check_storage(&state).await;
    let scheduler = match &state.scheduler {
        Some(s) => Some(s.status().await),
        None => None,
    };

    let healthy = storage.is_healthy();
    let response = HealthResponse {
        status: (if healthy { "healthy" } else { "degraded" }).to_string(),
        timestamp: chrono::Utc::now(),
        checks: HealthChecks { storage, scheduler },
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(response))
}

async fn check_storage(state: &AppState) -> ComponentHealth {
    let start = Instant::now();
    match state.probe.ping().await {
        Ok(()) => ComponentHealth::healthy(start.elapsed().as_millis() as u64),
        Err(e) => {
            tracing::warn!(error = %e, "storage health check failed");
            ComponentHealth::unhealthy(e.to_string())
        }
    }
}

/// GET /health/ready - Returns 200 once storage answers
pub async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state
        .probe
        .ping()
        .await
        .map(|()| StatusCode::OK)
        .map_err(|e| ApiError::ServiceUnavailable(e.to_string()))
}

/// GET /health/live - Returns 200 if the process is running
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_health_healthy() {
        let health = ComponentHealth::healthy(42);
        assert!(health.is_healthy());
        assert_eq!(health.latency_ms, Some(42));
        assert!(health.error.is_none());
    }

    #[test]
    fn test_component_health_unhealthy() {
        let health = ComponentHealth::unhealthy("Connection failed".to_string());
        assert!(!health.is_healthy());
        assert!(health.latency_ms.is_none());
        assert_eq!(health.error, Some("Connection failed".to_string()));
    }
}
