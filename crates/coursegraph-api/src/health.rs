use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::warn;

const PING_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Serialize, Debug)]
pub struct ReadinessResponse {
    pub status: String,
    pub store: ComponentStatus,
}

#[derive(Serialize, Debug)]
pub struct ComponentStatus {
    pub status: String,
    pub response_time_ms: Option<u64>,
    pub error: Option<String>,
}

impl ComponentStatus {
    pub fn healthy(response_time_ms: u64) -> Self {
        Self {
            status: "healthy".to_string(),
            response_time_ms: Some(response_time_ms),
            error: None,
        }
    }

    pub fn unhealthy(error: String) -> Self {
        Self {
            status: "unhealthy".to_string(),
            response_time_ms: None,
            error: Some(error),
        }
    }
}

/// Liveness: the process answers.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

/// Readiness: the catalog store answers a ping. 503 with the failing
/// component otherwise.
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let start = Instant::now();
    let store = match timeout(PING_TIMEOUT, state.store().ping()).await {
        Ok(Ok(())) => ComponentStatus::healthy(start.elapsed().as_millis() as u64),
        Ok(Err(e)) => ComponentStatus::unhealthy(e.to_string()),
        Err(_) => ComponentStatus::unhealthy("store ping timed out".to_string()),
    };

    let (code, status) = match &store.error {
        None => (StatusCode::OK, "ready"),
        Some(error) => {
            warn!(%error, "catalog store not ready");
            (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
        }
    };

    (
        code,
        Json(ReadinessResponse {
            status: status.to_string(),
            store,
        }),
    )
}
