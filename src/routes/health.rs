//! Health check endpoints

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::disk::DiskUsage;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk: Option<DiskUsage>,
}

#[derive(Serialize)]
pub struct GrobidHealthResponse {
    pub status: &'static str,
}

/// Server liveness. Low disk space reports degraded with 503.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let disk_config = &state.config().disk;

    let disk = match DiskUsage::measure(&disk_config.path) {
        Ok(usage) => Some(usage),
        Err(e) => {
            tracing::warn!("Could not read disk usage for {}: {}", disk_config.path.display(), e);
            None
        }
    };

    let healthy = disk.is_some_and(|usage| !usage.is_low(disk_config.degraded_percent));
    let (status, label) = if healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(HealthResponse {
            status: label,
            version: env!("CARGO_PKG_VERSION"),
            service: "grobid-parse-server",
            disk,
        }),
    )
}

/// GROBID liveness as seen from this server
pub async fn grobid_health(State(state): State<AppState>) -> (StatusCode, Json<GrobidHealthResponse>) {
    if state.pipeline().grobid_alive().await {
        (StatusCode::OK, Json(GrobidHealthResponse { status: "alive" }))
    } else {
        tracing::warn!("GROBID health check failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(GrobidHealthResponse { status: "dead" }),
        )
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/grobid-health", get(grobid_health))
}
