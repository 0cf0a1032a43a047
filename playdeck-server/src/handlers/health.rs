//! Health check and service banner.

use crate::server::PlaydeckServer;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::json;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: i64,
}

/// Health check handler; 503 when the backing store is unreachable.
pub async fn health_check(
    State(server): State<PlaydeckServer>,
) -> (StatusCode, Json<HealthResponse>) {
    let storage_ok = server.auth.storage_healthy().await && server.scores.storage_healthy().await;

    let uptime_seconds = (chrono::Utc::now() - server.started_at).num_seconds();
    let response = HealthResponse {
        status: if storage_ok { "healthy" } else { "unhealthy" }.to_string(),
        database: if storage_ok { "connected" } else { "disconnected" }.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
    };

    let status = if storage_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// Root endpoint: service banner with an endpoint index.
pub async fn service_info(State(server): State<PlaydeckServer>) -> Json<serde_json::Value> {
    Json(json!({
        "message": server.config.name,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "auth": "/api/auth",
            "users": "/api/users",
            "scores": "/api/scores",
        },
    }))
}
