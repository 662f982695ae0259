//! `GET /health` (`spec.md` §6): `{status, service, timestamp, version}`.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "underwriting-pipeline",
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
