//! Service metadata endpoints

use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    message: &'static str,
    timestamp: String,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "Karlin Email Server is running",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

#[derive(Serialize)]
pub struct Endpoints {
    health: &'static str,
    #[serde(rename = "sendEmail")]
    send_email: &'static str,
}

#[derive(Serialize)]
pub struct RootResponse {
    message: &'static str,
    version: &'static str,
    endpoints: Endpoints,
}

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Karlin Pharmaceuticals Email API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            health: "GET /health",
            send_email: "POST /api/send-email",
        },
    })
}
