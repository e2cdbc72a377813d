use axum::Json;
use serde::Serialize;

const HEALTH_MESSAGE: &str = "Claude API proxy server is running";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: String,
    message: &'static str,
}

/// Health check handler
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: jiff::Timestamp::now().to_string(),
        message: HEALTH_MESSAGE,
    })
}
