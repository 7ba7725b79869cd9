//! Router utilities shared by every deployment

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

/// Build health check routes
///
/// - GET /health
/// - GET /healthz
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "orderapi"
    }))
}
