//! HTTP handlers for mock-psp-service.

pub mod checkout;
pub mod payments;
pub mod webhook;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;
use service_core::observability::render_metrics;
use service_core::payments::parse_payment_id;
use uuid::Uuid;

use crate::startup::AppState;

pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "mock-psp-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "status": "ready", "payments": state.store.len().await })),
    )
}

pub async fn metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        render_metrics(),
    )
}

pub(crate) fn not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("not found"))
}

pub(crate) fn payment_id(raw: &str) -> Result<Uuid, AppError> {
    parse_payment_id(raw).ok_or_else(not_found)
}
