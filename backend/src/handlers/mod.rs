pub mod items;

use axum::{http::StatusCode, Json};
use serde_json::json;
use tracing::error;

use crate::error::{AppError, AppResult};

pub const SIMULATED_ERROR_DETAIL: &str = "Simulated internal server error";

pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Fails on every call so consumers can exercise their own 5xx handling.
pub async fn simulate_error() -> AppResult<()> {
    error!("Serving simulated internal server error");
    Err(AppError::Internal(SIMULATED_ERROR_DETAIL.to_string()))
}

pub async fn route_not_found() -> AppError {
    AppError::NotFound("Not Found".to_string())
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
