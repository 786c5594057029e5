use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::validation::{FieldError, RuleViolation};

pub const INVALID_PAYLOAD_DETAIL: &str = "Invalid request payload";

/// Every failure a handler or extractor can surface to a client.
///
/// This is the only place statuses and error bodies are decided; nothing else
/// builds an error response by hand.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Body or path failed structural decoding (400, envelope with `errors`).
    #[error("Invalid request payload: {} field error(s)", .0.len())]
    InvalidPayload(Vec<FieldError>),

    #[error(transparent)]
    Rule(#[from] RuleViolation),

    #[error("{0}")]
    NotFound(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidPayload(_) | AppError::Rule(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FieldError> for AppError {
    fn from(err: FieldError) -> Self {
        AppError::InvalidPayload(vec![err])
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::InvalidPayload(errors) => json!({
                "detail": INVALID_PAYLOAD_DETAIL,
                "errors": errors,
            }),
            other => json!({ "detail": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
