use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("transfer payment not approved")]
    PaymentNotApproved,

    #[error("not authorized: {0}")]
    NotAuthorized(String),

    #[error("order already claimed")]
    AlreadyClaimed,

    #[error("no active claim request")]
    NoActiveRequest,

    #[error("worker not eligible: {0}")]
    WorkerNotEligible(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidTransition { .. }
            | AppError::PaymentNotApproved
            | AppError::AlreadyClaimed
            | AppError::NoActiveRequest
            | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotAuthorized(_) | AppError::WorkerNotEligible(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
