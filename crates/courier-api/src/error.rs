//! Request-level error type. Every variant maps to a fixed status and a
//! `{"error": ...}` body; verification and store details stay in the logs.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use courier_types::api::ErrorBody;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Unknown email")]
    UnknownEmail,

    #[error("Validation error: {0}")]
    Validation(&'static str),

    #[error("Token signing failed: {0}")]
    TokenIssue(#[from] jsonwebtoken::errors::Error),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            ApiError::UnknownEmail => (StatusCode::UNAUTHORIZED, "unknown email"),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, *msg),
            ApiError::TokenIssue(e) => {
                tracing::error!("Token signing failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate token")
            }
            ApiError::Store(e) => {
                tracing::error!("Store error: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "db error")
            }
        };

        let body = ErrorBody {
            error: message.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
