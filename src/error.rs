//! Error types for Sketchgen
//!
//! `AppError` covers failures reported before a stream is opened; they become
//! a single JSON body with a client or server status. Failures after the
//! stream is committed are `StreamError`s (see `llm::provider`) and travel
//! in-band as an error event.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No LLM configuration available. Please configure environment variables or provide client config.")]
    ConfigMissing,

    #[error("Missing required parameter: userInput")]
    InputMissing,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Error response body.
///
/// `error` stays a plain string so existing clients can display it as-is.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ConfigMissing => (StatusCode::BAD_REQUEST, "CONFIG_MISSING"),
            AppError::InputMissing => (StatusCode::BAD_REQUEST, "INPUT_MISSING"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Internal(e) => {
                error!(error = %e, "Internal error while handling request");
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
