use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Completion error: {0}")]
    Completion(#[from] LlmError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Completion(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message safe to hand back to the client. Server-side failures
    /// collapse to a generic string; the detail only goes to the log.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Database(_) => "Server error occurred".to_string(),
            AppError::Completion(_) => "Error calling OpenAI".to_string(),
        }
    }

    /// Emits the server-side detail for 5xx errors.
    pub fn log(&self) {
        match self {
            AppError::Validation(msg) => tracing::debug!("Rejected request: {msg}"),
            AppError::Database(e) => tracing::error!("Database error: {e}"),
            AppError::Completion(e) => tracing::error!("Completion error: {e}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let body = Json(json!({ "error": self.public_message() }));
        (self.status_code(), body).into_response()
    }
}

/// Failure of the profile page action. Reported inside the action envelope
/// `{status, body: {message}}` rather than the flat `{error}` body.
#[derive(Debug)]
pub struct ActionError(pub AppError);

impl From<AppError> for ActionError {
    fn from(e: AppError) -> Self {
        ActionError(e)
    }
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        self.0.log();
        let status = self.0.status_code();
        let body = Json(json!({
            "status": status.as_u16(),
            "body": { "message": self.0.public_message() }
        }));
        (status, body).into_response()
    }
}
