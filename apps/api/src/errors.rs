use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::wizard::error::WizardError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Request in flight: {0}")]
    RequestInFlight(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<WizardError> for AppError {
    fn from(e: WizardError) -> Self {
        let message = e.to_string();
        match e {
            WizardError::InvalidTransition { .. } => AppError::InvalidTransition(message),
            WizardError::RequestInFlight => AppError::RequestInFlight(message),
            WizardError::AlreadySaved | WizardError::SaveRequired => AppError::Conflict(message),
            WizardError::Validation(_)
            | WizardError::AnswerRequired
            | WizardError::QuestionOutOfRange { .. }
            | WizardError::OptionOutOfRange(_) => AppError::Validation(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            AppError::InvalidTransition(msg) => (StatusCode::CONFLICT, "INVALID_TRANSITION", msg),
            AppError::RequestInFlight(msg) => (StatusCode::CONFLICT, "REQUEST_IN_FLIGHT", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
