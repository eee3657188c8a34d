use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::quiz::session::QuizError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant is terminal for the current user action only; the session
/// stays valid and the user may retry.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Quiz error: {0}")]
    QuizState(#[from] QuizError),

    #[error("Could not reach the completion service: {0}")]
    Transport(String),

    #[error("Completion service returned status {status}")]
    Upstream { status: u16, body: String },

    #[error("Unexpected completion response: {reason}")]
    Schema { reason: String, raw: String },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Unreachable(msg) => AppError::Transport(msg),
            LlmError::Transport(e) => AppError::Transport(e.to_string()),
            LlmError::Api { status, body } => AppError::Upstream { status, body },
            LlmError::Schema { reason, raw } => AppError::Schema { reason, raw },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details): (StatusCode, &str, String, Option<Value>) =
            match &self {
                AppError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
                }
                AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
                AppError::QuizState(e) => {
                    (StatusCode::CONFLICT, "QUIZ_STATE_ERROR", e.to_string(), None)
                }
                AppError::Transport(msg) => {
                    tracing::warn!("Transport error: {msg}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "TRANSPORT_ERROR",
                        "Could not reach the AI service. Check your connection and try again."
                            .to_string(),
                        Some(json!({ "cause": msg })),
                    )
                }
                AppError::Upstream { status, body } => {
                    tracing::error!("Completion API returned {status}: {body}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "UPSTREAM_STATUS_ERROR",
                        format!("The AI service returned HTTP {status}. Check your API key and model."),
                        Some(json!({ "status": status, "body": body })),
                    )
                }
                AppError::Schema { reason, raw } => {
                    tracing::error!("Completion response schema error ({reason}): {raw}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "SCHEMA_ERROR",
                        format!("The AI service sent a response we could not read: {reason}"),
                        Some(json!({ "raw_response": raw })),
                    )
                }
                AppError::Internal(e) => {
                    tracing::error!("Internal error: {e:?}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal server error occurred".to_string(),
                        None,
                    )
                }
            };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
