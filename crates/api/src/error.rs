use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use parlance_core::error::CoreError;
use parlance_llm::{LlmError, TranscriptionError};

use crate::response::ErrorResponse;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and the upstream collaborator
/// errors, and adds HTTP-specific variants. Implements [`IntoResponse`] to
/// produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `parlance_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The language model could not be reached or refused the call.
    #[error(transparent)]
    Upstream(#[from] LlmError),

    /// Speech recognition failed or the audio was rejected.
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const UPSTREAM_MESSAGE: &str = "The conversation service is unavailable right now";

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn upstream_unavailable(err: &LlmError) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %err, "Upstream model call failed");
    (
        StatusCode::BAD_GATEWAY,
        "UPSTREAM_UNAVAILABLE",
        UPSTREAM_MESSAGE.to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, key } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} '{key}' not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Upstream model errors ---
            AppError::Upstream(err) => upstream_unavailable(err),

            // --- Speech recognition errors ---
            AppError::Transcription(err) => match err {
                TranscriptionError::EmptyAudio => {
                    (StatusCode::BAD_REQUEST, "EMPTY_AUDIO", err.to_string())
                }
                TranscriptionError::TooLarge { .. } => (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "AUDIO_TOO_LARGE",
                    err.to_string(),
                ),
                TranscriptionError::UnsupportedFormat(_) => (
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    "UNSUPPORTED_AUDIO",
                    err.to_string(),
                ),
                TranscriptionError::NoSpeech => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "NO_SPEECH",
                    err.to_string(),
                ),
                TranscriptionError::RateLimited => (
                    StatusCode::TOO_MANY_REQUESTS,
                    "RATE_LIMITED",
                    "Too many recordings, please wait a moment and try again".to_string(),
                ),
                TranscriptionError::Unauthenticated => {
                    tracing::error!("Speech service rejected credentials");
                    (
                        StatusCode::BAD_GATEWAY,
                        "UPSTREAM_UNAUTHENTICATED",
                        UPSTREAM_MESSAGE.to_string(),
                    )
                }
                TranscriptionError::Upstream(inner) => upstream_unavailable(inner),
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = ErrorResponse {
            error: message,
            code,
        };

        (status, axum::Json(body)).into_response()
    }
}
