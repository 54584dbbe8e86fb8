//! JSON envelopes shared by every endpoint.
//!
//! Successful bodies are `{ "data": ... }`; failures are
//! `{ "error": ..., "code": ... }` (built by [`crate::error::AppError`]).

use serde::Serialize;

/// Success envelope: handlers return `Json(DataResponse { data })`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Failure envelope. `code` is a stable machine-readable identifier such as
/// `NO_SPEECH`; `error` is safe to show to the learner.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}
