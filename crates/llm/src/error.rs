//! Error types for upstream model calls.

/// Failures talking to the text-completion collaborator.
///
/// Every variant is an "upstream unavailable" condition: the caller gets a
/// generic failure and nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// No API key is configured.
    #[error("Upstream credentials are not configured")]
    MissingCredentials,

    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upstream returned a non-2xx status code.
    #[error("Upstream API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// Failures turning audio into text.
///
/// The first three variants are raised locally before any upstream call.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("Audio payload is empty")]
    EmptyAudio,

    #[error("Audio payload is {size} bytes, exceeding the {max} byte limit")]
    TooLarge { size: usize, max: usize },

    #[error("Unsupported audio type '{0}'")]
    UnsupportedFormat(String),

    #[error("No speech was detected in the recording")]
    NoSpeech,

    #[error("Speech service rate limit reached")]
    RateLimited,

    #[error("Speech service rejected the configured credentials")]
    Unauthenticated,

    #[error(transparent)]
    Upstream(#[from] LlmError),
}
