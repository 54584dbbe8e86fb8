//! Upstream model collaborators.
//!
//! The rest of the workspace only sees the [`LanguageModel`] and
//! [`SpeechToText`] traits. [`openai::OpenAiClient`] implements both
//! against an OpenAI-compatible REST API using [`reqwest`].

pub mod audio;
pub mod error;
pub mod model;
pub mod openai;

pub use audio::AudioPayload;
pub use error::{LlmError, TranscriptionError};
pub use model::{CompletionParams, LanguageModel, SpeechToText};
