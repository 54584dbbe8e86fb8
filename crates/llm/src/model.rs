//! Collaborator traits consumed by the API layer.

use async_trait::async_trait;
use parlance_core::registry::LanguageCode;
use parlance_core::session::ChatMessage;

use crate::audio::AudioPayload;
use crate::error::{LlmError, TranscriptionError};

/// Sampling parameters for one completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionParams {
    /// Character replies: short and lively.
    pub const CHAT: Self = Self {
        max_tokens: 150,
        temperature: 0.8,
    };

    /// Coaching hints.
    pub const HINT: Self = Self {
        max_tokens: 100,
        temperature: 0.7,
    };

    /// Grammar verdicts: terse and stable.
    pub const EVALUATION: Self = Self {
        max_tokens: 120,
        temperature: 0.2,
    };
}

/// Text completion over an ordered message list (system first).
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &CompletionParams,
    ) -> Result<String, LlmError>;
}

/// Speech recognition for a single recorded utterance.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(
        &self,
        audio: AudioPayload,
        language: Option<LanguageCode>,
    ) -> Result<String, TranscriptionError>;
}
