//! REST client for an OpenAI-compatible API.
//!
//! Wraps `POST /chat/completions` and `POST /audio/transcriptions` using
//! [`reqwest`]. No retries: one failed call is one failed turn.

use async_trait::async_trait;
use parlance_core::registry::LanguageCode;
use parlance_core::session::{ChatMessage, Role};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::audio::AudioPayload;
use crate::error::{LlmError, TranscriptionError};
use crate::model::{CompletionParams, LanguageModel, SpeechToText};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default chat model.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
/// Default transcription model.
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Connection settings for the upstream API.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Bearer token. `None` makes every call fail as upstream-unavailable.
    pub api_key: Option<String>,
    pub base_url: String,
    pub chat_model: String,
    pub transcription_model: String,
}

impl OpenAiConfig {
    /// Load upstream configuration from environment variables.
    ///
    /// | Env Var                      | Required | Default                      |
    /// |------------------------------|----------|------------------------------|
    /// | `OPENAI_API_KEY`             | no       | -- (calls fail until set)    |
    /// | `OPENAI_BASE_URL`            | no       | `https://api.openai.com/v1`  |
    /// | `OPENAI_CHAT_MODEL`          | no       | `gpt-4o-mini`                |
    /// | `OPENAI_TRANSCRIPTION_MODEL` | no       | `whisper-1`                  |
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let chat_model =
            std::env::var("OPENAI_CHAT_MODEL").unwrap_or_else(|_| DEFAULT_CHAT_MODEL.into());

        let transcription_model = std::env::var("OPENAI_TRANSCRIPTION_MODEL")
            .unwrap_or_else(|_| DEFAULT_TRANSCRIPTION_MODEL.into());

        Self {
            api_key,
            base_url,
            chat_model,
            transcription_model,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the upstream model API.
pub struct OpenAiClient {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: OpenAiConfig) -> Self {
        Self { client, config }
    }

    fn api_key(&self) -> Result<&str, LlmError> {
        self.config
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingCredentials)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or [`LlmError::Api`] with the status and body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &CompletionParams,
    ) -> Result<String, LlmError> {
        let api_key = self.api_key()?;

        let body = ChatCompletionRequest {
            model: &self.config.chat_model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: wire_role(m.role),
                    content: &m.text,
                })
                .collect(),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let parsed: ChatCompletionResponse = Self::ensure_success(response).await?.json().await?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        tracing::debug!(
            model = %self.config.chat_model,
            messages = messages.len(),
            reply_chars = text.len(),
            "Chat completion received"
        );
        Ok(text)
    }
}

/// Map an upstream transcription failure to the client-visible taxonomy.
fn classify_transcription_error(err: LlmError) -> TranscriptionError {
    match err {
        LlmError::MissingCredentials => TranscriptionError::Unauthenticated,
        LlmError::Api { status, .. } => match StatusCode::from_u16(status) {
            Ok(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                TranscriptionError::Unauthenticated
            }
            Ok(StatusCode::PAYLOAD_TOO_LARGE) => TranscriptionError::TooLarge {
                size: 0,
                max: crate::audio::MAX_AUDIO_BYTES,
            },
            Ok(StatusCode::TOO_MANY_REQUESTS) => TranscriptionError::RateLimited,
            _ => TranscriptionError::Upstream(err),
        },
        other => TranscriptionError::Upstream(other),
    }
}

impl OpenAiClient {
    async fn send_transcription(
        &self,
        audio: AudioPayload,
        language: Option<LanguageCode>,
    ) -> Result<String, LlmError> {
        let api_key = self.api_key()?;

        let part = Part::bytes(audio.bytes)
            .file_name(audio.file_name)
            .mime_str(&audio.content_type)?;
        let mut form = Form::new()
            .part("file", part)
            .text("model", self.config.transcription_model.clone());
        if let Some(language) = language {
            form = form.text("language", language.code());
        }

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.config.base_url))
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await?;

        let parsed: TranscriptionResponse = Self::ensure_success(response).await?.json().await?;
        Ok(parsed.text)
    }
}

#[async_trait]
impl SpeechToText for OpenAiClient {
    async fn transcribe(
        &self,
        audio: AudioPayload,
        language: Option<LanguageCode>,
    ) -> Result<String, TranscriptionError> {
        audio.validate()?;

        let text = self
            .send_transcription(audio, language)
            .await
            .map_err(classify_transcription_error)?;

        let text = text.trim();
        if text.is_empty() {
            return Err(TranscriptionError::NoSpeech);
        }
        Ok(text.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
