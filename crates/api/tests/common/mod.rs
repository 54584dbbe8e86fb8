#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use parlance_api::config::ServerConfig;
use parlance_api::router::build_app_router;
use parlance_api::state::AppState;
use parlance_core::progress::{KeyValueProgressStore, MemoryKeyValueStore, ProgressLedger};
use parlance_core::registry::LanguageCode;
use parlance_core::session::ChatMessage;
use parlance_llm::openai::OpenAiConfig;
use parlance_llm::{
    AudioPayload, CompletionParams, LanguageModel, LlmError, SpeechToText, TranscriptionError,
};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        evaluation_timeout_ms: 2_000,
        progress_dir: None,
        openai: OpenAiConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
            chat_model: "test-chat".to_string(),
            transcription_model: "test-stt".to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Fake collaborators
// ---------------------------------------------------------------------------

/// Canned model that answers character, hint and evaluation prompts
/// differently, recognising them by their format instructions.
pub struct ScriptedModel {
    pub reply: String,
    pub hint: String,
    pub verdict: String,
    pub verdict_delay: Duration,
    pub fail_chat: bool,
    pub calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl Default for ScriptedModel {
    fn default() -> Self {
        Self {
            reply: "¡Hola! ¿Qué te pongo?".to_string(),
            hint: "HINT: Try naming a drink and a size.".to_string(),
            verdict: "OK: well done".to_string(),
            verdict_delay: Duration::ZERO,
            fail_chat: false,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedModel {
    pub fn recorded_calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

fn mentions(messages: &[ChatMessage], needle: &str) -> bool {
    messages.iter().any(|m| m.text.contains(needle))
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _params: &CompletionParams,
    ) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(messages.to_vec());

        if mentions(messages, "CORRECTION:") {
            if !self.verdict_delay.is_zero() {
                tokio::time::sleep(self.verdict_delay).await;
            }
            return Ok(self.verdict.clone());
        }
        if mentions(messages, "HINT:") {
            return Ok(self.hint.clone());
        }
        if self.fail_chat {
            return Err(LlmError::MissingCredentials);
        }
        Ok(self.reply.clone())
    }
}

/// Speech recogniser returning a fixed result.
pub enum ScriptedSpeech {
    Text(String),
    NoSpeech,
    RateLimited,
}

#[async_trait]
impl SpeechToText for ScriptedSpeech {
    async fn transcribe(
        &self,
        _audio: AudioPayload,
        _language: Option<LanguageCode>,
    ) -> Result<String, TranscriptionError> {
        match self {
            ScriptedSpeech::Text(text) => Ok(text.clone()),
            ScriptedSpeech::NoSpeech => Err(TranscriptionError::NoSpeech),
            ScriptedSpeech::RateLimited => Err(TranscriptionError::RateLimited),
        }
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Everything a test may want to inspect after driving the router.
pub struct TestApp {
    pub router: Router,
    pub model: Arc<ScriptedModel>,
    pub progress: Arc<ProgressLedger>,
}

pub fn build_app_with(
    model: ScriptedModel,
    speech: ScriptedSpeech,
    config: ServerConfig,
) -> TestApp {
    let model = Arc::new(model);
    let progress = Arc::new(ProgressLedger::new(KeyValueProgressStore::new(
        MemoryKeyValueStore::new(),
    )));

    let state = AppState {
        config: Arc::new(config.clone()),
        llm: model.clone(),
        stt: Arc::new(speech),
        progress: Arc::clone(&progress),
    };

    TestApp {
        router: build_app_router(state, &config),
        model,
        progress,
    }
}

/// Build the full application router with default fakes.
///
/// Uses the same builder as `main.rs` so tests exercise the production
/// middleware stack.
pub fn build_test_app() -> TestApp {
    build_app_with(
        ScriptedModel::default(),
        ScriptedSpeech::Text("Quiero un café".to_string()),
        test_config(),
    )
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
