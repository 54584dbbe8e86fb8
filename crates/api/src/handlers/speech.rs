//! Speech-to-text upload handler.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use parlance_core::registry::LanguageCode;
use parlance_llm::AudioPayload;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Content type assumed when the browser omits one.
const DEFAULT_AUDIO_TYPE: &str = "audio/webm";

#[derive(Debug, Serialize)]
pub struct TranscriptionResponse {
    pub text: String,
}

/// POST /speech/transcribe
///
/// Accepts a multipart form with a required `audio` field and an optional
/// `language` field (locale code used as a recognition hint). Invalid audio
/// is rejected before the speech service is called.
pub async fn transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<TranscriptionResponse>>> {
    let mut audio: Option<AudioPayload> = None;
    let mut language: Option<LanguageCode> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "audio" => {
                let file_name = field.file_name().unwrap_or("recording.webm").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_AUDIO_TYPE)
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                audio = Some(AudioPayload::new(bytes.to_vec(), file_name, content_type));
            }
            "language" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if !text.trim().is_empty() {
                    language = Some(text.parse()?);
                }
            }
            _ => {} // ignore unknown fields
        }
    }

    let audio =
        audio.ok_or_else(|| AppError::BadRequest("Missing required 'audio' field".into()))?;
    audio.validate()?;

    let size = audio.bytes.len();
    let text = state.stt.transcribe(audio, language).await?;

    tracing::info!(
        bytes = size,
        language = language.map(|l| l.code()),
        chars = text.chars().count(),
        "Audio transcribed"
    );

    Ok(Json(DataResponse {
        data: TranscriptionResponse { text },
    }))
}
