//! Audio upload validation.

use crate::error::TranscriptionError;

/// Largest recording accepted for transcription (25 MiB).
pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

/// MIME types accepted for transcription, without parameters.
pub const SUPPORTED_AUDIO_TYPES: &[&str] = &[
    "audio/webm",
    "audio/ogg",
    "audio/wav",
    "audio/x-wav",
    "audio/mpeg",
    "audio/mp3",
    "audio/mp4",
    "audio/m4a",
    "audio/x-m4a",
    "audio/flac",
];

/// A recorded utterance as uploaded by the browser.
#[derive(Debug, Clone)]
pub struct AudioPayload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

impl AudioPayload {
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
            content_type: content_type.into(),
        }
    }

    /// MIME type with parameters such as `;codecs=opus` removed.
    pub fn base_content_type(&self) -> String {
        self.content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase()
    }

    /// Reject empty, oversized or unsupported recordings.
    pub fn validate(&self) -> Result<(), TranscriptionError> {
        if self.bytes.is_empty() {
            return Err(TranscriptionError::EmptyAudio);
        }
        if self.bytes.len() > MAX_AUDIO_BYTES {
            return Err(TranscriptionError::TooLarge {
                size: self.bytes.len(),
                max: MAX_AUDIO_BYTES,
            });
        }
        let base = self.base_content_type();
        if !SUPPORTED_AUDIO_TYPES.contains(&base.as_str()) {
            return Err(TranscriptionError::UnsupportedFormat(self.content_type.clone()));
        }
        Ok(())
    }
}
