//! Route definitions for speech input (mounted at `/speech`).
//!
//! ```text
//! POST   /transcribe   transcribe (multipart)
//! ```

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use parlance_llm::audio::MAX_AUDIO_BYTES;

use crate::handlers::speech;
use crate::state::AppState;

/// Headroom over the audio limit for multipart framing and the language field,
/// so oversized recordings reach the handler and get a specific error.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/transcribe", post(speech::transcribe))
        .layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES + MULTIPART_OVERHEAD_BYTES))
}
