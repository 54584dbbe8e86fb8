use std::sync::Arc;

use parlance_core::progress::ProgressLedger;
use parlance_llm::{LanguageModel, SpeechToText};

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Text-completion collaborator (character replies, hints, evaluations).
    pub llm: Arc<dyn LanguageModel>,
    /// Speech-to-text collaborator.
    pub stt: Arc<dyn SpeechToText>,
    /// Learner progress, one record per learning language.
    pub progress: Arc<ProgressLedger>,
}

impl AppState {
    /// Run a ledger operation on the blocking pool. The file store does
    /// synchronous I/O while holding the ledger's write lock.
    pub async fn with_progress<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&ProgressLedger) -> T + Send + 'static,
        T: Send + 'static,
    {
        let ledger = Arc::clone(&self.progress);
        tokio::task::spawn_blocking(move || f(&ledger))
            .await
            .map_err(|e| AppError::InternalError(format!("Progress task failed: {e}")))
    }
}
