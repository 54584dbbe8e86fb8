//! Handlers for the learner progress ledger.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use parlance_core::catalog::{find_topic, Location};
use parlance_core::error::CoreError;
use parlance_core::progress::{CompletionOutcome, UserProgress};
use parlance_core::registry::{DifficultyTier, LanguageCode};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecordCompletionRequest {
    pub location: Location,
}

#[derive(Debug, Deserialize)]
pub struct MarkTopicRequest {
    pub location: Location,
    pub tier: DifficultyTier,
    pub topic_id: String,
}

#[derive(Debug, Serialize)]
pub struct MarkTopicResponse {
    /// `false` when the topic was already marked complete.
    pub added: bool,
}

// ---------------------------------------------------------------------------
// GET /progress/{language}
// ---------------------------------------------------------------------------

pub async fn get_progress(
    State(state): State<AppState>,
    Path(language): Path<String>,
) -> AppResult<Json<DataResponse<UserProgress>>> {
    let language: LanguageCode = language.parse()?;
    let progress = state.with_progress(move |ledger| ledger.load(language)).await?;
    Ok(Json(DataResponse { data: progress }))
}

// ---------------------------------------------------------------------------
// POST /progress/{language}/completions
// ---------------------------------------------------------------------------

/// Record one finished conversation at a location on the current tier.
pub async fn record_completion(
    State(state): State<AppState>,
    Path(language): Path<String>,
    Json(body): Json<RecordCompletionRequest>,
) -> AppResult<Json<DataResponse<CompletionOutcome>>> {
    let language: LanguageCode = language.parse()?;
    let location = body.location;
    let outcome = state
        .with_progress(move |ledger| ledger.record_completion(language, location))
        .await?;

    tracing::info!(
        %language,
        %location,
        completed_stages = outcome.completed_stages,
        advanced = outcome.advanced,
        "Stage completion recorded"
    );

    Ok(Json(DataResponse { data: outcome }))
}

// ---------------------------------------------------------------------------
// POST /progress/{language}/topics
// ---------------------------------------------------------------------------

/// Mark a catalog topic as completed. Idempotent.
pub async fn mark_topic_complete(
    State(state): State<AppState>,
    Path(language): Path<String>,
    Json(body): Json<MarkTopicRequest>,
) -> AppResult<Json<DataResponse<MarkTopicResponse>>> {
    let language: LanguageCode = language.parse()?;
    if find_topic(body.location, body.tier, &body.topic_id).is_none() {
        return Err(CoreError::NotFound {
            entity: "Topic",
            key: format!("{}/{}/{}", body.location, body.tier, body.topic_id),
        }
        .into());
    }

    let MarkTopicRequest {
        location,
        tier,
        topic_id,
    } = body;
    let added = state
        .with_progress(move |ledger| ledger.mark_topic_complete(language, location, tier, &topic_id))
        .await?;

    Ok(Json(DataResponse {
        data: MarkTopicResponse { added },
    }))
}
