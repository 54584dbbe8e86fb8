//! Route definitions for learner progress (mounted at `/progress`).
//!
//! ```text
//! GET    /{language}               get_progress
//! POST   /{language}/completions   record_completion
//! POST   /{language}/topics        mark_topic_complete
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::progress;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{language}", get(progress::get_progress))
        .route("/{language}/completions", post(progress::record_completion))
        .route("/{language}/topics", post(progress::mark_topic_complete))
}
