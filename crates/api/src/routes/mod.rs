pub mod catalog;
pub mod conversation;
pub mod health;
pub mod progress;
pub mod speech;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /languages                                    supported languages
/// /locations                                    locations, characters, tier settings
/// /locations/{location}/tiers/{tier}/topics     topic catalog bucket
///
/// /conversation/start                           enter a location (POST)
/// /conversation/turn                            submit a learner message (POST)
/// /conversation/hint                            coaching hint (POST)
/// /conversation/evaluate                        grammar verdict (POST)
///
/// /speech/transcribe                            audio upload (POST, multipart)
///
/// /progress/{language}                          progress record (GET)
/// /progress/{language}/completions              record a stage (POST)
/// /progress/{language}/topics                   mark a topic complete (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(catalog::router())
        .nest("/conversation", conversation::router())
        .nest("/speech", speech::router())
        .nest("/progress", progress::router())
}
