//! Route definitions for conversations (mounted at `/conversation`).
//!
//! ```text
//! POST   /start        start_conversation
//! POST   /turn         take_turn
//! POST   /hint         request_hint
//! POST   /evaluate     evaluate_message
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::conversation;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(conversation::start_conversation))
        .route("/turn", post(conversation::take_turn))
        .route("/hint", post(conversation::request_hint))
        .route("/evaluate", post(conversation::evaluate_message))
}
