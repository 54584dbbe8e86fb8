//! Route definitions for the static catalog.
//!
//! ```text
//! GET    /languages                                   list_languages
//! GET    /locations                                   list_locations
//! GET    /locations/{location}/tiers/{tier}/topics    list_topics
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/languages", get(catalog::list_languages))
        .route("/locations", get(catalog::list_locations))
        .route(
            "/locations/{location}/tiers/{tier}/topics",
            get(catalog::list_topics),
        )
}
