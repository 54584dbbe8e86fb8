//! Handlers for the static language, location and topic catalog.

use axum::extract::Path;
use axum::Json;
use serde::Serialize;

use parlance_core::catalog::{self, character_for, Character, Location, Topic, ALL_LOCATIONS};
use parlance_core::registry::{DifficultyTier, LanguageCode, TurnLimits};

use crate::error::AppResult;
use crate::response::DataResponse;

#[derive(Debug, Serialize)]
pub struct LanguageInfo {
    pub code: LanguageCode,
    pub name: &'static str,
    pub native_name: &'static str,
    pub speech_locale: &'static str,
    pub is_default: bool,
}

#[derive(Debug, Serialize)]
pub struct TierInfo {
    pub tier: DifficultyTier,
    pub name: &'static str,
    pub turn_limits: TurnLimits,
    pub scenario: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LocationInfo {
    pub id: Location,
    pub name: &'static str,
    pub character: Character,
    pub tiers: Vec<TierInfo>,
}

// ---------------------------------------------------------------------------
// GET /languages
// ---------------------------------------------------------------------------

pub async fn list_languages() -> Json<DataResponse<Vec<LanguageInfo>>> {
    let data = LanguageCode::ALL
        .into_iter()
        .map(|code| LanguageInfo {
            code,
            name: code.display_name(),
            native_name: code.native_name(),
            speech_locale: code.speech_locale(),
            is_default: code.is_default(),
        })
        .collect();

    Json(DataResponse { data })
}

// ---------------------------------------------------------------------------
// GET /locations
// ---------------------------------------------------------------------------

/// All town locations with their resident character and per-tier settings.
pub async fn list_locations() -> Json<DataResponse<Vec<LocationInfo>>> {
    let data = ALL_LOCATIONS
        .into_iter()
        .map(|location| LocationInfo {
            id: location,
            name: location.display_name(),
            character: character_for(location),
            tiers: DifficultyTier::ALL
                .into_iter()
                .map(|tier| TierInfo {
                    tier,
                    name: tier.display_name(),
                    turn_limits: tier.turn_limits(),
                    scenario: catalog::scenario(location, tier),
                })
                .collect(),
        })
        .collect();

    Json(DataResponse { data })
}

// ---------------------------------------------------------------------------
// GET /locations/{location}/tiers/{tier}/topics
// ---------------------------------------------------------------------------

pub async fn list_topics(
    Path((location, tier)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<&'static [Topic]>>> {
    let location: Location = location.parse()?;
    let tier: DifficultyTier = tier.parse()?;

    Ok(Json(DataResponse {
        data: catalog::topics(location, tier),
    }))
}
