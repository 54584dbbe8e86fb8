//! HTTP-level tests for the language, location and topic catalog.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get};

// ---------------------------------------------------------------------------
// Test: languages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_list_languages_marks_english_default() {
    let app = build_test_app();

    let response = get(app.router, "/api/v1/languages").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let languages = json["data"].as_array().unwrap();
    assert_eq!(languages.len(), 7);

    let defaults: Vec<_> = languages
        .iter()
        .filter(|l| l["is_default"] == true)
        .collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0]["code"], "en");

    let spanish = languages.iter().find(|l| l["code"] == "es").unwrap();
    assert_eq!(spanish["name"], "Spanish");
    assert_eq!(spanish["speech_locale"], "es-ES");
}

// ---------------------------------------------------------------------------
// Test: locations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_list_locations_includes_characters_and_tiers() {
    let app = build_test_app();

    let response = get(app.router, "/api/v1/locations").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let locations = json["data"].as_array().unwrap();
    assert_eq!(locations.len(), 5);

    let cafe = locations.iter().find(|l| l["id"] == "cafe").unwrap();
    assert_eq!(cafe["character"]["name"], "Marco");

    let tiers = cafe["tiers"].as_array().unwrap();
    assert_eq!(tiers.len(), 3);
    assert_eq!(tiers[0]["tier"], "beginner");
    assert_eq!(tiers[0]["turn_limits"]["min"], 3);
    assert_eq!(tiers[0]["turn_limits"]["max"], 5);
    assert_eq!(tiers[2]["turn_limits"]["max"], 12);
    assert!(tiers[1]["scenario"].as_str().is_some_and(|s| !s.is_empty()));
}

// ---------------------------------------------------------------------------
// Test: topics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_list_topics_for_bucket() {
    let app = build_test_app();

    let response = get(app.router, "/api/v1/locations/cafe/tiers/beginner/topics").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let ids: Vec<_> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["order_coffee", "pastry_choice", "paying_bill"]);
}

#[tokio::test]
async fn test_list_topics_unknown_location_is_404() {
    let app = build_test_app();

    let response = get(app.router, "/api/v1/locations/moon/tiers/beginner/topics").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_list_topics_invalid_tier_is_400() {
    let app = build_test_app();

    let response = get(app.router, "/api/v1/locations/cafe/tiers/expert/topics").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}
