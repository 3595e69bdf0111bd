use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, Set};
use std::sync::Arc;
use tower::ServiceExt;
use vulnquest::api::AppState;
use vulnquest::config::Config;
use vulnquest::entities::quests;

/// Default API key seeded by migration (must match m20250601_initial.rs)
const DEFAULT_API_KEY: &str = "vulnquest_default_api_key_please_regenerate";

async fn spawn_app() -> (Router, Arc<AppState>) {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();

    let state = vulnquest::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    let app = vulnquest::api::router(state.clone()).await;

    (app, state)
}

async fn get_json(
    app: &Router,
    method: &str,
    uri: &str,
    api_key: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Api-Key", api_key);

    let request = if let Some(json) = body {
        builder = builder.header("Content-Type", "application/json");
        builder
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

#[tokio::test]
async fn test_auth_endpoints() {
    let (app, _state) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .header("X-Api-Key", "wrong-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .header("X-Api-Key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_and_login() {
    let (app, _state) = spawn_app().await;

    let (status, body) = get_json(
        &app,
        "POST",
        "/api/auth/register",
        "",
        Some(serde_json::json!({
            "username": "hunter_one",
            "email": "hunter@example.com",
            "password": "hunter2hunter2",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "hunter_one");
    assert_eq!(body["data"]["level"], 1);
    assert_eq!(body["data"]["exp"], 0);

    // Duplicate username conflicts
    let (status, _) = get_json(
        &app,
        "POST",
        "/api/auth/register",
        "",
        Some(serde_json::json!({
            "username": "hunter_one",
            "email": "other@example.com",
            "password": "hunter2hunter2",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = get_json(
        &app,
        "POST",
        "/api/auth/login",
        "",
        Some(serde_json::json!({
            "username": "hunter_one",
            "password": "hunter2hunter2",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let api_key = body["data"]["api_key"].as_str().unwrap().to_string();

    let (status, body) = get_json(&app, "GET", "/api/auth/me", &api_key, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "hunter_one");

    // Bad password rejected
    let (status, _) = get_json(
        &app,
        "POST",
        "/api/auth/login",
        "",
        Some(serde_json::json!({
            "username": "hunter_one",
            "password": "wrong-password",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_report_vulnerability_grants_rewards() {
    let (app, _state) = spawn_app().await;

    let (status, body) = get_json(
        &app,
        "POST",
        "/api/vulnerabilities",
        DEFAULT_API_KEY,
        Some(serde_json::json!({
            "title": "Stored XSS in profile page",
            "description": "Script tags in the bio field are rendered verbatim.",
            "severity": "high",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["vulnerability"]["severity"], "high");
    assert_eq!(body["data"]["vulnerability"]["status"], "open");
    assert_eq!(body["data"]["vulnerability"]["exp_reward"], 200);
    assert_eq!(body["data"]["reward"]["exp_granted"], 100);

    // Report reward (100) plus the "First Blood" unlock (50)
    let (status, body) = get_json(&app, "GET", "/api/auth/me", DEFAULT_API_KEY, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["exp"], 150);
    assert_eq!(body["data"]["level"], 1);

    // Progress endpoint reflects the unlock
    let (status, body) = get_json(
        &app,
        "GET",
        "/api/achievements/progress",
        DEFAULT_API_KEY,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let first_blood = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["name"] == "First Blood")
        .expect("First Blood in progress list");
    assert_eq!(first_blood["unlocked"], true);
    assert_eq!(first_blood["progress"], 100);
}

#[tokio::test]
async fn test_resolve_vulnerability_flow() {
    let (app, _state) = spawn_app().await;

    let (_, body) = get_json(
        &app,
        "POST",
        "/api/vulnerabilities",
        DEFAULT_API_KEY,
        Some(serde_json::json!({
            "title": "SQL injection in search",
            "description": "Raw string interpolation into the query.",
            "severity": "critical",
        })),
    )
    .await;
    let vuln_id = body["data"]["vulnerability"]["id"].as_i64().unwrap();

    let (status, body) = get_json(
        &app,
        "POST",
        &format!("/api/vulnerabilities/{vuln_id}/resolve"),
        DEFAULT_API_KEY,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["vulnerability"]["status"], "resolved");
    assert_eq!(body["data"]["reputation_gained"], 50);
    // Critical default reward
    assert_eq!(body["data"]["reward"]["exp_granted"], 400);

    // Resolving again conflicts
    let (status, _) = get_json(
        &app,
        "POST",
        &format!("/api/vulnerabilities/{vuln_id}/resolve"),
        DEFAULT_API_KEY,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_review_uniqueness_conflict() {
    let (app, _state) = spawn_app().await;

    let (_, body) = get_json(
        &app,
        "POST",
        "/api/vulnerabilities",
        DEFAULT_API_KEY,
        Some(serde_json::json!({
            "title": "Open redirect",
            "description": "Unvalidated next= parameter.",
            "severity": "low",
        })),
    )
    .await;
    let vuln_id = body["data"]["vulnerability"]["id"].as_i64().unwrap();

    let (status, _) = get_json(
        &app,
        "POST",
        "/api/reviews",
        DEFAULT_API_KEY,
        Some(serde_json::json!({
            "vulnerability_id": vuln_id,
            "rating": 4,
            "comment": "Nice find, clean repro.",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);

    let (status, _) = get_json(
        &app,
        "POST",
        "/api/reviews",
        DEFAULT_API_KEY,
        Some(serde_json::json!({
            "vulnerability_id": vuln_id,
            "rating": 5,
            "comment": "Trying to review twice.",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);

    // Out-of-range rating rejected
    let (status, _) = get_json(
        &app,
        "POST",
        "/api/reviews",
        DEFAULT_API_KEY,
        Some(serde_json::json!({
            "rating": 6,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quest_attempt_is_single_use() {
    let (app, state) = spawn_app().await;

    // A one-hit boss makes the attempt outcome deterministic.
    let quest = quests::ActiveModel {
        boss_name: Set("Tutorial Dummy".to_string()),
        floor_number: Set(0),
        difficulty: Set("easy".to_string()),
        exp_reward: Set(10),
        health_points: Set(1),
        active: Set(true),
        ..Default::default()
    }
    .insert(&state.store().conn)
    .await
    .expect("Failed to seed test quest");

    let uri = format!("/api/quests/{}/attempt", quest.id);

    let (status, body) = get_json(
        &app,
        "POST",
        &uri,
        DEFAULT_API_KEY,
        Some(serde_json::json!({ "action": "attack" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["success"], true);
    assert_eq!(body["data"]["exp_gained"], 10);
    assert!(body["data"]["log"].as_array().unwrap().len() >= 2);

    // Cleared quests are rejected before the simulator runs
    let (status, _) = get_json(
        &app,
        "POST",
        &uri,
        DEFAULT_API_KEY,
        Some(serde_json::json!({ "action": "attack" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);

    // Invalid action is a validation error
    let (status, _) = get_json(
        &app,
        "POST",
        "/api/quests/1/attempt",
        DEFAULT_API_KEY,
        Some(serde_json::json!({ "action": "flee" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_leaderboard_and_quests_listing() {
    let (app, _state) = spawn_app().await;

    let (status, body) = get_json(&app, "GET", "/api/users/leaderboard", DEFAULT_API_KEY, None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"]["items"].as_array().unwrap();
    assert!(!items.is_empty());
    assert_eq!(items[0]["rank"], 1);

    let (status, body) = get_json(&app, "GET", "/api/quests", DEFAULT_API_KEY, None).await;
    assert_eq!(status, StatusCode::OK);
    let quests = body["data"].as_array().unwrap();
    assert!(quests.len() >= 7);
    assert_eq!(quests[0]["completed"], false);

    let (status, body) = get_json(&app, "GET", "/api/achievements", DEFAULT_API_KEY, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().len() >= 10);
}
