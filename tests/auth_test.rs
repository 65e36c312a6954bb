use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use fra_portal_backend::config::PortalConfig;
use fra_portal_backend::infrastructure::{database, seed};
use fra_portal_backend::services::analyzer::{DocumentAnalyzer, SimulatedAnalyzer};
use fra_portal_backend::services::processing::ProcessingService;
use fra_portal_backend::services::storage::LocalStorageService;
use fra_portal_backend::{AppState, create_app};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

async fn setup_app() -> (Router, tempfile::TempDir) {
    let db = database::connect("sqlite::memory:").await.unwrap();
    database::run_migrations(&db).await.unwrap();
    seed::seed_demo_data(&db).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let config = PortalConfig::for_tests(dir.path().to_str().unwrap());

    let analyzer: Arc<dyn DocumentAnalyzer> = Arc::new(SimulatedAnalyzer::new(1, 10));
    let state = AppState {
        db: db.clone(),
        storage: Arc::new(LocalStorageService::new(dir.path())),
        processing: Arc::new(ProcessingService::new(db, analyzer)),
        config,
    };

    (create_app(state), dir)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_seeded_accounts_can_log_in() {
    let (app, _dir) = setup_app().await;

    let (status, body) = post_json(
        &app,
        "/login",
        json!({"email": "admin@fra.gov.in", "password": "admin123"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["role"], "admin");
    assert_eq!(body["user"]["name"], "Rajesh Kumar");

    let (status, body) = post_json(
        &app,
        "/login",
        json!({"email": "officer@fra.gov.in", "password": "officer123"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "officer");
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let (app, _dir) = setup_app().await;

    // Wrong password for a known account
    let (status, body) = post_json(
        &app,
        "/login",
        json!({"email": "admin@fra.gov.in", "password": "admin124"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    // Unknown account
    let (status, _) = post_json(
        &app,
        "/login",
        json!({"email": "nobody@fra.gov.in", "password": "whatever"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validation_rules() {
    let (app, _dir) = setup_app().await;

    // Password too short
    let (status, body) = post_json(
        &app,
        "/register",
        json!({
            "email": "new@fra.gov.in",
            "name": "New Officer",
            "password": "abc12",
            "confirm_password": "abc12"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("at least 6"));

    // Mismatched confirmation
    let (status, body) = post_json(
        &app,
        "/register",
        json!({
            "email": "new@fra.gov.in",
            "name": "New Officer",
            "password": "abc123",
            "confirm_password": "abc124"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Passwords do not match");

    // Duplicate of a seeded account
    let (status, body) = post_json(
        &app,
        "/register",
        json!({
            "email": "officer@fra.gov.in",
            "name": "Duplicate",
            "password": "abc123",
            "confirm_password": "abc123"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already registered");

    // Invalid email shape
    let (status, _) = post_json(
        &app,
        "/register",
        json!({
            "email": "not-an-email",
            "name": "New Officer",
            "password": "abc123",
            "confirm_password": "abc123"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_then_login() {
    let (app, _dir) = setup_app().await;

    let (status, _) = post_json(
        &app,
        "/register",
        json!({
            "email": "kamala@fra.gov.in",
            "name": "Kamala Majhi",
            "password": "secret7",
            "confirm_password": "secret7"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_json(
        &app,
        "/login",
        json!({"email": "kamala@fra.gov.in", "password": "secret7"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "claimant");
}

#[tokio::test]
async fn test_profile_requires_token() {
    let (app, _dir) = setup_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/users/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (_, login) = post_json(
        &app,
        "/login",
        json!({"email": "admin@fra.gov.in", "password": "admin123"}),
    )
    .await;
    let token = login["token"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/users/me")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let profile: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(profile["email"], "admin@fra.gov.in");
    assert_eq!(profile["department"], "Ministry of Tribal Affairs");
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let (app, _dir) = setup_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/documents")
                .header("Authorization", "Bearer not.a.jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
