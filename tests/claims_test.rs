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

async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"email": "admin@fra.gov.in", "password": "admin123"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    json["token"].as_str().unwrap().to_string()
}

async fn request_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_claims_require_auth() {
    let (app, _dir) = setup_app().await;
    let (status, _) = request_json(&app, "GET", "/claims", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_seeded_claims_list_and_filters() {
    let (app, _dir) = setup_app().await;
    let token = login(&app).await;

    let (status, all) = request_json(&app, "GET", "/claims", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 6);

    // Substring search over claimant name
    let (_, found) = request_json(&app, "GET", "/claims?search=meena", Some(&token), None).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["claimant_name"], "Ram Prasad Meena");
    assert_eq!(found[0]["claim_number"], "FRA/2023/MP/004521");

    // Substring search over village
    let (_, found) = request_json(&app, "GET", "/claims?search=pachgaon", Some(&token), None).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["claim_type"], "community");

    // Status filter
    let (_, approved) =
        request_json(&app, "GET", "/claims?status=approved", Some(&token), None).await;
    assert_eq!(approved.as_array().unwrap().len(), 2);

    // District filter combines with status
    let (_, sheopur) = request_json(
        &app,
        "GET",
        "/claims?district=Sheopur&status=approved",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(sheopur.as_array().unwrap().len(), 1);
    assert_eq!(sheopur[0]["claimant_name"], "Sunita Bai Adivasi");
}

#[tokio::test]
async fn test_claim_crud_flow() {
    let (app, _dir) = setup_app().await;
    let token = login(&app).await;

    // Create
    let (status, claim) = request_json(
        &app,
        "POST",
        "/claims",
        Some(&token),
        Some(json!({
            "claimant_name": "Jhitru Baiga",
            "father_name": "Sukhram Baiga",
            "village": "Manikpur",
            "district": "Dindori",
            "state": "Madhya Pradesh",
            "area_hectares": 1.4,
            "claim_type": "individual"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(claim["status"], "pending");
    assert!(claim["claim_number"].as_str().unwrap().starts_with("FRA/"));
    let id = claim["id"].as_str().unwrap().to_string();

    // Detail
    let (status, detail) =
        request_json(&app, "GET", &format!("/claims/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["village"], "Manikpur");

    // Status update
    let (status, updated) = request_json(
        &app,
        "PUT",
        &format!("/claims/{}/status", id),
        Some(&token),
        Some(json!({"status": "approved"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "approved");

    // Unknown status rejected
    let (status, _) = request_json(
        &app,
        "PUT",
        &format!("/claims/{}/status", id),
        Some(&token),
        Some(json!({"status": "granted"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Delete
    let (status, _) =
        request_json(&app, "DELETE", &format!("/claims/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) =
        request_json(&app, "GET", &format!("/claims/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_claim_validation() {
    let (app, _dir) = setup_app().await;
    let token = login(&app).await;

    // Unknown claim type
    let (status, _) = request_json(
        &app,
        "POST",
        "/claims",
        Some(&token),
        Some(json!({
            "claimant_name": "X",
            "village": "Y",
            "district": "Z",
            "state": "MP",
            "area_hectares": 1.0,
            "claim_type": "corporate"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Non-positive area
    let (status, _) = request_json(
        &app,
        "POST",
        "/claims",
        Some(&token),
        Some(json!({
            "claimant_name": "X",
            "village": "Y",
            "district": "Z",
            "state": "MP",
            "area_hectares": 0.0,
            "claim_type": "individual"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_allotments_list_search_and_create() {
    let (app, _dir) = setup_app().await;
    let token = login(&app).await;

    let (status, all) = request_json(&app, "GET", "/allotments", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 4);

    // Search by survey number
    let (_, found) = request_json(&app, "GET", "/allotments?search=245", Some(&token), None).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["holder_name"], "Ram Prasad Meena");

    // Status filter
    let (_, disputed) = request_json(
        &app,
        "GET",
        "/allotments?status=disputed",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(disputed.as_array().unwrap().len(), 1);
    assert_eq!(disputed[0]["village"], "Bagicha");

    // Create and fetch back
    let (status, created) = request_json(
        &app,
        "POST",
        "/allotments",
        Some(&token),
        Some(json!({
            "holder_name": "Somari Bai",
            "village": "Manikpur",
            "district": "Dindori",
            "state": "Madhya Pradesh",
            "survey_number": "88/1",
            "area_hectares": 0.6
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "active");
    let id = created["id"].as_str().unwrap();

    let (status, detail) = request_json(
        &app,
        "GET",
        &format!("/allotments/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["allotment_number"], created["allotment_number"]);
}

#[tokio::test]
async fn test_dashboard_stats_reflect_seed_data() {
    let (app, _dir) = setup_app().await;
    let token = login(&app).await;

    let (status, stats) = request_json(&app, "GET", "/dashboard/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(stats["total_claims"], 6);
    assert_eq!(stats["pending_claims"], 1);
    assert_eq!(stats["under_review_claims"], 2);
    assert_eq!(stats["approved_claims"], 2);
    assert_eq!(stats["rejected_claims"], 1);
    assert_eq!(stats["total_allotments"], 4);
    assert_eq!(stats["documents_total"], 0);

    // 1.8 (Sunita Bai Adivasi) + 14.2 (Gram Sabha Tiktoli)
    let area = stats["approved_area_hectares"].as_f64().unwrap();
    assert!((area - 16.0).abs() < 1e-9);
}
