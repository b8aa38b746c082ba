//! API integration tests: router driven through `tower::ServiceExt::oneshot`

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use qbr_builder::api::handlers::UNRECOGNIZED_EMAIL;
use qbr_builder::api::{router, ApiConfig, AppState};
use qbr_builder::config::ReportConfig;
use qbr_builder::data::Roster;
use qbr_builder::types::{CellValue, RowDataset};
use serde_json::{json, Value};
use tower::ServiceExt;

const ALLOWED: &str = "user@example.com";

fn roster() -> Roster {
    let columns = [
        "Partner/Distributor Name",
        "Account ID",
        "GEO",
        "Assigned CRS",
        "Country",
        "Total ACV 2024",
        "Total TCV 2024",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect();
    let row = |cells: [&str; 7]| -> Vec<CellValue> {
        cells.iter().map(|c| CellValue::from_text(c)).collect()
    };
    let dataset = RowDataset::from_rows(
        columns,
        vec![
            row(["Acme", "A-1", "NA", "alice", "US", "100", "300"]),
            row(["Acme", "A-2", "NA", "alice", "US", "200", "600"]),
            row(["Globex", "G-1", "EMEA", "bob", "DE", "50", "90"]),
        ],
    )
    .unwrap();
    Roster::from_dataset(dataset).unwrap()
}

fn app() -> Router {
    let config = ReportConfig {
        allowed_emails: vec![ALLOWED.to_string()],
        ..Default::default()
    };
    router(Arc::new(AppState::new(config, roster())))
}

async fn get(uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(request).await
}

async fn post(uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(request).await
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ═══════════════════════════════════════════════════════════════════════════
// CONFIG TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_config_default() {
    let config = ApiConfig::default();
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 8080);
}

// ═══════════════════════════════════════════════════════════════════════════
// INFO ENDPOINTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_health() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "healthy");
}

#[tokio::test]
async fn test_version() {
    let (status, body) = get("/version").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_root_lists_endpoints() {
    let (_, body) = get("/").await;
    let paths: Vec<&str> = body["data"]["endpoints"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["path"].as_str())
        .collect();
    assert!(paths.contains(&"/api/v1/generate"));
}

// ═══════════════════════════════════════════════════════════════════════════
// LOGIN
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_login_allowed_email() {
    let (status, body) = post("/api/v1/login", json!({"email": "User@Example.com "})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["authorized"], true);
}

#[tokio::test]
async fn test_login_unknown_email() {
    let (status, body) = post("/api/v1/login", json!({"email": "stranger@example.com"})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], UNRECOGNIZED_EMAIL);
}

// ═══════════════════════════════════════════════════════════════════════════
// SELECTION FLOW
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_assignees() {
    let (status, body) = post("/api/v1/assignees", json!({"email": ALLOWED})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["assignees"], json!(["alice", "bob"]));
}

#[tokio::test]
async fn test_assignees_requires_allowed_email() {
    let (status, _) = post("/api/v1/assignees", json!({"email": "x@y.z"})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_partners_for_assignee() {
    let (status, body) = post(
        "/api/v1/partners",
        json!({"email": ALLOWED, "assigned_crs": "alice"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["partners"], json!(["Acme"]));
}

#[tokio::test]
async fn test_partners_empty_selection_is_bad_request() {
    let (status, body) = post("/api/v1/partners", json!({"email": ALLOWED})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_accounts_for_partner() {
    let (status, body) = post(
        "/api/v1/accounts",
        json!({"email": ALLOWED, "partner_name": "Acme"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["accounts"],
        json!([
            {"account_id": "A-1", "total_acv": "100", "total_tcv": "300"},
            {"account_id": "A-2", "total_acv": "200", "total_tcv": "600"},
        ])
    );
}

#[tokio::test]
async fn test_accounts_unknown_partner_is_empty() {
    let (status, body) = post(
        "/api/v1/accounts",
        json!({"email": ALLOWED, "partner_name": "Nobody"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["accounts"], json!([]));
}

// ═══════════════════════════════════════════════════════════════════════════
// GENERATE
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_generate_without_accounts_is_bad_request() {
    let (status, _) = post(
        "/api/v1/generate",
        json!({"email": ALLOWED, "account_ids": []}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_reports_pipeline_error_text() {
    // No template configured: the pipeline refuses before any remote call
    let (status, body) = post(
        "/api/v1/generate",
        json!({"email": ALLOWED, "account_ids": ["A-1"]}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("template_presentation_id"));
}

#[tokio::test]
async fn test_generate_requires_allowed_email() {
    let (status, _) = post(
        "/api/v1/generate",
        json!({"email": "x@y.z", "account_ids": ["A-1"]}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
