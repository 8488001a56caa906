//! Integration tests for the lead API

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use leadline_llm::{LlmBackend, MockProvider};
use leadline_pii::PatternDetector;
use leadline_pipeline::{Pipeline, PipelineConfig};
use leadline_server::handlers::{
    create_router, AppState, ErrorResponse, HealthResponse, LeadListResponse, MessageResponse,
};
use leadline_store::SqliteStore;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

const FULL_RESPONSE: &str = r#"{
  "contact": {"name": "Jane Doe", "title": "VP Sales", "email": "jane@x.com", "phone": "415-555-0132"},
  "company": {"name": "Acme Corp", "industry": "Manufacturing", "size": "500", "budget": "$60,000"},
  "deal": {"value": "$50,000", "stage": "Evaluation", "timeline": "Q3", "competitor": "Rivalco", "next_action": "send proposal"}
}"#;

const SUMMARY: &str = "Met with Jane Doe (jane@x.com), VP Sales at Acme Corp. \
    Budget $50,000, deciding by Q3, competing with Rivalco. Next step: send proposal.";

/// Helper to create a router over an in-memory store
fn create_test_app(response: &str) -> Router {
    let pipeline = Pipeline::new(
        PatternDetector::default_config(),
        LlmBackend::Mock(MockProvider::new(response)),
        SqliteStore::in_memory().unwrap(),
        PipelineConfig::default(),
    );
    create_router(AppState {
        pipeline: Arc::new(pipeline),
    })
}

fn process_request(summary: &str) -> Request<Body> {
    let body = serde_json::json!({ "summary": summary }).to_string();
    Request::builder()
        .method("POST")
        .uri("/api/process")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = create_test_app("{}");

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health: HealthResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(health.status, "healthy");
}

#[tokio::test]
async fn test_process_returns_full_lead() {
    let app = create_test_app(FULL_RESPONSE);

    let response = app.oneshot(process_request(SUMMARY)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let result: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(result["success"], true);
    assert_eq!(result["confidence"], 1.0);
    assert_eq!(result["contact"]["name"], "Jane Doe");
    assert_eq!(result["deal"]["competitor"], "Rivalco");
    assert!(result.get("error").is_none());
    assert!(result["processed_at"].is_string());

    let pii = result["pii"].as_array().unwrap();
    assert!(pii.iter().any(|s| s["entity_type"] == "EMAIL_ADDRESS"));
}

#[tokio::test]
async fn test_process_empty_summary_is_bad_request() {
    let app = create_test_app(FULL_RESPONSE);

    let response = app.oneshot(process_request("")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(error.detail.contains("empty"));
}

#[tokio::test]
async fn test_process_invalid_model_output() {
    let app = create_test_app("not json");

    let response = app.oneshot(process_request(SUMMARY)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let error: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(error.detail.starts_with("Invalid JSON response"));
}

#[tokio::test]
async fn test_list_stats_and_clear() {
    let app = create_test_app(FULL_RESPONSE);

    for _ in 0..3 {
        let response = app.clone().oneshot(process_request(SUMMARY)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Listing
    let response = app.clone().oneshot(get("/api/leads")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let list: LeadListResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(list.total, 3);
    assert!(list
        .leads
        .windows(2)
        .all(|w| w[0].created_at >= w[1].created_at));

    // Limit
    let response = app.clone().oneshot(get("/api/leads?limit=2")).await.unwrap();
    let list: LeadListResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(list.total, 2);

    // Stats
    let response = app.clone().oneshot(get("/api/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stats: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(stats["total_leads"], 3);
    assert_eq!(stats["total_deals"], 3);
    assert_eq!(stats["total_value"], 150_000.0);

    // Clear
    let request = Request::builder()
        .method("DELETE")
        .uri("/api/leads")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let message: MessageResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(message.message, "Deleted 3 leads");

    let response = app.oneshot(get("/api/leads")).await.unwrap();
    let list: LeadListResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(list.total, 0);
}

#[tokio::test]
async fn test_listed_lead_has_canonical_shape() {
    let app = create_test_app(r#"{"contact": {"name": "Jane"}}"#);

    app.clone().oneshot(process_request("Met Jane.")).await.unwrap();

    let response = app.oneshot(get("/api/leads")).await.unwrap();
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    let lead = &body["leads"][0];

    for key in ["pii", "contact", "company", "deal", "confidence", "processed_at", "created_at"] {
        assert!(lead.get(key).is_some(), "missing {}", key);
    }
    assert!(lead.get("id").is_none());
    assert_eq!(lead["company"]["name"], Value::Null);
    assert_eq!(lead["confidence"], 0.1);
}

#[tokio::test]
async fn test_failed_extraction_not_listed() {
    let app = create_test_app("not json");

    app.clone().oneshot(process_request(SUMMARY)).await.unwrap();

    let response = app.oneshot(get("/api/stats")).await.unwrap();
    let stats: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(stats["total_leads"], 0);
}
