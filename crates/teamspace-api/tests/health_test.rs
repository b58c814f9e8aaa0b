//! Health and OpenAPI endpoints.
//!
//! Run with: `cargo test -p teamspace-api --test health_test`

mod helpers;

use helpers::setup_test_app;
use serde_json::Value;

#[tokio::test]
async fn test_health_reports_each_dependency() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "healthy");
    assert_eq!(body["storage"], "healthy");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert!(body["paths"]["/api/workspaces/{workspace_id}/join"].is_object());
    assert!(body["paths"]["/api/tasks"]["get"].is_object());
}

#[tokio::test]
async fn test_responses_carry_request_id_and_security_headers() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    assert!(response.maybe_header("x-request-id").is_some());
    assert_eq!(response.header("x-content-type-options"), "nosniff");
}
