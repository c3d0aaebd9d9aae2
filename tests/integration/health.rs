//! Operational endpoint integration tests
//!
//! Tests for:
//! - GET /health - Full health check
//! - GET /health/live - Liveness probe
//! - GET /metrics - Prometheus scrape endpoint
//! - GET /api/openapi.json - API description

use serde_json::Value;

use crate::common::{config_from, openai_env, server_with};

#[tokio::test]
async fn test_health_endpoint_returns_proper_structure() {
    let server = server_with(config_from(&[]));

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime_seconds"].is_u64());
    assert!(body["timestamp"].is_string());
    assert_eq!(body["env_config_present"], false);
}

#[tokio::test]
async fn test_health_reports_environment_config() {
    let server = server_with(config_from(&openai_env("https://api.openai.com/v1")));

    let body: Value = server.get("/health").await.json();

    assert_eq!(body["env_config_present"], true);
}

#[tokio::test]
async fn test_liveness_endpoint() {
    let server = server_with(config_from(&[]));

    let response = server.get("/health/live").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_endpoint_responds() {
    let server = server_with(config_from(&[]));

    server.get("/metrics").await.assert_status_ok();
}

#[tokio::test]
async fn test_openapi_document_served() {
    let server = server_with(config_from(&[]));

    let response = server.get("/api/openapi.json").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["info"]["title"], "Sketchgen API");
    assert!(body["paths"]["/api/generate"]["post"].is_object());
    assert!(body["paths"]["/api/config/check"]["get"].is_object());
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let server = server_with(config_from(&[]));

    server
        .get("/v1/chat/completions")
        .expect_failure()
        .await
        .assert_status_not_found();
}
