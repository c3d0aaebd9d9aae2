//! Config check endpoint integration tests
//!
//! Tests for GET /api/config/check:
//! - Summary present when the environment is complete
//! - `null` summary when any variable is missing
//! - The API key never appears in the response

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{config_from, constants, openai_env, server_with};

#[tokio::test]
async fn test_complete_environment_reports_summary() {
    let server = server_with(config_from(&openai_env(
        "https://llm-gateway.internal.example.com/v1",
    )));

    let response = server.get("/api/config/check").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({
            "hasEnvConfig": true,
            "config": {
                "name": "Environment configuration",
                "type": "openai",
                "baseUrl": "https://llm-gateway.internal.e...",
                "model": constants::OPENAI_MODEL
            }
        })
    );
    assert!(!response.text().contains(constants::ENV_API_KEY));
}

#[tokio::test]
async fn test_public_variable_names_are_honoured() {
    let server = server_with(config_from(&[
        ("NEXT_PUBLIC_LLM_TYPE", "anthropic".to_string()),
        ("NEXT_PUBLIC_LLM_BASE_URL", "https://api.anthropic.com/v1".to_string()),
        ("LLM_API_KEY", "sk-ant".to_string()),
        ("NEXT_PUBLIC_LLM_MODEL", constants::ANTHROPIC_MODEL.to_string()),
    ]));

    let body: Value = server.get("/api/config/check").await.json();

    assert_eq!(body["hasEnvConfig"], true);
    assert_eq!(body["config"]["type"], "anthropic");
    assert_eq!(body["config"]["model"], constants::ANTHROPIC_MODEL);
}

#[tokio::test]
async fn test_incomplete_environment_reports_nothing() {
    let mut vars = openai_env("https://api.openai.com/v1");
    vars.retain(|(name, _)| *name != "LLM_MODEL");
    let server = server_with(config_from(&vars));

    let response = server.get("/api/config/check").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body, json!({"hasEnvConfig": false, "config": null}));
}
