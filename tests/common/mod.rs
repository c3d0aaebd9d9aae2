//! Common test utilities for Sketchgen
//!
//! Builds the real router around a configuration assembled from explicit
//! variables, and decodes the SSE bodies it produces.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum_test::TestServer;
use serde_json::Value;

use sketchgen::{routes, AppState, Config};

/// Test configuration constants
pub mod constants {
    /// API key served by the environment configuration
    pub const ENV_API_KEY: &str = "sk-env-test-key";
    /// API key sent by clients
    pub const CLIENT_API_KEY: &str = "sk-client-test-key";
    pub const OPENAI_MODEL: &str = "gpt-4o";
    pub const ANTHROPIC_MODEL: &str = "claude-sonnet-4";
}

/// Build a `Config` from explicit variables, ignoring the process environment
pub fn config_from(vars: &[(&str, String)]) -> Config {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    Config::from_lookup(|name| vars.get(name).cloned()).expect("Failed to build test config")
}

/// Variables for a complete OpenAI environment configuration
pub fn openai_env(base_url: &str) -> Vec<(&'static str, String)> {
    vec![
        ("LLM_TYPE", "openai".to_string()),
        ("LLM_BASE_URL", base_url.to_string()),
        ("LLM_API_KEY", constants::ENV_API_KEY.to_string()),
        ("LLM_MODEL", constants::OPENAI_MODEL.to_string()),
    ]
}

/// Start the real router around `config`
pub fn server_with(config: Config) -> TestServer {
    let state = Arc::new(AppState::new(config).expect("Failed to build app state"));
    let app = routes::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// One decoded event of a generate response
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Content(String),
    Error(String),
    Done,
}

/// Decode an SSE body into frames, asserting every line is well formed
pub fn parse_frames(body: &str) -> Vec<Frame> {
    body.split("\n\n")
        .filter(|event| !event.is_empty())
        .map(|event| {
            let payload = event
                .strip_prefix("data: ")
                .unwrap_or_else(|| panic!("Event without data prefix: {:?}", event));
            if payload == "[DONE]" {
                return Frame::Done;
            }
            let value: Value = serde_json::from_str(payload).expect("Event payload should be JSON");
            if let Some(content) = value.get("content").and_then(Value::as_str) {
                Frame::Content(content.to_string())
            } else if let Some(error) = value.get("error").and_then(Value::as_str) {
                Frame::Error(error.to_string())
            } else {
                panic!("Unexpected event payload: {}", payload)
            }
        })
        .collect()
}

/// Concatenated content of all frames
pub fn joined_content(frames: &[Frame]) -> String {
    frames
        .iter()
        .filter_map(|frame| match frame {
            Frame::Content(text) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}
