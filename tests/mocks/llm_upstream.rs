//! Mock LLM upstream for testing
//!
//! Provides wiremock-based mocks for the two wire protocols:
//! - POST /chat/completions - OpenAI-compatible streaming chat
//! - POST /messages - Anthropic messages streaming
//!
//! # Example
//!
//! ```rust,ignore
//! let upstream = MockLlmUpstream::start().await;
//! upstream.mock_openai_stream(&["Hello", " world"]).await;
//!
//! // Point LLM_BASE_URL at upstream.uri()
//! ```

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

/// Encode fragments as an OpenAI chat completions SSE body
pub fn openai_sse(fragments: &[&str]) -> String {
    let mut body = String::new();
    body.push_str(&openai_chunk(json!({"role": "assistant"})));
    for fragment in fragments {
        body.push_str(&openai_chunk(json!({ "content": fragment })));
    }
    body.push_str(&format!(
        "data: {}\n\n",
        json!({"id": "chatcmpl-test", "choices": [{"index": 0, "delta": {}, "finish_reason": "stop"}]})
    ));
    body.push_str("data: [DONE]\n\n");
    body
}

fn openai_chunk(delta: Value) -> String {
    format!(
        "data: {}\n\n",
        json!({
            "id": "chatcmpl-test",
            "object": "chat.completion.chunk",
            "model": "gpt-4o",
            "choices": [{"index": 0, "delta": delta, "finish_reason": null}]
        })
    )
}

/// Encode fragments as an Anthropic messages SSE body
pub fn anthropic_sse(fragments: &[&str]) -> String {
    let mut body = String::new();
    let mut event = |name: &str, data: Value| {
        body.push_str(&format!("event: {}\ndata: {}\n\n", name, data));
    };

    event(
        "message_start",
        json!({"type": "message_start", "message": {"id": "msg_test", "role": "assistant", "content": []}}),
    );
    event(
        "content_block_start",
        json!({"type": "content_block_start", "index": 0, "content_block": {"type": "text", "text": ""}}),
    );
    event("ping", json!({"type": "ping"}));
    for fragment in fragments {
        event(
            "content_block_delta",
            json!({"type": "content_block_delta", "index": 0, "delta": {"type": "text_delta", "text": fragment}}),
        );
    }
    event(
        "content_block_stop",
        json!({"type": "content_block_stop", "index": 0}),
    );
    event(
        "message_delta",
        json!({"type": "message_delta", "delta": {"stop_reason": "end_turn"}}),
    );
    event("message_stop", json!({"type": "message_stop"}));
    body
}

fn sse_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("cache-control", "no-cache")
        .set_body_raw(body, "text/event-stream")
}

/// Mock LLM server wrapper
pub struct MockLlmUpstream {
    server: MockServer,
}

impl MockLlmUpstream {
    /// Start a new mock upstream
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL to configure as `baseUrl`
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// All requests received so far
    pub async fn requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    // =========================================================================
    // POST /chat/completions
    // =========================================================================

    /// Stream the given fragments, then finish normally
    pub async fn mock_openai_stream(&self, fragments: &[&str]) {
        self.mock_openai_raw(openai_sse(fragments)).await;
    }

    /// Serve an arbitrary SSE body
    pub async fn mock_openai_raw(&self, body: String) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(sse_response(body))
            .mount(&self.server)
            .await;
    }

    /// Reject the request with an OpenAI-style error body
    pub async fn mock_openai_error(&self, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {
                    "message": message,
                    "type": "invalid_request_error",
                    "code": null
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Answer only after `delay`
    pub async fn mock_openai_slow(&self, fragments: &[&str], delay: Duration) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(sse_response(openai_sse(fragments)).set_delay(delay))
            .mount(&self.server)
            .await;
    }

    // =========================================================================
    // POST /messages
    // =========================================================================

    /// Stream the given fragments as Anthropic events
    pub async fn mock_anthropic_stream(&self, fragments: &[&str]) {
        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(sse_response(anthropic_sse(fragments)))
            .mount(&self.server)
            .await;
    }

    /// Emit one fragment and then an in-stream error event
    pub async fn mock_anthropic_stream_error(&self, fragment: &str, message: &str) {
        let mut body = anthropic_sse(&[fragment]);
        // Drop the trailing stop events and fail instead
        if let Some(pos) = body.find("event: content_block_stop") {
            body.truncate(pos);
        }
        body.push_str(&format!(
            "event: error\ndata: {}\n\n",
            json!({"type": "error", "error": {"type": "overloaded_error", "message": message}})
        ));

        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(sse_response(body))
            .mount(&self.server)
            .await;
    }
}
