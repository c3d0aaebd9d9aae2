//! Diagram generation endpoint
//!
//! Resolves the LLM configuration, builds the prompt, and streams the
//! model's output back as Server-Sent Events.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, StatusCode},
    response::Response,
};
use futures::StreamExt;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, info_span};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    codec,
    error::{AppError, AppResult, ErrorResponse},
    llm::ClientLlmConfig,
    prompt::{self, UserInput},
    routes::metrics,
    streaming::relay,
    AppState,
};

/// Body of `POST /api/generate`
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Client-side LLM configuration, used only when the server has none.
    /// Left uninterpreted until then.
    #[serde(default)]
    #[schema(value_type = Option<ClientLlmConfig>)]
    pub config: Option<Value>,
    /// Text, or `{text, image: {data, mimeType}}`
    #[serde(default)]
    pub user_input: Option<UserInput>,
    /// Diagram type hint such as `flowchart`; `auto` lets the model choose
    #[serde(default)]
    pub chart_type: Option<String>,
}

/// Interpret the raw client configuration once the environment has none
fn client_config(value: Value) -> AppResult<ClientLlmConfig> {
    serde_json::from_value(value).map_err(|e| {
        metrics::record_rejection("bad_request");
        AppError::BadRequest(format!("Invalid client configuration: {}", e))
    })
}

/// Generate diagram code as a live event stream
///
/// Each event is `data: {"content": "..."}`; the stream ends with
/// `data: [DONE]`. A failure after the stream opened arrives as a single
/// `data: {"error": "..."}` event instead.
#[utoipa::path(
    post,
    path = "/api/generate",
    tag = "Generation",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Server-Sent Events stream of generated content", content_type = "text/event-stream", body = String),
        (status = 400, description = "Missing input, no usable configuration or malformed body", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub async fn generate(State(state): State<Arc<AppState>>, body: Bytes) -> AppResult<Response> {
    let request: GenerateRequest = serde_json::from_slice(&body).map_err(|e| {
        metrics::record_rejection("bad_request");
        AppError::BadRequest(format!("Invalid request body: {}", e))
    })?;

    let Some(user_input) = request.user_input.filter(|input| !input.is_empty()) else {
        metrics::record_rejection("input_missing");
        return Err(AppError::InputMissing);
    };

    let client = if state.resolver.has_env_config() {
        if request.config.is_some() {
            debug!("Ignoring client configuration, environment configuration is set");
        }
        None
    } else {
        request
            .config
            .map(client_config)
            .transpose()?
            .map(codec::reveal_obscured_fields)
    };
    let Some(config) = state.resolver.resolve(client) else {
        metrics::record_rejection("config_missing");
        return Err(AppError::ConfigMissing);
    };

    let messages = prompt::build(&user_input, request.chart_type.as_deref()).inspect_err(|_| {
        metrics::record_rejection("bad_request");
    })?;

    let request_id = Uuid::new_v4();
    let span = info_span!(
        "generate",
        request_id = %request_id,
        provider = %config.provider_type,
        model = %config.model,
    );

    let events = span.in_scope(|| {
        info!(
            chart_type = ?request.chart_type,
            has_image = user_input.image().is_some(),
            "Generation stream started"
        );
        relay(state.invoker.clone(), config, messages)
    });

    let body = Body::from_stream(events.map(|event| Ok::<_, Infallible>(event.to_sse())));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .header("X-Accel-Buffering", "no")
        .header("X-Request-Id", request_id.to_string())
        .body(body)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build response: {}", e)))
}
