//! OpenAPI specification for the Sketchgen HTTP API

use axum::Json;
use utoipa::OpenApi;

use crate::{
    error::ErrorResponse,
    llm::{ClientLlmConfig, ConfigSummary, ProviderKind},
    prompt::{ImageData, UserInput},
    routes::{
        config_check::ConfigCheckResponse,
        generate::GenerateRequest,
        health::{HealthResponse, HealthStatus, SimpleHealthResponse},
    },
};

/// OpenAPI specification for the Sketchgen API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sketchgen API",
        version = "1.0.0",
        description = "Streams AI-generated diagram code from a configurable LLM endpoint"
    ),
    paths(
        crate::routes::generate::generate,
        crate::routes::config_check::config_check,
        crate::routes::health::health_check,
        crate::routes::health::liveness_check,
    ),
    components(
        schemas(
            // Request
            GenerateRequest,
            UserInput,
            ImageData,
            ClientLlmConfig,
            ProviderKind,
            // Response
            ConfigCheckResponse,
            ConfigSummary,
            HealthResponse,
            HealthStatus,
            SimpleHealthResponse,
            // Error
            ErrorResponse,
        )
    ),
    tags(
        (name = "Generation", description = "Streaming diagram generation"),
        (name = "Configuration", description = "Server-side LLM configuration"),
        (name = "Health", description = "Liveness and health probes")
    )
)]
pub struct ApiDoc;

/// Handler for the raw OpenAPI JSON
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
