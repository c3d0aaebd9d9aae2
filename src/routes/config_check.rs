//! Reports whether the server carries its own LLM configuration

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{llm::ConfigSummary, AppState};

/// Response of `GET /api/config/check`
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigCheckResponse {
    pub has_env_config: bool,
    /// Secret-free summary; `null` when the environment is incomplete
    pub config: Option<ConfigSummary>,
}

/// Check for a server-side LLM configuration
///
/// Clients use this to decide whether to ask the user for their own
/// endpoint and key. The API key is never included.
#[utoipa::path(
    get,
    path = "/api/config/check",
    tag = "Configuration",
    responses(
        (status = 200, description = "Environment configuration status", body = ConfigCheckResponse)
    )
)]
pub async fn config_check(State(state): State<Arc<AppState>>) -> Json<ConfigCheckResponse> {
    Json(ConfigCheckResponse {
        has_env_config: state.resolver.has_env_config(),
        config: state.resolver.summary(),
    })
}
