//! Per-request choice of LLM configuration
//!
//! Server-side environment configuration always wins. A client-supplied
//! configuration is only used when the environment does not provide all
//! four values.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use super::config::{redact_url, ClientLlmConfig, LlmConfig, ProviderKind};
use crate::config::LlmEnvironment;

/// Characters of the base URL kept in log lines
const LOG_URL_CHARS: usize = 20;
/// Characters of the base URL kept in the config check response
const SUMMARY_URL_CHARS: usize = 30;

/// Secret-free view of the environment configuration
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub provider_type: ProviderKind,
    /// Truncated base URL
    pub base_url: String,
    pub model: String,
}

/// Resolves the configuration a generation request runs with
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    env_config: Option<LlmConfig>,
}

impl ConfigResolver {
    /// Create a resolver around an already-built environment config
    pub fn new(env_config: Option<LlmConfig>) -> Self {
        Self { env_config }
    }

    /// Create a resolver from the values read at start-up
    pub fn from_environment(env: &LlmEnvironment) -> Result<Self> {
        let env_config = env.to_config()?;
        match &env_config {
            Some(config) => info!(
                provider = %config.provider_type,
                base_url = %redact_url(&config.base_url, LOG_URL_CHARS),
                model = %config.model,
                "Environment LLM configuration present"
            ),
            None => info!("No environment LLM configuration, clients must supply one"),
        }
        Ok(Self::new(env_config))
    }

    pub fn has_env_config(&self) -> bool {
        self.env_config.is_some()
    }

    /// Pick the configuration for one request.
    ///
    /// The client config is expected to be revealed already. Returns `None`
    /// when neither source yields a complete configuration.
    pub fn resolve(&self, client: Option<ClientLlmConfig>) -> Option<LlmConfig> {
        if let Some(config) = &self.env_config {
            info!(
                name = %config.name,
                provider = %config.provider_type,
                base_url = %redact_url(&config.base_url, LOG_URL_CHARS),
                model = %config.model,
                "Using environment variable configuration"
            );
            return Some(config.clone());
        }

        debug!("No environment variable configuration");

        let client = client?;
        match LlmConfig::try_from(client) {
            Ok(config) => {
                let label = if config.name.is_empty() {
                    "client config"
                } else {
                    config.name.as_str()
                };
                info!(
                    name = %label,
                    provider = %config.provider_type,
                    base_url = %redact_url(&config.base_url, LOG_URL_CHARS),
                    model = %config.model,
                    "Using client configuration"
                );
                Some(config)
            }
            Err(e) => {
                warn!(error = %e, "Rejecting client configuration");
                None
            }
        }
    }

    /// Summary of the environment configuration, if there is one
    pub fn summary(&self) -> Option<ConfigSummary> {
        self.env_config.as_ref().map(|config| ConfigSummary {
            name: config.name.clone(),
            provider_type: config.provider_type,
            base_url: redact_url(&config.base_url, SUMMARY_URL_CHARS),
            model: config.model.clone(),
        })
    }
}
