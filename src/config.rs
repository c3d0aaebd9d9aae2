//! Configuration management for Sketchgen
//!
//! Configuration is loaded from environment variables once at start-up and
//! passed by value into the application state. Request handling never reads
//! the process environment.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::llm::{LlmConfig, ProviderKind};

/// Prefix of the publicly-exposed variant of each LLM variable
pub const PUBLIC_PREFIX: &str = "NEXT_PUBLIC_";

/// Display name given to the configuration built from the environment
pub const ENV_CONFIG_NAME: &str = "Environment configuration";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Server-side LLM settings (may be partially set)
    pub llm_env: LlmEnvironment,

    /// Upper bound for one whole generation, handshake to last fragment
    pub generation_timeout_seconds: u64,
    /// Upper bound for establishing the upstream connection
    pub connect_timeout_seconds: u64,

    /// Request body limit; inline images are sent base64-encoded
    pub max_body_bytes: usize,
}

/// The four LLM values as found in the environment.
///
/// Each field is satisfied by either `NEXT_PUBLIC_LLM_*` or `LLM_*`; the
/// public name is checked first and the first non-empty value wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmEnvironment {
    pub provider_type: Option<String>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl LlmEnvironment {
    /// Read the LLM variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |field: &str| {
            [format!("{}LLM_{}", PUBLIC_PREFIX, field), format!("LLM_{}", field)]
                .iter()
                .filter_map(|name| lookup(name.as_str()))
                .find(|value| !value.trim().is_empty())
        };

        Self {
            provider_type: read("TYPE"),
            base_url: read("BASE_URL"),
            api_key: read("API_KEY"),
            model: read("MODEL"),
        }
    }

    /// True when all four values are present
    pub fn is_complete(&self) -> bool {
        self.provider_type.is_some()
            && self.base_url.is_some()
            && self.api_key.is_some()
            && self.model.is_some()
    }

    /// Build the usable config, or `None` when any value is missing.
    ///
    /// Fails only when all values are present but the provider type is not
    /// one we can talk to.
    pub fn to_config(&self) -> Result<Option<LlmConfig>> {
        let (Some(provider_type), Some(base_url), Some(api_key), Some(model)) = (
            &self.provider_type,
            &self.base_url,
            &self.api_key,
            &self.model,
        ) else {
            return Ok(None);
        };

        let provider_type: ProviderKind = provider_type
            .parse()
            .with_context(|| format!("Invalid LLM_TYPE '{}'", provider_type))?;

        Ok(Some(LlmConfig {
            name: ENV_CONFIG_NAME.to_string(),
            provider_type,
            base_url: base_url.clone(),
            api_key: api_key.clone(),
            model: model.clone(),
        }))
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let llm_env = LlmEnvironment::from_lookup(&lookup);
        // Surface a bad provider type at start-up rather than per request
        llm_env.to_config()?;

        Ok(Self {
            host: lookup("SKETCHGEN_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("SKETCHGEN_PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("Invalid SKETCHGEN_PORT")?,

            llm_env,

            generation_timeout_seconds: lookup("GENERATION_TIMEOUT_SECONDS")
                .unwrap_or_else(|| "300".to_string())
                .parse()
                .context("Invalid GENERATION_TIMEOUT_SECONDS")?,
            connect_timeout_seconds: lookup("LLM_CONNECT_TIMEOUT_SECONDS")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .context("Invalid LLM_CONNECT_TIMEOUT_SECONDS")?,

            max_body_bytes: lookup("MAX_REQUEST_BODY_BYTES")
                .unwrap_or_else(|| (10 * 1024 * 1024).to_string())
                .parse()
                .context("Invalid MAX_REQUEST_BODY_BYTES")?,
        })
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}
