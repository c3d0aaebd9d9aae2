//! LLM endpoint configuration types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

/// Wire protocol spoken by the configured endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ProviderKind {
    /// OpenAI-compatible chat completions API
    #[serde(rename = "openai", alias = "openai-compatible")]
    OpenAi,
    /// Anthropic messages API
    #[serde(rename = "anthropic", alias = "claude")]
    Anthropic,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unsupported provider type '{0}' (expected 'openai' or 'anthropic')")]
pub struct UnknownProviderKind(pub String);

impl FromStr for ProviderKind {
    type Err = UnknownProviderKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "openai-compatible" => Ok(ProviderKind::OpenAi),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            _ => Err(UnknownProviderKind(s.to_string())),
        }
    }
}

/// A complete, usable LLM configuration
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmConfig {
    /// Display label
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub provider_type: ProviderKind,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

// The API key never reaches logs through `{:?}`
impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("name", &self.name)
            .field("provider_type", &self.provider_type)
            .field("base_url", &redact_url(&self.base_url, 20))
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

/// Configuration as sent by a client; any field may be missing
#[derive(Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientLlmConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<ProviderKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl fmt::Debug for ClientLlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientLlmConfig")
            .field("name", &self.name)
            .field("provider_type", &self.provider_type)
            .field(
                "base_url",
                &self.base_url.as_deref().map(|url| redact_url(url, 20)),
            )
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .finish()
    }
}

/// A client config lacked one or more required fields
#[derive(Debug, Clone, PartialEq, Error)]
#[error("incomplete LLM configuration, missing: {}", .0.join(", "))]
pub struct MissingFields(pub Vec<&'static str>);

impl TryFrom<ClientLlmConfig> for LlmConfig {
    type Error = MissingFields;

    fn try_from(client: ClientLlmConfig) -> Result<Self, Self::Error> {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        let base_url = present(client.base_url);
        let api_key = present(client.api_key);
        let model = present(client.model);

        match (client.provider_type, base_url, api_key, model) {
            (Some(provider_type), Some(base_url), Some(api_key), Some(model)) => Ok(LlmConfig {
                name: client.name.unwrap_or_default(),
                provider_type,
                base_url,
                api_key,
                model,
            }),
            (provider_type, base_url, api_key, model) => {
                let mut missing = Vec::new();
                if provider_type.is_none() {
                    missing.push("type");
                }
                if base_url.is_none() {
                    missing.push("baseUrl");
                }
                if api_key.is_none() {
                    missing.push("apiKey");
                }
                if model.is_none() {
                    missing.push("model");
                }
                Err(MissingFields(missing))
            }
        }
    }
}

/// Keep the first `keep` characters of a URL for display and append `...`
pub fn redact_url(url: &str, keep: usize) -> String {
    let prefix: String = url.chars().take(keep).collect();
    format!("{}...", prefix)
}
