//! Header construction for upstream LLM requests
//!
//! Client headers are never forwarded. Each request carries only the
//! credentials from the resolved configuration.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};

use super::provider::StreamError;

/// Anthropic API version sent with every messages request
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

fn base_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
    headers
}

fn secret_value(value: &str) -> Result<HeaderValue, StreamError> {
    let mut value = HeaderValue::from_str(value).map_err(|_| StreamError::InvalidCredentials)?;
    value.set_sensitive(true);
    Ok(value)
}

/// Headers for OpenAI-compatible endpoints: bearer token auth
pub fn bearer_headers(api_key: &str) -> Result<HeaderMap, StreamError> {
    let mut headers = base_headers();
    headers.insert(AUTHORIZATION, secret_value(&format!("Bearer {}", api_key))?);
    Ok(headers)
}

/// Headers for the Anthropic messages API
pub fn anthropic_headers(api_key: &str) -> Result<HeaderMap, StreamError> {
    let mut headers = base_headers();
    headers.insert(HeaderName::from_static("x-api-key"), secret_value(api_key)?);
    headers.insert(
        HeaderName::from_static("anthropic-version"),
        HeaderValue::from_static(ANTHROPIC_VERSION),
    );
    Ok(headers)
}
