//! LLM provider abstraction layer
//!
//! Defines the trait interface for LLM backends (OpenAI-compatible,
//! Anthropic) and the shared plumbing that turns an upstream SSE body into
//! a stream of text fragments.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::anthropic::AnthropicProvider;
use super::config::{LlmConfig, ProviderKind};
use super::openai::OpenAiProvider;
use crate::prompt::Message;
use crate::streaming::SseLineBuffer;

/// Token budget for providers that require one (Anthropic)
pub const MAX_TOKENS: u32 = 4096;

/// Longest upstream error body echoed back to the client
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Text fragments produced by the model, in arrival order
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, StreamError>> + Send>>;

/// Why a generation stopped before the model finished
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Request to LLM provider failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} API error {status}: {message}")]
    Upstream {
        provider: &'static str,
        status: u16,
        message: String,
    },

    /// Error reported inside the stream by the provider
    #[error("{0}")]
    Provider(String),

    #[error("API key contains characters that cannot be sent in a header")]
    InvalidCredentials,

    #[error("Generation timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Client disconnected")]
    ClientDisconnected,
}

impl StreamError {
    /// Short label for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            StreamError::Http(_) => "http",
            StreamError::Upstream { .. } => "upstream",
            StreamError::Provider(_) => "provider",
            StreamError::InvalidCredentials => "credentials",
            StreamError::Timeout(_) => "timeout",
            StreamError::ClientDisconnected => "disconnected",
        }
    }
}

/// Trait defining the interface for LLM providers
///
/// Implementations open one streaming chat request and hand back the text
/// fragments as they arrive.
///
/// # Security
///
/// Implementations MUST only send the credentials from the given
/// `LlmConfig`, never anything taken from the incoming client request.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging and metrics
    fn name(&self) -> &'static str;

    /// Open a streaming chat request.
    ///
    /// Returns once the upstream accepted the request. Errors inside the
    /// stream surface as `Err` items, after which the stream ends.
    async fn stream_chat(
        &self,
        config: &LlmConfig,
        messages: &[Message],
    ) -> Result<FragmentStream, StreamError>;
}

/// Dispatches each request to the wire protocol named in its config
pub struct ProviderRouter {
    openai: OpenAiProvider,
    anthropic: AnthropicProvider,
}

impl ProviderRouter {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            openai: OpenAiProvider::new(client.clone()),
            anthropic: AnthropicProvider::new(client),
        }
    }
}

#[async_trait]
impl LlmProvider for ProviderRouter {
    fn name(&self) -> &'static str {
        "router"
    }

    async fn stream_chat(
        &self,
        config: &LlmConfig,
        messages: &[Message],
    ) -> Result<FragmentStream, StreamError> {
        match config.provider_type {
            ProviderKind::OpenAi => self.openai.stream_chat(config, messages).await,
            ProviderKind::Anthropic => self.anthropic.stream_chat(config, messages).await,
        }
    }
}

/// What one SSE `data:` payload means to a provider parser
#[derive(Debug, Clone, PartialEq)]
pub enum SseEvent {
    /// Text to pass on
    Fragment(String),
    /// The model finished
    Done,
    /// The provider reported an error in-band
    Error(String),
    /// Nothing to emit (keep-alives, metadata, unparseable lines)
    Skip,
}

/// Join a configured base URL and an endpoint path
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

fn data_payload(line: &str) -> Option<&str> {
    line.trim_end_matches('\r')
        .strip_prefix("data:")
        .map(str::trim_start)
}

/// Turn an upstream SSE body into text fragments.
///
/// `event:` and comment lines are ignored; every `data:` payload goes
/// through `parse`. The stream ends at the first `Done` or `Error`, or when
/// the body ends.
pub(crate) fn sse_fragments<S, F>(provider: &'static str, body: S, parse: F) -> FragmentStream
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static,
    F: Fn(&str) -> SseEvent + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut buffer = SseLineBuffer::new();
        futures::pin_mut!(body);

        while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    warn!(provider = provider, error = %e, "Upstream stream failed");
                    yield Err(StreamError::Http(e));
                    return;
                }
            };

            for line in buffer.feed(&chunk) {
                let Some(payload) = data_payload(&line) else {
                    continue;
                };
                match parse(payload) {
                    SseEvent::Fragment(text) => yield Ok(text),
                    SseEvent::Done => return,
                    SseEvent::Error(message) => {
                        yield Err(StreamError::Provider(message));
                        return;
                    }
                    SseEvent::Skip => {}
                }
            }
        }

        // Body ended without a trailing newline
        if let Some(line) = buffer.finish() {
            if let Some(payload) = data_payload(&line) {
                match parse(payload) {
                    SseEvent::Fragment(text) => yield Ok(text),
                    SseEvent::Error(message) => yield Err(StreamError::Provider(message)),
                    SseEvent::Done | SseEvent::Skip => {}
                }
            }
        }

        debug!(provider = provider, "Upstream stream ended without end marker");
    })
}

/// Build the error for a non-success upstream response.
///
/// Prefers the `error.message` field providers put in JSON error bodies.
pub(crate) async fn upstream_error(provider: &'static str, response: reqwest::Response) -> StreamError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status.canonical_reason().unwrap_or("unknown error").to_string()
            } else {
                trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
            }
        });

    warn!(
        provider = provider,
        status = status.as_u16(),
        error = %message,
        "LLM provider rejected request"
    );

    StreamError::Upstream {
        provider,
        status: status.as_u16(),
        message,
    }
}
