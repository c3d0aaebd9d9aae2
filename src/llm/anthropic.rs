//! Anthropic messages API provider

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::config::LlmConfig;
use super::headers::anthropic_headers;
use super::provider::{
    endpoint, sse_fragments, upstream_error, FragmentStream, LlmProvider, SseEvent, StreamError,
    MAX_TOKENS,
};
use crate::prompt::{Message, Role};

const PROVIDER: &str = "anthropic";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: Role,
    content: AnthropicContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum AnthropicContent<'a> {
    Text(&'a str),
    Blocks(Vec<ContentBlock<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock<'a> {
    Image { source: ImageSource<'a> },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    source_type: &'static str,
    media_type: &'a str,
    data: &'a str,
}

impl<'a> MessagesRequest<'a> {
    /// System messages move to the top-level `system` field
    fn new(model: &'a str, messages: &'a [Message]) -> Self {
        let system_parts: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();
        let system = (!system_parts.is_empty()).then(|| system_parts.join("\n\n"));

        let messages = messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| {
                let content = match &m.image {
                    Some(image) => AnthropicContent::Blocks(vec![
                        ContentBlock::Image {
                            source: ImageSource {
                                source_type: "base64",
                                media_type: &image.mime_type,
                                data: &image.data,
                            },
                        },
                        ContentBlock::Text { text: &m.content },
                    ]),
                    None => AnthropicContent::Text(&m.content),
                };
                AnthropicMessage {
                    role: m.role,
                    content,
                }
            })
            .collect();

        Self {
            model,
            max_tokens: MAX_TOKENS,
            stream: true,
            system,
            messages,
        }
    }
}

/// Streaming event, only the fields read here
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent {
    ContentBlockDelta { delta: Delta },
    MessageStop,
    Error { error: EventError },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Delta {
    TextDelta {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct EventError {
    message: String,
}

/// Interpret one `data:` payload of a messages stream
pub(crate) fn parse_payload(payload: &str) -> SseEvent {
    match serde_json::from_str::<StreamEvent>(payload) {
        Ok(StreamEvent::ContentBlockDelta {
            delta: Delta::TextDelta { text },
        }) if !text.is_empty() => SseEvent::Fragment(text),
        Ok(StreamEvent::MessageStop) => SseEvent::Done,
        Ok(StreamEvent::Error { error }) => SseEvent::Error(error.message),
        Ok(_) => SseEvent::Skip,
        Err(e) => {
            warn!(
                provider = PROVIDER,
                error = %e,
                line_preview = %payload.chars().take(100).collect::<String>(),
                "Failed to parse SSE line"
            );
            SseEvent::Skip
        }
    }
}

/// Client for the Anthropic messages API
pub struct AnthropicProvider {
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    #[instrument(skip_all, fields(provider = PROVIDER, model = %config.model))]
    async fn stream_chat(
        &self,
        config: &LlmConfig,
        messages: &[Message],
    ) -> Result<FragmentStream, StreamError> {
        let url = endpoint(&config.base_url, "messages");
        let request = MessagesRequest::new(&config.model, messages);

        debug!(message_count = messages.len(), "Opening messages stream");

        let response = self
            .client
            .post(&url)
            .headers(anthropic_headers(&config.api_key)?)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream_error(PROVIDER, response).await);
        }

        Ok(sse_fragments(PROVIDER, response.bytes_stream(), parse_payload))
    }
}
