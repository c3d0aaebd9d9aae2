//! OpenAI-compatible chat completions provider
//!
//! Speaks `POST {baseUrl}/chat/completions` with `stream: true`, which most
//! self-hosted and third-party gateways also accept.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::config::LlmConfig;
use super::headers::bearer_headers;
use super::provider::{
    endpoint, sse_fragments, upstream_error, FragmentStream, LlmProvider, SseEvent, StreamError,
};
use crate::prompt::{Message, Role};

const PROVIDER: &str = "openai";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: Role,
    content: ChatContent<'a>,
}

/// Plain string, or content parts when an image is attached
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ChatContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

impl<'a> From<&'a Message> for ChatMessage<'a> {
    fn from(message: &'a Message) -> Self {
        let content = match &message.image {
            Some(image) => ChatContent::Parts(vec![
                ContentPart::Text {
                    text: &message.content,
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image.data_url(),
                    },
                },
            ]),
            None => ChatContent::Text(&message.content),
        };
        Self {
            role: message.role,
            content,
        }
    }
}

/// Streaming chunk, only the fields read here
#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    #[serde(default)]
    error: Option<ChunkError>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChunkError {
    message: String,
}

/// Interpret one `data:` payload of a chat completions stream
pub(crate) fn parse_payload(payload: &str) -> SseEvent {
    if payload == "[DONE]" {
        return SseEvent::Done;
    }

    match serde_json::from_str::<StreamChunk>(payload) {
        Ok(chunk) => {
            if let Some(error) = chunk.error {
                return SseEvent::Error(error.message);
            }
            let text: String = chunk
                .choices
                .into_iter()
                .filter_map(|choice| choice.delta.content)
                .collect();
            if text.is_empty() {
                SseEvent::Skip
            } else {
                SseEvent::Fragment(text)
            }
        }
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

/// Client for OpenAI-compatible endpoints
pub struct OpenAiProvider {
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    #[instrument(skip_all, fields(provider = PROVIDER, model = %config.model))]
    async fn stream_chat(
        &self,
        config: &LlmConfig,
        messages: &[Message],
    ) -> Result<FragmentStream, StreamError> {
        let url = endpoint(&config.base_url, "chat/completions");
        let request = ChatRequest {
            model: &config.model,
            messages: messages.iter().map(ChatMessage::from).collect(),
            stream: true,
        };

        debug!(message_count = messages.len(), "Opening chat completions stream");

        let response = self
            .client
            .post(&url)
            .headers(bearer_headers(&config.api_key)?)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(upstream_error(PROVIDER, response).await);
        }

        Ok(sse_fragments(PROVIDER, response.bytes_stream(), parse_payload))
    }
}
