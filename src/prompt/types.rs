//! Message types sent to the model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role of a message participant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Fixed instructions, always the first message
    System,
    /// The user's request
    User,
}

/// Inline image attached to a user message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    /// Base64-encoded image bytes, without a `data:` prefix
    pub data: String,
    /// e.g. `image/png`
    pub mime_type: String,
}

impl ImageData {
    /// `data:` URL form used by OpenAI-compatible APIs
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// One message of the conversation sent to the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageData>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            image: None,
        }
    }

    pub fn user(content: impl Into<String>, image: Option<ImageData>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            image,
        }
    }
}

/// What the user asked for: plain text, or text with an optional image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(untagged)]
pub enum UserInput {
    Text(String),
    Rich {
        #[serde(default)]
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image: Option<ImageData>,
    },
}

impl UserInput {
    /// True when there is nothing to generate from
    pub fn is_empty(&self) -> bool {
        match self {
            UserInput::Text(text) => text.trim().is_empty(),
            UserInput::Rich { text, image } => text.trim().is_empty() && image.is_none(),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            UserInput::Text(text) => text,
            UserInput::Rich { text, .. } => text,
        }
    }

    pub fn image(&self) -> Option<&ImageData> {
        match self {
            UserInput::Text(_) => None,
            UserInput::Rich { image, .. } => image.as_ref(),
        }
    }
}
