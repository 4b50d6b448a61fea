//! Core types for LLM requests and responses.
//!
//! Message types serialize to the OpenAI chat-completions shape; the Ollama
//! path converts them in `client.rs`.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that frame the conversation.
    System,
    /// The caller's input.
    User,
    /// A previous model reply.
    Assistant,
}

/// One piece of a multi-part message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain text.
    Text { text: String },
    /// An image, usually a `data:` URL.
    ImageUrl { image_url: ImageUrl },
}

/// Image reference inside a [`ContentPart::ImageUrl`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    /// `https://` or `data:<mime>;base64,<payload>` URL.
    pub url: String,
}

/// Message body: a plain string, or text and image parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text.
    Text(String),
    /// Mixed parts (used for vision input).
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// All text in the message, parts joined by newlines.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// URLs of every image part.
    #[must_use]
    pub fn image_urls(&self) -> Vec<&str> {
        match self {
            Self::Text(_) => Vec::new(),
            Self::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::ImageUrl { image_url } => Some(image_url.url.as_str()),
                    ContentPart::Text { .. } => None,
                })
                .collect(),
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote it.
    pub role: Role,
    /// What it says.
    pub content: MessageContent,
}

impl ChatMessage {
    /// A system message.
    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A plain user message.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A user message carrying a prompt and one image.
    #[must_use]
    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_url.into(),
                    },
                },
            ]),
        }
    }
}

/// A request to the LLM.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model name as the provider knows it.
    pub model: String,
    /// Conversation, system message first.
    pub messages: Vec<ChatMessage>,
    /// Temperature (0.0 = deterministic, 1.0 = creative).
    pub temperature: f32,
    /// Maximum tokens to generate. `None` leaves it to the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Request timeout in milliseconds.
    #[serde(skip)]
    pub timeout_ms: u64,
}

impl ChatRequest {
    /// Create a system + user request with default sampling.
    #[must_use]
    pub fn new(model: impl Into<String>, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self::from_messages(model, vec![ChatMessage::system(system), ChatMessage::user(user)])
    }

    /// Create a request from an explicit message list.
    #[must_use]
    pub fn from_messages(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: 0.1,
            max_tokens: None,
            timeout_ms: 60_000,
        }
    }

    /// Set the temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Cap the number of generated tokens.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// A response from the LLM.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmResponse {
    /// The generated text.
    pub text: String,
    /// How many tokens were generated.
    pub tokens_generated: u32,
    /// Latency in milliseconds.
    pub latency_ms: u64,
    /// Which model was used.
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_message_serializes_as_string_content() {
        let json = serde_json::to_value(ChatMessage::user("hi")).expect("serialize");
        assert_eq!(json, serde_json::json!({ "role": "user", "content": "hi" }));
    }

    #[test]
    fn image_message_serializes_as_parts() {
        let msg = ChatMessage::user_with_image("caption this", "data:image/png;base64,AAAA");
        let json = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "role": "user",
                "content": [
                    { "type": "text", "text": "caption this" },
                    { "type": "image_url", "image_url": { "url": "data:image/png;base64,AAAA" } }
                ]
            })
        );
        assert_eq!(msg.content.text(), "caption this");
        assert_eq!(msg.content.image_urls(), vec!["data:image/png;base64,AAAA"]);
    }

    #[test]
    fn request_omits_unset_fields() {
        let req = ChatRequest::new("m", "sys", "usr").with_timeout(10);
        let json = serde_json::to_value(&req).expect("serialize");
        assert!(json.get("max_tokens").is_none());
        assert!(json.get("timeout_ms").is_none());
        assert_eq!(json["messages"][0]["role"], "system");

        let json = serde_json::to_value(req.with_max_tokens(64)).expect("serialize");
        assert_eq!(json["max_tokens"], 64);
    }
}
