//! LLM Client: chat and embedding calls against Ollama or an
//! OpenAI-compatible endpoint.
//!
//! Every call is a single HTTP attempt. Failures surface as [`LlmError`] and
//! the caller decides what to do with them.

use std::future::Future;
use std::time::{Duration, Instant};

use llmfn_core::config::LlmConfig;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::types::{ChatRequest, LlmResponse};

/// Anything that can answer chat requests and embed text.
///
/// [`LlmClient`] talks HTTP; tests plug in a scripted implementation.
pub trait ChatBackend: Send + Sync {
    /// Run a chat completion and return the generated text.
    fn complete(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<LlmResponse, LlmError>> + Send;

    /// Embed `input` with `model`.
    fn embed(
        &self,
        model: &str,
        input: &str,
    ) -> impl Future<Output = Result<Vec<f32>, LlmError>> + Send;
}

/// Provider backend for LLM inference.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    /// Ollama running locally, native API.
    Ollama { base_url: String },
    /// OpenAI-compatible API (also Ollama's `/v1`, vLLM, LM Studio, ...).
    OpenAiCompatible { base_url: String, api_key: String },
    /// No LLM available; all calls return [`LlmError::Unavailable`].
    None,
}

/// HTTP client for the configured provider.
#[derive(Debug, Clone)]
pub struct LlmClient {
    provider: LlmProvider,
    http: Client,
    timeout_ms: u64,
}

impl LlmClient {
    /// Create a new LLM client.
    #[must_use]
    pub fn new(provider: LlmProvider, timeout_ms: u64) -> Self {
        Self {
            provider,
            http: Client::new(),
            timeout_ms,
        }
    }

    /// Create a client with no LLM backend (all calls fail).
    #[must_use]
    pub fn none() -> Self {
        Self::new(LlmProvider::None, 0)
    }

    /// Build a client from the `[llm]` config section.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigError`] for an unknown provider name.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let provider = match config.provider.to_ascii_lowercase().as_str() {
            "ollama" => LlmProvider::Ollama {
                base_url: config.base_url.clone(),
            },
            "openai" | "openai_compatible" => LlmProvider::OpenAiCompatible {
                base_url: config.base_url.clone(),
                api_key: config.api_key.clone(),
            },
            "none" => LlmProvider::None,
            other => {
                return Err(LlmError::ConfigError(format!(
                    "unknown provider '{other}' (expected ollama, openai or none)"
                )));
            }
        };
        Ok(Self::new(provider, config.request_timeout_ms))
    }

    /// Check if the LLM client has a backend configured.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !matches!(self.provider, LlmProvider::None)
    }

    /// Generate a chat completion.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the provider is unavailable, the request fails or
    /// times out, or the response body cannot be read.
    pub async fn chat(&self, request: &ChatRequest) -> Result<LlmResponse, LlmError> {
        let (url, bearer, body) = match &self.provider {
            LlmProvider::None => {
                return Err(LlmError::Unavailable("No LLM provider configured".into()));
            }
            LlmProvider::Ollama { base_url } => (
                endpoint(base_url, "/api/chat"),
                None,
                ollama_chat_body(request),
            ),
            LlmProvider::OpenAiCompatible { base_url, api_key } => (
                endpoint(base_url, "/v1/chat/completions"),
                Some(api_key.as_str()),
                openai_chat_body(request),
            ),
        };

        let start = Instant::now();
        let json = self.post_json(&url, bearer, &body, request.timeout_ms).await?;
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let (text, tokens_generated) = match self.provider {
            LlmProvider::Ollama { .. } => read_ollama_chat(&json)?,
            _ => read_openai_chat(&json)?,
        };

        debug!(
            model = %request.model,
            latency_ms,
            tokens_generated,
            "Chat completion received"
        );

        Ok(LlmResponse {
            text,
            tokens_generated,
            latency_ms,
            model: request.model.clone(),
        })
    }

    /// Generate an embedding vector.
    ///
    /// # Errors
    ///
    /// Same conditions as [`chat`](Self::chat).
    pub async fn embeddings(&self, model: &str, input: &str) -> Result<Vec<f32>, LlmError> {
        let json = match &self.provider {
            LlmProvider::None => {
                return Err(LlmError::Unavailable("No LLM provider configured".into()));
            }
            LlmProvider::Ollama { base_url } => {
                let body = json!({ "model": model, "prompt": input });
                self.post_json(&endpoint(base_url, "/api/embeddings"), None, &body, self.timeout_ms)
                    .await?
            }
            LlmProvider::OpenAiCompatible { base_url, api_key } => {
                let body = json!({ "model": model, "input": input });
                self.post_json(
                    &endpoint(base_url, "/v1/embeddings"),
                    Some(api_key.as_str()),
                    &body,
                    self.timeout_ms,
                )
                .await?
            }
        };

        let vector = read_embedding(&json)?;
        debug!(model, dimensions = vector.len(), "Embedding received");
        Ok(vector)
    }

    async fn post_json(
        &self,
        url: &str,
        bearer: Option<&str>,
        body: &Value,
        timeout_ms: u64,
    ) -> Result<Value, LlmError> {
        let mut builder = self
            .http
            .post(url)
            .json(body)
            .timeout(Duration::from_millis(timeout_ms));
        if let Some(key) = bearer {
            builder = builder.bearer_auth(key);
        }

        let resp = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                warn!(url, timeout_ms, "LLM request timed out");
                LlmError::Timeout(timeout_ms)
            } else {
                warn!(url, error = %e, "LLM request failed");
                LlmError::from(e)
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(url, status = status.as_u16(), "LLM endpoint returned error");
            return Err(LlmError::Http {
                status: status.as_u16(),
                body,
            });
        }

        resp.json()
            .await
            .map_err(|e| LlmError::ParseError(e.to_string()))
    }
}

impl ChatBackend for LlmClient {
    async fn complete(&self, request: &ChatRequest) -> Result<LlmResponse, LlmError> {
        self.chat(request).await
    }

    async fn embed(&self, model: &str, input: &str) -> Result<Vec<f32>, LlmError> {
        self.embeddings(model, input).await
    }
}

// ---------------------------------------------------------------------------
// Wire format helpers
// ---------------------------------------------------------------------------

/// Join a base URL and an API path, tolerating a trailing slash or a base
/// that already ends in `/v1`.
fn endpoint(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    match path.strip_prefix("/v1") {
        Some(rest) if base.ends_with("/v1") => format!("{base}{rest}"),
        _ => format!("{base}{path}"),
    }
}

fn openai_chat_body(request: &ChatRequest) -> Value {
    let mut body = json!({
        "model": request.model,
        "messages": request.messages,
        "temperature": request.temperature,
    });
    if let Some(max_tokens) = request.max_tokens {
        body["max_tokens"] = json!(max_tokens);
    }
    body
}

/// Ollama wants plain-string content and raw base64 images on the side.
fn ollama_chat_body(request: &ChatRequest) -> Value {
    let messages: Vec<Value> = request
        .messages
        .iter()
        .map(|msg| {
            let mut m = json!({
                "role": msg.role,
                "content": msg.content.text(),
            });
            let images: Vec<&str> = msg
                .content
                .image_urls()
                .into_iter()
                .map(strip_data_url)
                .collect();
            if !images.is_empty() {
                m["images"] = json!(images);
            }
            m
        })
        .collect();

    let mut body = json!({
        "model": request.model,
        "messages": messages,
        "stream": false,
        "options": {
            "temperature": request.temperature,
        }
    });
    if let Some(max_tokens) = request.max_tokens {
        body["options"]["num_predict"] = json!(max_tokens);
    }
    body
}

fn strip_data_url(url: &str) -> &str {
    match url.split_once(";base64,") {
        Some((prefix, payload)) if prefix.starts_with("data:") => payload,
        _ => url,
    }
}

fn read_openai_chat(json: &Value) -> Result<(String, u32), LlmError> {
    let text = json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| LlmError::ParseError(format!("missing choices[0].message.content in {json}")))?
        .to_string();
    let tokens = json["usage"]["completion_tokens"].as_u64().unwrap_or(0);
    Ok((text, u32::try_from(tokens).unwrap_or(u32::MAX)))
}

fn read_ollama_chat(json: &Value) -> Result<(String, u32), LlmError> {
    let text = json["message"]["content"]
        .as_str()
        .ok_or_else(|| LlmError::ParseError(format!("missing message.content in {json}")))?
        .to_string();
    let tokens = json["eval_count"].as_u64().unwrap_or(0);
    Ok((text, u32::try_from(tokens).unwrap_or(u32::MAX)))
}

/// Accepts both `{"embedding": [...]}` (Ollama) and
/// `{"data": [{"embedding": [...]}]}` (OpenAI).
fn read_embedding(json: &Value) -> Result<Vec<f32>, LlmError> {
    let values = json["embedding"]
        .as_array()
        .or_else(|| json["data"][0]["embedding"].as_array())
        .ok_or_else(|| LlmError::ParseError("response has no embedding array".into()))?;

    values
        .iter()
        .map(|v| {
            v.as_f64()
                .map(|f| f as f32)
                .ok_or_else(|| LlmError::ParseError(format!("non-numeric embedding value: {v}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;

    #[test]
    fn endpoint_joins_paths() {
        assert_eq!(
            endpoint("http://localhost:11434", "/api/chat"),
            "http://localhost:11434/api/chat"
        );
        assert_eq!(
            endpoint("http://localhost:11434/", "/v1/chat/completions"),
            "http://localhost:11434/v1/chat/completions"
        );
        assert_eq!(
            endpoint("http://localhost:11434/v1", "/v1/embeddings"),
            "http://localhost:11434/v1/embeddings"
        );
    }

    #[test]
    fn openai_body_passes_messages_through() {
        let req = ChatRequest::new("smollm2:1.7b", "sys", "2 + 2=").with_max_tokens(8);
        let body = openai_chat_body(&req);
        assert_eq!(body["model"], "smollm2:1.7b");
        assert_eq!(body["messages"][1]["content"], "2 + 2=");
        assert_eq!(body["max_tokens"], 8);
    }

    #[test]
    fn ollama_body_moves_images_aside() {
        let req = ChatRequest::from_messages(
            "llava",
            vec![
                ChatMessage::system("describe"),
                ChatMessage::user_with_image("what is this?", "data:image/jpeg;base64,QUJD"),
            ],
        );
        let body = ollama_chat_body(&req);
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["content"], "describe");
        assert!(body["messages"][0].get("images").is_none());
        assert_eq!(body["messages"][1]["content"], "what is this?");
        assert_eq!(body["messages"][1]["images"][0], "QUJD");
        assert!(body["options"].get("num_predict").is_none());
    }

    #[test]
    fn strip_data_url_leaves_plain_urls() {
        assert_eq!(strip_data_url("data:image/png;base64,Zm9v"), "Zm9v");
        assert_eq!(strip_data_url("https://x.test/a.png"), "https://x.test/a.png");
    }

    #[test]
    fn reads_openai_completion() {
        let json = json!({
            "choices": [{ "message": { "role": "assistant", "content": "4" } }],
            "usage": { "completion_tokens": 1 }
        });
        let (text, tokens) = read_openai_chat(&json).expect("valid");
        assert_eq!(text, "4");
        assert_eq!(tokens, 1);
    }

    #[test]
    fn reads_ollama_completion() {
        let json = json!({ "message": { "role": "assistant", "content": "15" }, "eval_count": 3 });
        let (text, tokens) = read_ollama_chat(&json).expect("valid");
        assert_eq!(text, "15");
        assert_eq!(tokens, 3);
    }

    #[test]
    fn missing_content_is_parse_error() {
        let err = read_openai_chat(&json!({ "choices": [] })).expect_err("no content");
        assert!(matches!(err, LlmError::ParseError(_)));
    }

    #[test]
    fn reads_both_embedding_shapes() {
        let ollama = json!({ "embedding": [0.5, -1.0] });
        let openai = json!({ "data": [{ "embedding": [0.25] }] });
        assert_eq!(read_embedding(&ollama).expect("ollama"), vec![0.5, -1.0]);
        assert_eq!(read_embedding(&openai).expect("openai"), vec![0.25]);
        assert!(read_embedding(&json!({ "embedding": ["x"] })).is_err());
        assert!(read_embedding(&json!({})).is_err());
    }

    #[test]
    fn from_config_selects_provider() {
        let mut config = LlmConfig::default();
        assert!(LlmClient::from_config(&config).expect("ollama").is_available());

        config.provider = "none".into();
        assert!(!LlmClient::from_config(&config).expect("none").is_available());

        config.provider = "llama_cpp".into();
        assert!(matches!(
            LlmClient::from_config(&config),
            Err(LlmError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn none_provider_is_unavailable() {
        let client = LlmClient::none();
        let req = ChatRequest::new("m", "s", "u");
        assert!(matches!(client.chat(&req).await, Err(LlmError::Unavailable(_))));
        assert!(matches!(
            client.embeddings("m", "text").await,
            Err(LlmError::Unavailable(_))
        ));
    }
}
