//! # llmfn-llm — LLM Client Layer for llmfn
//!
//! Provides a unified interface for chat completion and embeddings across
//! two HTTP backends:
//!   - **Ollama** (local, default): `/api/chat`, `/api/embeddings`
//!   - **OpenAI-compatible API**: `/v1/chat/completions`, `/v1/embeddings`
//!
//! Every function in `llmfn-functions` goes through [`ChatBackend`], so tests
//! can swap the HTTP client for a scripted one. Each call is a single
//! attempt: timeouts, connection failures and non-2xx statuses surface as
//! [`LlmError`] variants for the caller to handle.
//!
//! Prompts live in [`prompt`] as compiled-in constants and can be
//! overridden from versioned TOML files through [`prompt::PromptEngine`].

pub mod client;
pub mod error;
pub mod prompt;
pub mod types;

pub use client::{ChatBackend, LlmClient, LlmProvider};
pub use error::LlmError;
pub use prompt::{PromptEngine, PromptId};
pub use types::{ChatMessage, ChatRequest, ContentPart, LlmResponse, MessageContent, Role};
