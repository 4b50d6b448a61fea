//! # llmfn-functions — Prompt-Backed Functions
//!
//! Each function renders a prompt, makes one chat call and shapes the reply:
//!
//! | Function    | Reply handling                                        |
//! |-------------|-------------------------------------------------------|
//! | `math`      | trimmed text                                          |
//! | `string`    | trimmed text                                          |
//! | `code`      | trimmed text                                          |
//! | `debug`     | four labelled sections → [`DebugReport`]              |
//! | `web`       | `---HTML---` / `---CSS---` blocks → [`WebComponent`]  |
//! | `vision`    | trimmed text, image sent as a base64 data URL         |
//! | `embedding` | embedding vector                                      |
//!
//! [`reviewer`] chains `code` and `debug` into a code review report.
//!
//! Configuration is passed in explicitly through [`LlmConfig`]; nothing is
//! read from globals. Calls are sequential and each one is independent.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod code;
pub mod debug;
pub mod embedding;
pub mod error;
pub mod reviewer;
pub mod text;
pub mod vision;
pub mod web;

pub use debug::{DebugReport, ErrorInfo};
pub use error::{FunctionError, Result};
pub use reviewer::{CodeAnalysis, ReportFormat};
pub use vision::VisionOperation;
pub use web::WebComponent;

use std::time::Instant;

use llmfn_core::config::{FunctionDefaults, LlmConfig, LlmfnConfig};
use llmfn_llm::{ChatBackend, ChatMessage, ChatRequest, LlmClient, PromptEngine, PromptId};
use tracing::{debug, info};

/// The function library, bound to one backend and one configuration.
#[derive(Debug, Clone)]
pub struct LlmFunctions<B = LlmClient> {
    backend: B,
    config: LlmConfig,
    defaults: FunctionDefaults,
    prompts: PromptEngine,
}

impl LlmFunctions<LlmClient> {
    /// Build an HTTP-backed library from configuration.
    ///
    /// Loads prompt overrides from `llm.prompt_dir` when set.
    ///
    /// # Errors
    /// Returns an error for an unknown provider or unreadable prompt files.
    pub fn from_config(config: LlmfnConfig) -> Result<Self> {
        let LlmfnConfig { llm: config, defaults, .. } = config;
        let backend = LlmClient::from_config(&config)?;
        let prompts = match &config.prompt_dir {
            Some(dir) => PromptEngine::from_directory(dir)?,
            None => PromptEngine::builtin(),
        };
        info!(
            provider = %config.provider,
            model = %config.model,
            prompts = prompts.len(),
            "LLM functions ready"
        );
        Ok(Self {
            backend,
            config,
            defaults,
            prompts,
        })
    }
}

impl<B: ChatBackend> LlmFunctions<B> {
    /// Use an arbitrary backend with the built-in prompts.
    #[must_use]
    pub fn with_backend(backend: B, config: LlmConfig) -> Self {
        Self {
            backend,
            config,
            defaults: FunctionDefaults::default(),
            prompts: PromptEngine::builtin(),
        }
    }

    /// Replace the argument defaults.
    #[must_use]
    pub fn with_defaults(mut self, defaults: FunctionDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Replace the prompt set.
    #[must_use]
    pub fn with_prompts(mut self, prompts: PromptEngine) -> Self {
        self.prompts = prompts;
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Defaults for omitted arguments.
    #[must_use]
    pub fn defaults(&self) -> &FunctionDefaults {
        &self.defaults
    }

    /// The backend in use.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Render prompt `id` and run it against the text model.
    pub(crate) async fn run_prompt(
        &self,
        function: &'static str,
        id: PromptId,
        vars: &[(&str, &str)],
    ) -> Result<String> {
        let (system, user) = self.prompts.render(id, vars)?;
        let messages = vec![ChatMessage::system(system), ChatMessage::user(user)];
        self.run_messages(function, id, &self.config.model, messages)
            .await
    }

    /// Send `messages` to `model` and return the trimmed reply text.
    pub(crate) async fn run_messages(
        &self,
        function: &'static str,
        id: PromptId,
        model: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<String> {
        let mut request = ChatRequest::from_messages(model, messages)
            .with_temperature(self.config.temperature)
            .with_timeout(self.config.request_timeout_ms);
        if let Some(max_tokens) = self.prompts.get(id).and_then(|t| t.max_tokens) {
            request = request.with_max_tokens(max_tokens);
        }

        let start = Instant::now();
        let response = self.backend.complete(&request).await?;
        let text = response.text.trim();
        debug!(
            function,
            model,
            tokens = response.tokens_generated,
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Completion received"
        );

        if text.is_empty() {
            return Err(FunctionError::EmptyResponse { function });
        }
        Ok(text.to_string())
    }
}
