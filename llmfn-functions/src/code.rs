//! Code function: rewrite source code for an operation such as `optimize`,
//! `add_typing`, `add_tests` or `document`.

use llmfn_llm::{ChatBackend, PromptId};
use tracing::info;

use crate::{LlmFunctions, Result};

impl<B: ChatBackend> LlmFunctions<B> {
    /// Run `operation` over `code` written in `language`.
    ///
    /// `language` falls back to the configured default when `None`.
    ///
    /// # Errors
    /// Fails if the model call fails or the reply is empty.
    pub async fn code(
        &self,
        operation: &str,
        code: &str,
        language: Option<&str>,
    ) -> Result<String> {
        let language = language.unwrap_or(self.defaults().code_language.as_str());
        info!(
            operation,
            language,
            lines = code.lines().count(),
            "Processing code operation"
        );
        self.run_prompt(
            "code",
            PromptId::Code,
            &[("language", language), ("operation", operation), ("code", code)],
        )
        .await
    }
}
