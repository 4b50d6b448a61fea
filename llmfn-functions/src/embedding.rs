//! Embedding function.

use llmfn_llm::ChatBackend;
use tracing::info;

use crate::{FunctionError, LlmFunctions, Result};

impl<B: ChatBackend> LlmFunctions<B> {
    /// Embed `text` with the configured embedding model.
    ///
    /// # Errors
    /// Fails if the model call fails or returns an empty vector.
    pub async fn embedding(&self, text: &str) -> Result<Vec<f32>> {
        let preview: String = text.chars().take(100).collect();
        info!(text = %preview, "Generating embedding");

        let vector = self
            .backend()
            .embed(&self.config().embedding_model, text)
            .await?;
        if vector.is_empty() {
            return Err(FunctionError::EmptyResponse {
                function: "embedding",
            });
        }
        info!(dimensions = vector.len(), "Embedding generated");
        Ok(vector)
    }
}
