//! Vision function: describe an image file with the vision model.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use llmfn_llm::{ChatBackend, ChatMessage, PromptId};
use tracing::info;

use crate::{LlmFunctions, Result};

/// Prompt used for operations without a built-in one.
pub const FALLBACK_PROMPT: &str = "What is in this image?";

/// What to do with the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisionOperation {
    /// Short caption.
    Caption,
    /// Detailed analysis.
    Analyze,
    /// Plain description.
    Describe,
    /// Anything else; needs a custom prompt to be useful.
    Other(String),
}

impl VisionOperation {
    /// Prompt sent when the caller gives none.
    #[must_use]
    pub fn default_prompt(&self) -> &'static str {
        match self {
            Self::Caption => "Generate a short, accurate caption for this image.",
            Self::Analyze => "Provide a detailed analysis of this image.",
            Self::Describe => "Describe what you see in this image.",
            Self::Other(_) => FALLBACK_PROMPT,
        }
    }
}

impl FromStr for VisionOperation {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "caption" => Self::Caption,
            "analyze" => Self::Analyze,
            "describe" => Self::Describe,
            other => Self::Other(other.to_string()),
        })
    }
}

impl fmt::Display for VisionOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Caption => f.write_str("caption"),
            Self::Analyze => f.write_str("analyze"),
            Self::Describe => f.write_str("describe"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// MIME type guessed from the file extension. Unknown extensions are sent
/// as JPEG.
fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "image/jpeg",
    }
}

/// `data:` URL carrying `bytes` base64-encoded.
#[must_use]
pub fn data_url(path: &Path, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type(path), BASE64.encode(bytes))
}

impl<B: ChatBackend> LlmFunctions<B> {
    /// Run `operation` over the image at `image_path`.
    ///
    /// A non-empty `prompt` replaces the operation's default prompt.
    ///
    /// # Errors
    /// Fails if the image cannot be read, the model call fails, or the
    /// reply is empty.
    pub async fn vision(
        &self,
        operation: &VisionOperation,
        image_path: &Path,
        prompt: Option<&str>,
    ) -> Result<String> {
        info!(%operation, image = %image_path.display(), "Processing vision operation");
        let bytes = tokio::fs::read(image_path).await?;
        let url = data_url(image_path, &bytes);

        let prompt = prompt
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| operation.default_prompt());
        let (system, user) = self.prompts.render(PromptId::Vision, &[("prompt", prompt)])?;
        let messages = vec![ChatMessage::system(system), ChatMessage::user_with_image(user, url)];

        let answer = self
            .run_messages("vision", PromptId::Vision, &self.config.vision_model, messages)
            .await?;
        info!(bytes = bytes.len(), "Vision processing completed");
        Ok(answer)
    }
}
