//! Web function: generate an HTML fragment and its stylesheet.

use llmfn_core::ValidationReport;
use llmfn_core::blocks;
use llmfn_core::markup;
use llmfn_llm::{ChatBackend, PromptId};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{LlmFunctions, Result};

/// Opens the markup block in a web completion.
pub const HTML_MARKER: &str = "---HTML---";
/// Opens the stylesheet block in a web completion.
pub const CSS_MARKER: &str = "---CSS---";

/// A generated component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebComponent {
    /// Markup from the `---HTML---` block, trimmed.
    pub html: String,
    /// Stylesheet from the `---CSS---` block, trimmed.
    pub css: String,
    /// Markup checks run over `html`.
    pub validation: ValidationReport,
}

impl WebComponent {
    /// Split a completion into markup and stylesheet and check the markup.
    ///
    /// # Errors
    /// Returns a format error if either marker is missing, they are out of
    /// order, or a block is empty.
    pub fn from_completion(raw: &str) -> Result<Self> {
        let pair = blocks::extract(raw, HTML_MARKER, CSS_MARKER)?;
        let validation = markup::validate(&pair.first);
        Ok(Self {
            html: pair.first,
            css: pair.second,
            validation,
        })
    }
}

impl<B: ChatBackend> LlmFunctions<B> {
    /// Generate a component (`component`, `form`, `layout`, ...) from a
    /// description.
    ///
    /// `style` falls back to the configured default when `None`.
    ///
    /// # Errors
    /// Fails if the model call fails or the reply is not in
    /// `---HTML---` / `---CSS---` form.
    pub async fn web(
        &self,
        operation: &str,
        content: &str,
        style: Option<&str>,
    ) -> Result<WebComponent> {
        let style = style.unwrap_or(self.defaults().web_style.as_str());
        info!(operation, style, "Processing web operation");
        let raw = self
            .run_prompt(
                "web",
                PromptId::Web,
                &[("operation", operation), ("content", content), ("style", style)],
            )
            .await?;

        let component = WebComponent::from_completion(&raw).inspect_err(|e| {
            warn!(error = %e, "Web reply is not in marker form");
        })?;
        for issue in &component.validation.accessibility {
            warn!(issue = %issue, "Accessibility issue in generated markup");
        }
        info!(
            html_len = component.html.len(),
            css_len = component.css.len(),
            "Web component generated"
        );
        Ok(component)
    }
}
