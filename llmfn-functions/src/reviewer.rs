//! Code reviewer built on top of the code and debug functions.
//!
//! A review is three model calls over one file: an `optimize` rewrite, a
//! debug-style diagnosis of the code as a whole, and a `document` pass.
//! [`LlmFunctions::generate_report`] renders the result as Markdown, and
//! other formats go through the string function's `convert_format`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use llmfn_llm::ChatBackend;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::debug::{DebugReport, ErrorInfo};
use crate::{LlmFunctions, Result};

const REVIEW_CONTEXT: &str =
    "Perform a comprehensive code review focusing on optimization, security, and best practices";

/// Everything the reviewer learned about one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeAnalysis {
    /// File that was reviewed.
    pub path: PathBuf,
    /// Language used for prompts and code fences.
    pub language: String,
    /// File contents as read.
    pub original: String,
    /// Reply to the `optimize` code operation.
    pub optimized: String,
    /// Diagnosis of the file as a whole.
    pub issues: DebugReport,
    /// Reply to the `document` code operation.
    pub documentation: String,
}

/// Output format for [`LlmFunctions::generate_report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Rendered locally, no model call.
    #[default]
    Markdown,
    /// Converted by the model.
    Html,
    /// Converted by the model.
    Text,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Markdown => "markdown",
            Self::Html => "html",
            Self::Text => "text",
        })
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            "text" | "txt" | "plain" => Ok(Self::Text),
            other => Err(format!("unknown report format: '{other}'")),
        }
    }
}

/// Language name for a source file, from its extension.
#[must_use]
pub fn language_for(path: &Path) -> Option<&'static str> {
    let lang = match path.extension()?.to_str()? {
        "py" => "python",
        "rs" => "rust",
        "js" | "mjs" => "javascript",
        "ts" => "typescript",
        "go" => "go",
        "java" => "java",
        "c" | "h" => "c",
        "cpp" | "cc" | "hpp" => "cpp",
        "rb" => "ruby",
        "sh" => "bash",
        _ => return None,
    };
    Some(lang)
}

/// Markdown rendering of an analysis.
#[must_use]
pub fn render_markdown(analysis: &CodeAnalysis) -> String {
    let lang = &analysis.language;
    let issues = &analysis.issues;
    format!(
        "# Code Analysis Report\n\n\
         File: `{path}`\n\n\
         ## Original Code\n```{lang}\n{original}\n```\n\n\
         ## Optimized Version\n```{lang}\n{optimized}\n```\n\n\
         ## Issues Found\n\
         - Analysis: {analysis_text}\n\
         - Root Cause: {root_cause}\n\
         - Suggested Fix: {fix}\n\
         - Prevention: {prevention}\n\n\
         ## Documentation\n```{lang}\n{documentation}\n```\n",
        path = analysis.path.display(),
        original = analysis.original.trim_end(),
        optimized = analysis.optimized,
        analysis_text = issues.analysis,
        root_cause = issues.root_cause,
        fix = issues.fix,
        prevention = issues.prevention,
        documentation = analysis.documentation,
    )
}

impl<B: ChatBackend> LlmFunctions<B> {
    /// Review the source file at `path`.
    ///
    /// # Errors
    /// Fails if the file cannot be read or any of the model calls fails.
    pub async fn analyze_code_file(&self, path: &Path) -> Result<CodeAnalysis> {
        let code = tokio::fs::read_to_string(path).await?;
        let language = language_for(path)
            .unwrap_or(self.defaults().code_language.as_str())
            .to_string();
        info!(path = %path.display(), language = %language, "Reviewing code file");

        let optimized = self.code("optimize", &code, Some(language.as_str())).await?;

        let review = ErrorInfo::new("CodeReview", "Code Review Analysis")
            .with_code(code.as_str())
            .with_variable("file_path", path.display().to_string())
            .with_variable("code_length", code.len().to_string())
            .with_variable("review_type", "static_analysis");
        let issues = self.debug(&review, Some(REVIEW_CONTEXT)).await?;

        let documentation = self.code("document", &code, Some(language.as_str())).await?;

        info!(path = %path.display(), "Code review completed");
        Ok(CodeAnalysis {
            path: path.to_path_buf(),
            language,
            original: code,
            optimized,
            issues,
            documentation,
        })
    }

    /// Render a report in `format`.
    ///
    /// # Errors
    /// Only non-Markdown formats can fail, since they need a model call.
    pub async fn generate_report(
        &self,
        analysis: &CodeAnalysis,
        format: ReportFormat,
    ) -> Result<String> {
        let report = render_markdown(analysis);
        if format == ReportFormat::Markdown {
            return Ok(report);
        }
        info!(%format, "Converting report");
        let request = format!("Convert this markdown to {format} format:\n\n{report}");
        self.string("convert_format", &request).await
    }
}
