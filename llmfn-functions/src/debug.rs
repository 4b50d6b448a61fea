//! Debug function: error details in, four-section diagnosis out.

use std::fmt;

use llmfn_core::sections::SectionParser;
use llmfn_llm::{ChatBackend, PromptId};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{LlmFunctions, Result};

/// Section headers the debug prompt asks for, in order.
pub const DEBUG_SECTIONS: [&str; 4] = ["ANALYSIS", "ROOT_CAUSE", "FIX", "PREVENTION"];

/// What went wrong, as the caller knows it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Error kind, e.g. `TypeError`.
    pub error_type: String,
    /// Error message.
    pub error_message: String,
    /// Traceback or backtrace text. May be empty.
    #[serde(default)]
    pub traceback: String,
    /// Code around the failure.
    #[serde(default)]
    pub code_snippet: Option<String>,
    /// Variable name / value pairs at the time of failure.
    #[serde(default)]
    pub variables: Vec<(String, String)>,
}

impl ErrorInfo {
    /// Error info with type and message only.
    #[must_use]
    pub fn new(error_type: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            error_type: error_type.into(),
            error_message: error_message.into(),
            ..Self::default()
        }
    }

    /// Attach a traceback.
    #[must_use]
    pub fn with_traceback(mut self, traceback: impl Into<String>) -> Self {
        self.traceback = traceback.into();
        self
    }

    /// Attach the failing code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code_snippet = Some(code.into());
        self
    }

    /// Record a variable's value.
    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.push((name.into(), value.into()));
        self
    }
}

/// The model's diagnosis. Every field is filled; missing sections hold
/// [`MISSING_SECTION`](llmfn_core::sections::MISSING_SECTION).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugReport {
    /// One-line description of the error.
    pub analysis: String,
    /// Why it happened.
    pub root_cause: String,
    /// Code or steps that fix it.
    pub fix: String,
    /// How to avoid it next time, usually a bullet list.
    pub prevention: String,
}

impl DebugReport {
    /// Parse a completion into a report.
    #[must_use]
    pub fn from_completion(raw: &str) -> Self {
        let mut sections = SectionParser::new(DEBUG_SECTIONS).parse(raw);
        Self {
            analysis: sections.take("analysis"),
            root_cause: sections.take("root_cause"),
            fix: sections.take("fix"),
            prevention: sections.take("prevention"),
        }
    }

    /// `(key, content)` pairs in prompt order.
    #[must_use]
    pub fn sections(&self) -> [(&'static str, &str); 4] {
        [
            ("analysis", self.analysis.as_str()),
            ("root_cause", self.root_cause.as_str()),
            ("fix", self.fix.as_str()),
            ("prevention", self.prevention.as_str()),
        ]
    }

    /// How many sections the model actually filled in.
    #[must_use]
    pub fn answered(&self) -> usize {
        self.sections()
            .iter()
            .filter(|(_, v)| *v != llmfn_core::sections::MISSING_SECTION)
            .count()
    }
}

impl fmt::Display for DebugReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, content)) in self.sections().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}:", key.to_uppercase())?;
            writeln!(f, "{content}")?;
        }
        Ok(())
    }
}

/// Lay out error details for the debug prompt.
#[must_use]
pub fn format_error_context(info: &ErrorInfo, context: Option<&str>) -> String {
    let mut out = format!(
        "ERROR DETAILS:\nType: {}\nMessage: {}\n\nTRACEBACK:\n{}\n",
        info.error_type, info.error_message, info.traceback
    );
    if let Some(code) = &info.code_snippet {
        out.push_str(&format!("\nCODE:\n{code}\n"));
    }
    if !info.variables.is_empty() {
        out.push_str("\nVARIABLE STATE:\n");
        for (name, value) in &info.variables {
            out.push_str(&format!("{name} = {value}\n"));
        }
    }
    if let Some(context) = context {
        out.push_str(&format!("\nCONTEXT:\n{context}\n"));
    }
    out
}

impl<B: ChatBackend> LlmFunctions<B> {
    /// Diagnose an error.
    ///
    /// The reply is parsed leniently: sections the model skipped come back
    /// as the missing-section sentinel rather than an error.
    ///
    /// # Errors
    /// Fails if the model call fails or the reply is empty.
    pub async fn debug(&self, info: &ErrorInfo, context: Option<&str>) -> Result<DebugReport> {
        info!(error_type = %info.error_type, "Processing debug analysis");
        let error_context = format_error_context(info, context);
        let raw = self
            .run_prompt("debug", PromptId::Debug, &[("error_context", &error_context)])
            .await?;

        let report = DebugReport::from_completion(&raw);
        let answered = report.answered();
        if answered < DEBUG_SECTIONS.len() {
            warn!(answered, "Debug reply is missing sections");
        }
        info!(answered, "Debug analysis completed");
        Ok(report)
    }
}
