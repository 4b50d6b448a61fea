//! Configuration for llmfn.
//!
//! Maps directly to `llmfn.toml`. Every field has a default, so an empty
//! file (or no file at all) yields a working local-Ollama setup.
//!
//! ```toml
//! [llm]
//! provider = "ollama"
//! base_url = "http://localhost:11434"
//! model = "smollm2:1.7b"
//!
//! [logging]
//! level = "debug"
//! ```

use serde::{Deserialize, Serialize};

/// Top-level llmfn configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmfnConfig {
    /// Model endpoint settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Log output settings (used by the binary only).
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Defaults for function arguments the caller may omit.
    #[serde(default)]
    pub defaults: FunctionDefaults,
}

impl LlmfnConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `CoreError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::CoreError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Chat and embedding endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider: "ollama", "openai", "none".
    #[serde(default = "default_ollama")]
    pub provider: String,
    /// Base URL for the LLM API, without a trailing `/v1`.
    #[serde(default = "default_ollama_url")]
    pub base_url: String,
    /// API key. Ollama ignores it.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Chat model for text functions.
    #[serde(default = "default_model")]
    pub model: String,
    /// Chat model for the vision function.
    #[serde(default = "default_vision_model")]
    pub vision_model: String,
    /// Model for the embedding function.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    /// Sampling temperature for every call.
    #[serde(default = "default_0_1")]
    pub temperature: f32,
    /// Hard timeout for any LLM call in milliseconds.
    #[serde(default = "default_60000")]
    pub request_timeout_ms: u64,
    /// Directory of versioned TOML prompt files overriding the built-in
    /// prompts. `None` uses the built-ins.
    #[serde(default)]
    pub prompt_dir: Option<std::path::PathBuf>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            api_key: "ollama".to_string(),
            model: "smollm2:1.7b".to_string(),
            vision_model: "llama3.2-vision".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            temperature: 0.1,
            request_timeout_ms: 60_000,
            prompt_dir: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter: trace, debug, info, warn, error. `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Default arguments for functions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefaults {
    /// Language assumed by the code function.
    #[serde(default = "default_language")]
    pub code_language: String,
    /// Design style requested from the web function.
    #[serde(default = "default_style")]
    pub web_style: String,
}

impl Default for FunctionDefaults {
    fn default() -> Self {
        Self {
            code_language: "python".to_string(),
            web_style: "modern".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_ollama() -> String { "ollama".to_string() }
fn default_ollama_url() -> String { "http://localhost:11434".to_string() }
fn default_api_key() -> String { "ollama".to_string() }
fn default_model() -> String { "smollm2:1.7b".to_string() }
fn default_vision_model() -> String { "llama3.2-vision".to_string() }
fn default_embedding_model() -> String { "nomic-embed-text".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_language() -> String { "python".to_string() }
fn default_style() -> String { "modern".to_string() }
fn default_0_1() -> f32 { 0.1 }
fn default_60000() -> u64 { 60_000 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = LlmfnConfig::from_toml("").expect("empty config is valid");
        assert_eq!(config.llm.provider, "ollama");
        assert_eq!(config.llm.base_url, "http://localhost:11434");
        assert_eq!(config.llm.model, "smollm2:1.7b");
        assert_eq!(config.llm.embedding_model, "nomic-embed-text");
        assert!((config.llm.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
        assert_eq!(config.defaults.code_language, "python");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = LlmfnConfig::from_toml(
            r#"
            [llm]
            provider = "openai"
            api_key = "sk-test"

            [logging]
            json = true
            "#,
        )
        .expect("valid config");
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.api_key, "sk-test");
        assert_eq!(config.llm.request_timeout_ms, 60_000);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = LlmfnConfig::from_toml("[llm\nprovider = 3").expect_err("invalid");
        assert!(matches!(err, crate::CoreError::Config(_)));
    }

    #[test]
    fn from_file_reads_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("llmfn.toml");
        std::fs::write(&path, "[defaults]\nweb_style = \"minimal\"\n").expect("write");
        let config = LlmfnConfig::from_file(&path).expect("load");
        assert_eq!(config.defaults.web_style, "minimal");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = LlmfnConfig::from_file(std::path::Path::new("/nonexistent/llmfn.toml"))
            .expect_err("missing");
        assert!(matches!(err, crate::CoreError::Io(_)));
    }
}
