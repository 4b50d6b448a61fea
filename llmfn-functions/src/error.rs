//! Function-level error type.

use llmfn_core::{CoreError, FormatError};
use llmfn_llm::LlmError;
use thiserror::Error;

/// Everything a function call can fail with.
#[derive(Debug, Error)]
pub enum FunctionError {
    /// The model call itself failed.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The completion did not have the shape the function asked for.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Reading an input file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The model answered with nothing but whitespace.
    #[error("model returned an empty response for {function}")]
    EmptyResponse {
        /// Which function made the call.
        function: &'static str,
    },
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, FunctionError>;
