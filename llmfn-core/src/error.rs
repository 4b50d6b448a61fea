//! Error types for the llmfn core library.

use thiserror::Error;

/// A completion did not follow the block layout the prompt asked for.
///
/// Raised by [`crate::blocks::extract`]. The caller should surface this to
/// the user rather than guess at the missing content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A delimiter was not found anywhere in the completion.
    #[error("Invalid response format: marker '{marker}' not found")]
    MissingMarker {
        /// The delimiter that was searched for.
        marker: String,
    },

    /// Both delimiters exist, but the second never follows the first.
    #[error("Invalid response format: '{second}' does not follow '{first}'")]
    MarkersOutOfOrder {
        /// The delimiter expected first.
        first: String,
        /// The delimiter expected second.
        second: String,
    },

    /// A block was present but held only whitespace.
    #[error("Invalid response format: '{block}' block is empty")]
    EmptyBlock {
        /// Name of the empty block.
        block: String,
    },
}

/// Top-level error type for core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A completion violated its output contract.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, CoreError>;
