//! # llmfn Core Library
//!
//! Turns free-text model completions into typed results.
//!
//! Every llmfn function sends a templated prompt to a chat model and gets
//! back plain text. This crate owns the part that happens after the text
//! arrives:
//!
//! - **Sections** — split a completion into named `LABEL:` sections
//!   ([`sections::parse`]). Missing sections fall back to a sentinel.
//! - **Blocks** — pull two delimiter-bounded blocks out of a completion
//!   ([`blocks::extract`]). A missing delimiter is a hard [`FormatError`].
//! - **Markup** — walk an HTML fragment and report accessibility gaps
//!   ([`markup::validate`]). Never fails.
//!
//! ## Error policy
//!
//! ```text
//! sections  — fallback-on-missing (sentinel)   total over any input
//! blocks    — fail-fast-on-missing             Err(FormatError)
//! markup    — observational                    always a report
//! ```
//!
//! Nothing here does I/O except [`config::LlmfnConfig::from_file`]; all
//! parsing is pure and safe to call from any thread.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod blocks;
pub mod config;
pub mod error;
pub mod markup;
pub mod sections;
pub mod types;

pub use config::LlmfnConfig;
pub use error::{CoreError, FormatError};
pub use types::*;
