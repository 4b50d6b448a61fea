//! Result types produced by the parsing layer.
//!
//! All of these are built fresh per call and handed to the caller; nothing
//! here is shared or persisted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SectionedResult
// ---------------------------------------------------------------------------

/// Section contents keyed by normalized section name.
///
/// Keys are lower-case with no trailing colon. The key set is fixed by the
/// caller's list of expected sections, so a lookup for any of those names
/// always succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionedResult {
    sections: BTreeMap<String, String>,
}

impl SectionedResult {
    pub(crate) fn from_map(sections: BTreeMap<String, String>) -> Self {
        Self { sections }
    }

    /// Content of a section. `key` is normalized the same way headers are.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.sections
            .get(&crate::sections::normalize_label(key))
            .map(String::as_str)
    }

    /// Like [`get`](Self::get), but yields an owned string and falls back to
    /// the missing-section sentinel for keys outside the expected set.
    #[must_use]
    pub fn take(&mut self, key: &str) -> String {
        self.sections
            .remove(&crate::sections::normalize_label(key))
            .unwrap_or_else(|| crate::sections::MISSING_SECTION.to_string())
    }

    /// Iterate `(key, content)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Normalized section names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether no sections were requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Unwrap into the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.sections
    }
}

// ---------------------------------------------------------------------------
// BlockPair
// ---------------------------------------------------------------------------

/// Two trimmed, non-empty blocks cut out of a completion.
///
/// For web components `first` is the markup and `second` the stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPair {
    /// Content between the first and second delimiter.
    pub first: String,
    /// Content after the second delimiter.
    pub second: String,
}

// ---------------------------------------------------------------------------
// ValidationReport
// ---------------------------------------------------------------------------

/// Outcome of checking an HTML fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Structural validity. Currently never set to `false`.
    pub valid_html: bool,
    /// General warnings.
    pub warnings: Vec<String>,
    /// Accessibility warnings, in parsed tree order.
    pub accessibility: Vec<String>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self {
            valid_html: true,
            warnings: Vec::new(),
            accessibility: Vec::new(),
        }
    }
}

impl ValidationReport {
    /// Whether the fragment produced no warnings of any kind.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.accessibility.is_empty()
    }
}
