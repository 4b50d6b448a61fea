//! Sectioned text parsing.
//!
//! A prompt asks the model to answer in labelled sections:
//!
//! ```text
//! ANALYSIS:
//! <text>
//!
//! ROOT_CAUSE:
//! <text>
//! ```
//!
//! Models are unreliable about following that layout exactly, so parsing
//! here is total: every expected section comes back, and one the model left
//! out (or left empty) holds [`MISSING_SECTION`].
//!
//! The scanner is a two-state machine over lines:
//!
//! ```text
//!                 header line
//! ScanningForHeader ─────────▶ Accumulating(section)
//!                                 │  ▲
//!                                 └──┘ header line (switch section)
//! ```
//!
//! Non-header lines are discarded while scanning and appended while
//! accumulating. Blank lines are always dropped.

use std::collections::BTreeMap;

use tracing::debug;

use crate::types::SectionedResult;

/// Placeholder stored for a section the model did not provide.
pub const MISSING_SECTION: &str = "No information provided";

/// Normalize a section label: trim, strip one trailing colon, lower-case.
#[must_use]
pub fn normalize_label(label: &str) -> String {
    let label = label.trim();
    label
        .strip_suffix(':')
        .unwrap_or(label)
        .trim_end()
        .to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    ScanningForHeader,
    Accumulating(usize),
}

/// Reusable parser for a fixed set of section labels.
#[derive(Debug, Clone)]
pub struct SectionParser {
    keys: Vec<String>,
}

impl SectionParser {
    /// Build a parser expecting the given labels.
    ///
    /// Labels are case-insensitive and may carry a trailing colon; both
    /// `"ROOT_CAUSE"` and `"root_cause:"` select the same section.
    /// Duplicate labels collapse into one.
    #[must_use]
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keys: Vec<String> = Vec::new();
        for label in labels {
            let key = normalize_label(label.as_ref());
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        Self { keys }
    }

    /// Normalized labels this parser fills in.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Split `raw` into sections. Never fails.
    #[must_use]
    pub fn parse(&self, raw: &str) -> SectionedResult {
        let mut content: Vec<Vec<&str>> = vec![Vec::new(); self.keys.len()];
        let mut state = ScanState::ScanningForHeader;
        let mut discarded = 0usize;

        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(idx) = self.header_index(line) {
                // A repeated header starts that section over.
                content[idx].clear();
                state = ScanState::Accumulating(idx);
                continue;
            }

            match state {
                ScanState::ScanningForHeader => discarded += 1,
                ScanState::Accumulating(idx) => content[idx].push(line),
            }
        }

        let mut missing = 0usize;
        let sections: BTreeMap<String, String> = self
            .keys
            .iter()
            .zip(content)
            .map(|(key, lines)| {
                let value = if lines.is_empty() {
                    missing += 1;
                    MISSING_SECTION.to_string()
                } else {
                    lines.join("\n")
                };
                (key.clone(), value)
            })
            .collect();

        debug!(
            expected = self.keys.len(),
            missing,
            discarded_lines = discarded,
            "Parsed sectioned response"
        );

        SectionedResult::from_map(sections)
    }

    /// Index of the section whose header `line` (already trimmed) is.
    fn header_index(&self, line: &str) -> Option<usize> {
        let label = line.strip_suffix(':')?;
        if label.is_empty() || label.ends_with(char::is_whitespace) {
            return None;
        }
        let label = label.to_lowercase();
        self.keys.iter().position(|k| *k == label)
    }
}

/// Split `raw` into the sections named by `expected`.
///
/// Shorthand for `SectionParser::new(expected).parse(raw)`.
#[must_use]
pub fn parse<I, S>(raw: &str, expected: I) -> SectionedResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    SectionParser::new(expected).parse(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBUG: [&str; 4] = ["ANALYSIS", "ROOT_CAUSE", "FIX", "PREVENTION"];

    #[test]
    fn partial_response_fills_sentinel() {
        let result = parse(
            "ANALYSIS:\nNull pointer\nROOT_CAUSE:\nUninitialized field\n",
            DEBUG,
        );
        assert_eq!(result.get("analysis"), Some("Null pointer"));
        assert_eq!(result.get("root_cause"), Some("Uninitialized field"));
        assert_eq!(result.get("fix"), Some(MISSING_SECTION));
        assert_eq!(result.get("prevention"), Some(MISSING_SECTION));
    }

    #[test]
    fn key_set_matches_expected() {
        let result = parse("nothing useful here", DEBUG);
        let keys: Vec<&str> = result.keys().collect();
        assert_eq!(keys, vec!["analysis", "fix", "prevention", "root_cause"]);
        assert!(result.iter().all(|(_, v)| v == MISSING_SECTION));
    }

    #[test]
    fn multi_line_content_drops_blank_lines() {
        let raw = "FIX:\n  step one  \n\n\n  step two\nPREVENTION:\n- test it\n";
        let result = parse(raw, DEBUG);
        assert_eq!(result.get("fix"), Some("step one\nstep two"));
        assert_eq!(result.get("prevention"), Some("- test it"));
    }

    #[test]
    fn preamble_is_discarded() {
        let raw = "Sure! Here is the analysis.\n\nANALYSIS:\nbad index\n";
        let result = parse(raw, DEBUG);
        assert_eq!(result.get("analysis"), Some("bad index"));
        assert!(result.iter().all(|(_, v)| !v.contains("Sure!")));
    }

    #[test]
    fn out_of_order_sections_are_accepted() {
        let raw = "PREVENTION:\nlint\nANALYSIS:\noops\n";
        let result = parse(raw, DEBUG);
        assert_eq!(result.get("prevention"), Some("lint"));
        assert_eq!(result.get("analysis"), Some("oops"));
    }

    #[test]
    fn headers_tolerate_surrounding_whitespace_and_case() {
        let raw = "   analysis:   \nfirst\n\tFix:\nsecond\n";
        let result = parse(raw, DEBUG);
        assert_eq!(result.get("analysis"), Some("first"));
        assert_eq!(result.get("fix"), Some("second"));
    }

    #[test]
    fn header_with_inline_text_is_content() {
        let raw = "ANALYSIS:\nFIX: not a header\n";
        let result = parse(raw, DEBUG);
        assert_eq!(result.get("analysis"), Some("FIX: not a header"));
        assert_eq!(result.get("fix"), Some(MISSING_SECTION));
    }

    #[test]
    fn space_before_colon_is_not_a_header() {
        let result = parse("FIX :\nsomething\n", DEBUG);
        assert_eq!(result.get("fix"), Some(MISSING_SECTION));
    }

    #[test]
    fn duplicate_header_replaces_earlier_content() {
        let raw = "FIX:\nold\nANALYSIS:\na\nFIX:\nnew\n";
        let result = parse(raw, DEBUG);
        assert_eq!(result.get("fix"), Some("new"));
        assert_eq!(result.get("analysis"), Some("a"));
    }

    #[test]
    fn empty_section_uses_sentinel() {
        let result = parse("ANALYSIS:\n\nROOT_CAUSE:\ncause\n", DEBUG);
        assert_eq!(result.get("analysis"), Some(MISSING_SECTION));
        assert_eq!(result.get("root_cause"), Some("cause"));
    }

    #[test]
    fn unexpected_headers_are_plain_content() {
        let result = parse("ANALYSIS:\nx\nNOTES:\ny\n", DEBUG);
        assert_eq!(result.get("analysis"), Some("x\nNOTES:\ny"));
    }

    #[test]
    fn labels_are_normalized() {
        let parser = SectionParser::new(["Root_Cause:", "ROOT_CAUSE", " fix "]);
        assert_eq!(parser.keys(), ["root_cause".to_string(), "fix".to_string()]);
        assert_eq!(normalize_label("PREVENTION:"), "prevention");
    }

    #[test]
    fn lookup_normalizes_key() {
        let result = parse("ROOT_CAUSE:\nx\n", DEBUG);
        assert_eq!(result.get("ROOT_CAUSE:"), Some("x"));
        assert_eq!(result.get("unknown"), None);
    }

    #[test]
    fn take_falls_back_to_sentinel() {
        let mut result = parse("FIX:\npatch\n", DEBUG);
        assert_eq!(result.take("fix"), "patch");
        assert_eq!(result.take("fix"), MISSING_SECTION);
        assert_eq!(result.take("bogus"), MISSING_SECTION);
    }

    #[test]
    fn crlf_line_endings() {
        let result = parse("ANALYSIS:\r\nwindows\r\n", DEBUG);
        assert_eq!(result.get("analysis"), Some("windows"));
    }

    #[test]
    fn empty_input_and_no_expected_sections() {
        assert!(parse("ANALYSIS:\nx", Vec::<&str>::new()).is_empty());
        assert_eq!(parse("", DEBUG).len(), 4);
    }
}
