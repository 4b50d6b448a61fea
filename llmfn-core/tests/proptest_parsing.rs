//! Property-Based Tests for the parsing layer
//!
//! Uses `proptest` to check that section parsing is total and faithful, and
//! that block extraction and markup checks behave on arbitrary input.

use std::collections::BTreeSet;

use proptest::prelude::*;

use llmfn_core::blocks;
use llmfn_core::markup;
use llmfn_core::sections::{self, MISSING_SECTION};

const LABELS: [&str; 6] = ["ANALYSIS", "ROOT_CAUSE", "FIX", "PREVENTION", "SUMMARY", "NOTES"];

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_labels() -> impl Strategy<Value = Vec<&'static str>> {
    proptest::sample::subsequence(LABELS.to_vec(), 0..=LABELS.len())
}

/// A content line that can never be mistaken for a header.
fn arb_content_line() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9 .,()=-]{0,30}[a-z0-9.)]"
}

// ---------------------------------------------------------------------------
// Property: parse is total and its key set is the normalized expected set
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn parse_key_set_equals_expected(raw in any::<String>(), labels in arb_labels()) {
        let result = sections::parse(&raw, &labels);
        let keys: BTreeSet<&str> = result.keys().collect();
        let expected: BTreeSet<String> = labels.iter().map(|l| l.to_lowercase()).collect();
        let expected: BTreeSet<&str> = expected.iter().map(String::as_str).collect();
        prop_assert_eq!(keys, expected);
    }

    #[test]
    fn parse_values_are_never_empty(raw in ".{0,200}", labels in arb_labels()) {
        let result = sections::parse(&raw, &labels);
        for (_, value) in result.iter() {
            prop_assert!(!value.is_empty());
        }
    }
}

// ---------------------------------------------------------------------------
// Property: well-formed responses round-trip to their content lines
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn well_formed_sections_are_recovered(
        bodies in proptest::collection::vec(
            proptest::collection::vec(arb_content_line(), 1..4),
            4,
        ),
        blank_padding in 0usize..3,
    ) {
        let labels = ["ANALYSIS", "ROOT_CAUSE", "FIX", "PREVENTION"];
        let mut raw = String::new();
        for (label, lines) in labels.iter().zip(&bodies) {
            raw.push_str(label);
            raw.push_str(":\n");
            for line in lines {
                raw.push_str(line);
                raw.push('\n');
                raw.push_str(&"\n".repeat(blank_padding));
            }
        }

        let result = sections::parse(&raw, labels);
        for (label, lines) in labels.iter().zip(&bodies) {
            let expected: Vec<&str> = lines.iter().map(|l| l.trim()).collect();
            let expected_joined = expected.join("\n");
            prop_assert_eq!(result.get(label), Some(expected_joined.as_str()));
        }
    }

    #[test]
    fn omitted_section_is_sentinel(line in arb_content_line()) {
        let raw = format!("ANALYSIS:\n{line}\n");
        let result = sections::parse(&raw, ["ANALYSIS", "FIX"]);
        prop_assert_eq!(result.get("fix"), Some(MISSING_SECTION));
    }
}

// ---------------------------------------------------------------------------
// Property: block extraction
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn ordered_markers_extract_trimmed_blocks(
        html in "[a-z<>/ ]{0,20}[a-z<>/]",
        css in "[a-z{}:; ]{0,20}[a-z{};]",
        pad in "[ \n\t]{0,4}",
    ) {
        let raw = format!("---HTML---{pad}{html}{pad}---CSS---{pad}{css}{pad}");
        let pair = blocks::extract(&raw, "---HTML---", "---CSS---")
            .expect("both markers present with content");
        prop_assert_eq!(pair.first, html.trim());
        prop_assert_eq!(pair.second, css.trim());
    }

    #[test]
    fn text_without_markers_is_rejected(raw in "[^-]{0,100}") {
        prop_assert!(blocks::extract(&raw, "---HTML---", "---CSS---").is_err());
    }
}

// ---------------------------------------------------------------------------
// Property: markup validation never fails and counts images exactly
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn markup_validation_is_total(html in ".{0,200}") {
        let report = markup::validate(&html);
        prop_assert!(report.valid_html);
    }

    #[test]
    fn one_warning_per_unlabelled_image(with_alt in 0usize..5, without_alt in 0usize..5) {
        let mut html = String::from("<div>");
        for i in 0..with_alt {
            html.push_str(&format!(r#"<img src="{i}.png" alt="picture {i}">"#));
        }
        for i in 0..without_alt {
            html.push_str(&format!(r#"<img src="x{i}.png">"#));
        }
        html.push_str("</div>");
        let report = markup::validate(&html);
        prop_assert_eq!(report.accessibility.len(), without_alt);
    }
}
