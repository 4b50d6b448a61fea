//! Integration Tests — End-to-End Parsing Flows
//!
//! These tests feed realistic model completions through the parsing layer
//! the way the function crate does: debug reports through the section
//! parser, web components through block extraction and markup checks.

use llmfn_core::blocks;
use llmfn_core::error::FormatError;
use llmfn_core::markup::{self, IMAGE_MISSING_ALT, INPUT_MISSING_LABEL};
use llmfn_core::sections::{self, MISSING_SECTION};

const DEBUG_SECTIONS: [&str; 4] = ["ANALYSIS", "ROOT_CAUSE", "FIX", "PREVENTION"];

// ---------------------------------------------------------------------------
// Debug report completions
// ---------------------------------------------------------------------------

#[test]
fn full_debug_completion() {
    let completion = r#"
ANALYSIS:
IndexError raised when accessing numbers[5] on a list of length 3.

ROOT_CAUSE:
The index is hard-coded and exceeds the list bounds.

FIX:
if len(numbers) > 5:
    print(numbers[5])

PREVENTION:
- Validate indices against len() before access
- Prefer iteration over manual indexing
"#;

    let result = sections::parse(completion, DEBUG_SECTIONS);
    assert_eq!(result.len(), 4);
    assert_eq!(
        result.get("analysis"),
        Some("IndexError raised when accessing numbers[5] on a list of length 3.")
    );
    assert_eq!(
        result.get("root_cause"),
        Some("The index is hard-coded and exceeds the list bounds.")
    );
    // Lines are trimmed, so code indentation is not preserved.
    assert_eq!(
        result.get("fix"),
        Some("if len(numbers) > 5:\nprint(numbers[5])")
    );
    assert_eq!(
        result.get("prevention"),
        Some("- Validate indices against len() before access\n- Prefer iteration over manual indexing")
    );
}

#[test]
fn chatty_model_with_markdown_headers() {
    // Bold headers are not recognized; everything collapses to the sentinel.
    let completion = "Here's my analysis:\n\n**ANALYSIS:** the list is short\n**FIX:** check bounds";
    let result = sections::parse(completion, DEBUG_SECTIONS);
    assert!(result.iter().all(|(_, v)| v == MISSING_SECTION));
}

#[test]
fn null_pointer_partial_completion() {
    let result = sections::parse(
        "ANALYSIS:\nNull pointer\nROOT_CAUSE:\nUninitialized field\n",
        DEBUG_SECTIONS,
    );
    let map = result.into_inner();
    assert_eq!(map["analysis"], "Null pointer");
    assert_eq!(map["root_cause"], "Uninitialized field");
    assert_eq!(map["fix"], MISSING_SECTION);
    assert_eq!(map["prevention"], MISSING_SECTION);
}

// ---------------------------------------------------------------------------
// Web component completions
// ---------------------------------------------------------------------------

#[test]
fn login_form_component() {
    let completion = r#"---HTML---
<form class="login-form">
    <input type="email" placeholder="Email" required>
    <input type="password" required>
    <img src="logo.svg">
    <button type="submit">Login</button>
</form>
---CSS---
.login-form {
    display: flex;
    flex-direction: column;
}"#;

    let pair = blocks::extract(completion, "---HTML---", "---CSS---").expect("well-formed");
    assert!(pair.first.starts_with("<form"));
    assert!(pair.first.ends_with("</form>"));
    assert!(pair.second.starts_with(".login-form"));

    let report = markup::validate(&pair.first);
    assert!(report.valid_html);
    assert!(report.warnings.is_empty());
    assert_eq!(
        report.accessibility,
        vec![INPUT_MISSING_LABEL.to_string(), IMAGE_MISSING_ALT.to_string()]
    );
}

#[test]
fn completion_wrapped_in_code_fence() {
    // The fence closes after the CSS, so it ends up inside the second block.
    let completion = "```\n---HTML---\n<p>hi</p>\n---CSS---\np { color: red; }\n```";
    let pair = blocks::extract(completion, "---HTML---", "---CSS---").expect("markers present");
    assert_eq!(pair.first, "<p>hi</p>");
    assert_eq!(pair.second, "p { color: red; }\n```");
}

#[test]
fn html_only_completion_is_rejected() {
    let completion = "<div class=\"card\"><img src=\"a.png\"></div>";
    let err = blocks::extract(completion, "---HTML---", "---CSS---").expect_err("no markers");
    assert_eq!(
        err,
        FormatError::MissingMarker {
            marker: "---HTML---".to_string()
        }
    );
}

#[test]
fn validation_report_serializes() {
    let report = markup::validate(r#"<img src="a.png">"#);
    let rendered = toml::to_string(&report).expect("report is serializable");
    assert!(rendered.contains("valid_html = true"));
    assert!(rendered.contains("Image missing alt text"));
}
