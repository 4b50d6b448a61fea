//! Accessibility checks for generated HTML fragments.
//!
//! The fragment is parsed with `scraper` (html5ever underneath), which is as
//! forgiving as a browser: unclosed tags are closed, unknown tags are kept.
//! Scripting is turned off while parsing, so `<noscript>` content is markup
//! like everything else.
//!
//! The tree is then walked in tree order and each element is checked on its
//! own. Tree order is the order after html5ever's error recovery, which can
//! differ from source order: content misplaced inside a `<table>` is
//! foster-parented in front of the table, so its warnings come first.
//!
//! Checks:
//!   - `<img>` needs a non-empty `alt`
//!   - `<input>` needs a non-empty `aria-label` or `placeholder`

use html5ever::driver::{self, ParseOpts};
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{QualName, local_name, namespace_url, ns};
use scraper::{ElementRef, Html};
use tracing::debug;

use crate::types::ValidationReport;

/// Warning for an image without alternative text.
pub const IMAGE_MISSING_ALT: &str = "Image missing alt text";

/// Warning for an input with no accessible label.
pub const INPUT_MISSING_LABEL: &str = "Input missing label or placeholder";

/// Check an HTML fragment. Never fails and never touches the input.
///
/// `valid_html` is always `true`; no structural validation is performed.
#[must_use]
pub fn validate(html: &str) -> ValidationReport {
    let fragment = parse_fragment(html);
    let mut report = ValidationReport::default();
    let mut elements = 0usize;

    for node in fragment.tree.root().descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        elements += 1;

        match element.value().name() {
            "img" if !has_value(element, "alt") => {
                report.accessibility.push(IMAGE_MISSING_ALT.to_string());
            }
            "input" if !has_value(element, "aria-label") && !has_value(element, "placeholder") => {
                report.accessibility.push(INPUT_MISSING_LABEL.to_string());
            }
            _ => {}
        }
    }

    debug!(
        elements,
        accessibility_warnings = report.accessibility.len(),
        "Validated markup"
    );

    report
}

/// `Html::parse_fragment` with scripting disabled.
fn parse_fragment(html: &str) -> Html {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..TreeBuilderOpts::default()
        },
        ..ParseOpts::default()
    };
    driver::parse_fragment(
        Html::new_fragment(),
        opts,
        QualName::new(None, ns!(html), local_name!("body")),
        Vec::new(),
    )
    .one(html)
}

fn has_value(element: ElementRef<'_>, attr: &str) -> bool {
    element.value().attr(attr).is_some_and(|v| !v.is_empty())
}
