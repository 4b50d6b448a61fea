//! Delimited block extraction.
//!
//! Some prompts ask for two artifacts in one completion, each introduced by a
//! literal marker line:
//!
//! ```text
//! ---HTML---
//! <div class="card">...</div>
//! ---CSS---
//! .card { ... }
//! ```
//!
//! Both blocks are required. A completion without either marker, or with the
//! markers reversed, is rejected with a [`FormatError`] instead of being
//! patched up, since half a component is not usable.

use tracing::debug;

use crate::error::FormatError;
use crate::types::BlockPair;

/// Cut the two blocks out of `raw`.
///
/// The first block runs from the first `first_marker` to the nearest
/// `second_marker` after it; the second block runs from there to the end of
/// the text. Both are trimmed. Block text may span lines.
///
/// # Errors
///
/// - [`FormatError::MissingMarker`] if either marker never appears.
/// - [`FormatError::MarkersOutOfOrder`] if `second_marker` only appears
///   before `first_marker`.
/// - [`FormatError::EmptyBlock`] if a block is blank after trimming. The
///   block is named by the marker that opens it.
pub fn extract(
    raw: &str,
    first_marker: &str,
    second_marker: &str,
) -> Result<BlockPair, FormatError> {
    let Some(first_start) = raw.find(first_marker) else {
        return Err(FormatError::MissingMarker {
            marker: first_marker.to_string(),
        });
    };
    if !raw.contains(second_marker) {
        return Err(FormatError::MissingMarker {
            marker: second_marker.to_string(),
        });
    }

    let after_first = &raw[first_start + first_marker.len()..];
    let Some(second_offset) = after_first.find(second_marker) else {
        return Err(FormatError::MarkersOutOfOrder {
            first: first_marker.to_string(),
            second: second_marker.to_string(),
        });
    };

    let first = after_first[..second_offset].trim();
    let second = after_first[second_offset + second_marker.len()..].trim();

    if first.is_empty() {
        return Err(FormatError::EmptyBlock {
            block: first_marker.to_string(),
        });
    }
    if second.is_empty() {
        return Err(FormatError::EmptyBlock {
            block: second_marker.to_string(),
        });
    }

    debug!(
        first_len = first.len(),
        second_len = second.len(),
        "Extracted delimited blocks"
    );

    Ok(BlockPair {
        first: first.to_string(),
        second: second.to_string(),
    })
}
