//! Footnote marker removal.

use std::sync::LazyLock;

use regex::Regex;

static NOTE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*\[note \d+\]").expect("Invalid note marker regex"));

/// Removes `[note N]` markers and surrounding whitespace.
pub fn strip_notes(text: &str) -> String {
    NOTE_MARKER.replace_all(text, "").trim().to_string()
}
