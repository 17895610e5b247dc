//! Header boilerplate removal.

use std::sync::LazyLock;

use regex::Regex;

/// Cohort and measure phrases that precede vaccine names, such as
/// `Coverage at 12 months ` or `Number aged 5 years `.
static MEASURE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:coverage (?:at|of)|number (?:aged|vaccinated(?: at)?))\s+(?:\d+\s+(?:months?|years?)\s*)?",
    )
    .expect("Invalid measure prefix regex")
});

/// Strips measure prefixes, `Prim` and `(%)` suffixes, and collapses any
/// rotavirus spelling to `Rotavirus`.
pub fn clean_header(raw: &str) -> String {
    let cleaned = MEASURE_PREFIX.replace_all(raw.trim(), "");
    let cleaned = cleaned
        .replace(" Prim", "")
        .replace(" (%)", "")
        .replace("(%)", "");

    if cleaned.to_lowercase().contains("rotavirus") {
        return "Rotavirus".to_string();
    }

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
