//! Cell value cleaning.
//!
//! Published cells mix plain numbers with thousands separators, percent
//! signs, disclosure markers (`[c]`, `[z]`, `[x]`) and textual ranges. None
//! of these is an error: anything that is not a clean number becomes null.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Cell text meaning "suppressed" or "not applicable".
const NULL_MARKERS: &[&str] = &["[z]", "[c]", "[x]", "nan", ""];

static RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d\s*%?\s*to\s*\d").expect("Invalid range regex"));

/// A cleaned cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Normalized {
    Number(f64),
    Null,
    /// Disclosure range such as `35% to 69%`, kept verbatim.
    Range(String),
}

impl Normalized {
    pub fn number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn range_text(&self) -> Option<&str> {
        match self {
            Self::Range(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Cleans one raw cell.
///
/// Ranges become [`Normalized::Range`] when `keep_range` is set and
/// [`Normalized::Null`] otherwise; they are never parsed as numbers. Parsed
/// numbers are rounded half-up to `decimals` places when given.
pub fn normalize(raw: &str, decimals: Option<u32>, keep_range: bool) -> Normalized {
    let text = raw.trim();

    if NULL_MARKERS
        .iter()
        .any(|marker| text.eq_ignore_ascii_case(marker))
    {
        return Normalized::Null;
    }

    if RANGE.is_match(text) {
        return if keep_range {
            Normalized::Range(text.to_string())
        } else {
            Normalized::Null
        };
    }

    let cleaned: String = text
        .chars()
        .filter(|c| *c != ',' && *c != '%')
        .collect();

    match cleaned.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Normalized::Number(match decimals {
            Some(places) => round_half_up(value, places),
            None => value,
        }),
        _ => Normalized::Null,
    }
}

/// Cleans a cell expected to hold a number.
pub fn parse_number(raw: &str, decimals: Option<u32>) -> Option<f64> {
    normalize(raw, decimals, false).number()
}

/// Cleans a cell expected to hold a whole count, rounding to the nearest
/// integer.
pub fn parse_count(raw: &str) -> Option<i64> {
    let value = parse_number(raw, Some(0))?;
    if value.abs() < 9.0e15 {
        Some(value as i64)
    } else {
        None
    }
}

fn round_half_up(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places.min(15) as i32);
    (value * factor).round() / factor
}
