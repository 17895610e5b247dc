//! Header to vaccine code resolution.

use std::collections::BTreeMap;

use rapidfuzz::distance::indel;
use serde::Serialize;
use tracing::{debug, trace};

use crate::canonical::{CANONICAL_VACCINES, CanonicalVaccine};
use crate::clean::clean_header;
use crate::error::{MapError, Result};

/// Minimum similarity for a fuzzy match.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.80;

/// How a header was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Exact,
    Alias,
    Fuzzy,
}

/// Outcome of resolving one header.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Matched {
        vaccine_code: &'static str,
        method: MatchMethod,
        /// Similarity in `[0, 1]`; 1 for exact and alias matches.
        score: f64,
    },
    /// No canonical vaccine reached the threshold. The best candidate is
    /// reported for diagnostics only.
    Unresolved {
        cleaned: String,
        best_candidate: Option<&'static str>,
        best_score: f64,
    },
}

impl Resolution {
    pub fn vaccine_code(&self) -> Option<&'static str> {
        match self {
            Self::Matched { vaccine_code, .. } => Some(*vaccine_code),
            Self::Unresolved { .. } => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

/// Lookup counters for one resolver instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolverStats {
    pub lookups: usize,
    pub cache_hits: usize,
    pub exact: usize,
    pub alias: usize,
    pub fuzzy: usize,
    pub unresolved: usize,
}

/// Resolves free-text column headers to canonical vaccine codes.
///
/// Matching runs on the cleaned header in order: exact canonical name,
/// registered alias, then fuzzy similarity against every canonical name.
/// A fuzzy match is accepted only at or above the threshold; candidates
/// are scanned in ascending code order and only a strictly higher score
/// replaces the current best, so ties resolve to the lowest code.
///
/// Every raw header is cached after its first lookup, resolved or not.
#[derive(Debug, Clone)]
pub struct VaccineNameResolver {
    table: &'static [CanonicalVaccine],
    names: BTreeMap<&'static str, &'static str>,
    aliases: BTreeMap<&'static str, &'static str>,
    candidates: Vec<(&'static str, String)>,
    threshold: f64,
    cache: BTreeMap<String, Resolution>,
    stats: ResolverStats,
}

impl Default for VaccineNameResolver {
    fn default() -> Self {
        Self::build(CANONICAL_VACCINES, DEFAULT_FUZZY_THRESHOLD)
    }
}

impl VaccineNameResolver {
    /// Resolver over the canonical vaccine table with the default threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver over the canonical vaccine table with a custom threshold.
    pub fn with_threshold(threshold: f64) -> Result<Self> {
        Self::with_table(CANONICAL_VACCINES, threshold)
    }

    pub fn with_table(table: &'static [CanonicalVaccine], threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(MapError::InvalidThreshold(threshold));
        }
        Ok(Self::build(table, threshold))
    }

    fn build(table: &'static [CanonicalVaccine], threshold: f64) -> Self {
        let names = table.iter().map(|v| (v.name, v.code)).collect();
        let aliases = table
            .iter()
            .flat_map(|v| v.aliases.iter().map(move |alias| (*alias, v.code)))
            .collect();
        let mut candidates: Vec<(&'static str, String)> = table
            .iter()
            .map(|v| (v.code, v.name.to_lowercase()))
            .collect();
        candidates.sort_by(|a, b| a.0.cmp(b.0));

        Self {
            table,
            names,
            aliases,
            candidates,
            threshold,
            cache: BTreeMap::new(),
            stats: ResolverStats::default(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn table(&self) -> &'static [CanonicalVaccine] {
        self.table
    }

    pub fn stats(&self) -> ResolverStats {
        self.stats
    }

    /// Resolves a raw header, returning the vaccine code if matched.
    pub fn resolve(&mut self, raw_header: &str) -> Option<&'static str> {
        self.resolve_detailed(raw_header).vaccine_code()
    }

    /// Resolves a raw header with match details.
    pub fn resolve_detailed(&mut self, raw_header: &str) -> Resolution {
        self.stats.lookups += 1;
        if let Some(cached) = self.cache.get(raw_header) {
            self.stats.cache_hits += 1;
            return cached.clone();
        }

        let resolution = self.lookup(raw_header);
        match &resolution {
            Resolution::Matched { method, .. } => match method {
                MatchMethod::Exact => self.stats.exact += 1,
                MatchMethod::Alias => self.stats.alias += 1,
                MatchMethod::Fuzzy => self.stats.fuzzy += 1,
            },
            Resolution::Unresolved { .. } => self.stats.unresolved += 1,
        }
        debug!(header = raw_header, ?resolution, "Resolved vaccine header");

        self.cache.insert(raw_header.to_string(), resolution.clone());
        resolution
    }

    fn lookup(&self, raw_header: &str) -> Resolution {
        let cleaned = clean_header(raw_header);

        if let Some(code) = self.names.get(cleaned.as_str()) {
            return Resolution::Matched {
                vaccine_code: *code,
                method: MatchMethod::Exact,
                score: 1.0,
            };
        }

        if let Some(code) = self.aliases.get(cleaned.as_str()) {
            return Resolution::Matched {
                vaccine_code: *code,
                method: MatchMethod::Alias,
                score: 1.0,
            };
        }

        let (best_candidate, best_score) = self.best_fuzzy(&cleaned);
        match best_candidate {
            Some(code) if best_score >= self.threshold => Resolution::Matched {
                vaccine_code: code,
                method: MatchMethod::Fuzzy,
                score: best_score,
            },
            _ => Resolution::Unresolved {
                cleaned,
                best_candidate,
                best_score,
            },
        }
    }

    fn best_fuzzy(&self, cleaned: &str) -> (Option<&'static str>, f64) {
        let lowered = cleaned.to_lowercase();
        let mut best: (Option<&'static str>, f64) = (None, 0.0);
        for (code, name) in &self.candidates {
            let score = similarity(&lowered, name);
            trace!(code = *code, score, "Fuzzy candidate");
            if score > best.1 {
                best = (Some(*code), score);
            }
        }
        best
    }
}

/// Normalized Indel similarity, `2 * LCS / (len(a) + len(b))`.
pub fn similarity(a: &str, b: &str) -> f64 {
    indel::normalized_similarity(a.chars(), b.chars())
}
