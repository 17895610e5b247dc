//! Storage seam between the loader and the normalized store.

use crate::dimension::{AgeCohort, FinancialYear, GeographicArea, Vaccine};
use crate::fact::{CoverageFact, UpsertOutcome};
use crate::index::DimensionIndex;

/// Write access to the normalized store within one unit of work.
///
/// Dimension writes are create-if-absent and return whether a row was
/// created. Fact writes are upserts keyed on [`crate::FactKey`]: a second
/// write to the same key updates the row in place.
pub trait CoverageWriter {
    type Error: std::error::Error + Send + Sync + 'static;

    fn ensure_area(&mut self, area: &GeographicArea) -> Result<bool, Self::Error>;

    fn ensure_vaccine(&mut self, vaccine: &Vaccine) -> Result<bool, Self::Error>;

    fn ensure_cohort(&mut self, cohort: &AgeCohort) -> Result<bool, Self::Error>;

    fn ensure_year(&mut self, year: &FinancialYear) -> Result<bool, Self::Error>;

    /// Snapshot of every dimension row currently visible.
    fn dimensions(&self) -> Result<DimensionIndex, Self::Error>;

    fn upsert_fact(&mut self, fact: &CoverageFact) -> Result<UpsertOutcome, Self::Error>;

    /// Overwrites the measured fields of an existing fact. Writes nothing
    /// and returns false when no row has this key.
    fn update_fact(&mut self, fact: &CoverageFact) -> Result<bool, Self::Error>;
}
