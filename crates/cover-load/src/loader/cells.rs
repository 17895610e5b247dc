//! Cell and reference helpers shared by the layout strategies.

use tracing::debug;

use cover_ingest::{ValueColumn, ValueColumns, parse_number};
use cover_map::VaccineNameResolver;
use cover_model::{
    CoverageFact, DimensionIndex, FactKey, FinancialYear, LoadWarning, Measurement, ReferenceKind,
};

use super::WarningLog;

/// Decimal places kept for coverage percentages.
pub const PERCENT_DECIMALS: u32 = 2;

/// Parses a coverage percentage.
///
/// Returns `Ok(None)` for empty or suppressed cells and `Err(value)` for a
/// number outside `[0, 100]`.
pub fn bounded_percentage(raw: &str) -> Result<Option<f64>, f64> {
    match parse_number(raw, Some(PERCENT_DECIMALS)) {
        Some(value) if !(0.0..=100.0).contains(&value) => Err(value),
        parsed => Ok(parsed),
    }
}

/// [`bounded_percentage`], recording out-of-range values as warnings.
pub(super) fn percentage(
    raw: &str,
    row: usize,
    column: usize,
    warnings: &mut WarningLog,
) -> Option<f64> {
    match bounded_percentage(raw) {
        Ok(value) => value,
        Err(value) => {
            warnings.record(LoadWarning::OutOfRangePercentage { row, column, value });
            None
        }
    }
}

/// Facts built for one load unit, before writing.
#[derive(Debug, Default)]
pub(super) struct FactBatch {
    pub facts: Vec<CoverageFact>,
    /// Cells with nothing measured. These never create a row but do
    /// overwrite one loaded from an earlier release.
    pub suppressed: Vec<CoverageFact>,
    pub rows: usize,
}

impl FactBatch {
    pub fn push(&mut self, key: FactKey, measurement: Measurement) {
        let fact = CoverageFact { key, measurement };
        if fact.measurement.is_suppressed() {
            self.suppressed.push(fact);
        } else {
            self.facts.push(fact);
        }
    }
}

pub(super) fn lookup_year(
    dims: &DimensionIndex,
    year: FinancialYear,
    row: usize,
    warnings: &mut WarningLog,
) -> Option<i64> {
    let label = year.label();
    let id = dims.year_id(&label);
    if id.is_none() {
        warnings.record(LoadWarning::UnresolvedReference {
            row,
            reference: ReferenceKind::Year,
            value: label,
        });
    }
    id
}

pub(super) fn lookup_cohort(
    dims: &DimensionIndex,
    months: Option<u32>,
    row: usize,
    warnings: &mut WarningLog,
) -> Option<i64> {
    let id = months.and_then(|months| dims.cohort_id(months));
    if id.is_none() {
        warnings.record(LoadWarning::UnresolvedReference {
            row,
            reference: ReferenceKind::Cohort,
            value: months.map_or_else(|| "none".to_string(), |m| format!("{m} months")),
        });
    }
    id
}

/// Financial year in a row identifier such as `2009 to 2010` or
/// `2009-2010 (provisional)`.
pub(super) fn row_year(identifier: &str) -> Option<FinancialYear> {
    identifier.parse().ok().or_else(|| {
        identifier
            .get(..4)?
            .parse()
            .ok()
            .and_then(FinancialYear::checked_starting)
    })
}

/// Vaccine columns of a table, or none for other axes.
pub(super) fn vaccine_columns(columns: &ValueColumns) -> &[ValueColumn] {
    match columns {
        ValueColumns::Vaccines(cols) => cols,
        _ => &[],
    }
}

/// Resolves each vaccine column to a vaccine id as `(column, vaccine_id)`.
///
/// Headers that match no vaccine, or a vaccine that is not loaded, are
/// warned about and dropped.
pub(super) fn resolve_vaccine_columns(
    columns: &[ValueColumn],
    header_row: usize,
    resolver: &mut VaccineNameResolver,
    dims: &DimensionIndex,
    warnings: &mut WarningLog,
) -> Vec<(usize, i64)> {
    let mut resolved = Vec::with_capacity(columns.len());
    for column in columns {
        let Some(code) = resolver.resolve(&column.header) else {
            warnings.record(LoadWarning::UnresolvedColumn {
                column: column.index,
                header: column.header.clone(),
            });
            continue;
        };
        match dims.vaccine_id(code) {
            Some(id) => {
                debug!(column = column.index, header = %column.header, code, "Resolved column");
                resolved.push((column.index, id));
            }
            None => warnings.record(LoadWarning::UnresolvedReference {
                row: header_row,
                reference: ReferenceKind::Vaccine,
                value: code.to_string(),
            }),
        }
    }
    resolved
}
