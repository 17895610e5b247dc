//! Local authority tables, joined across their percentage and count sheets.

use std::collections::BTreeMap;

use cover_ingest::{DataRow, ExtractedTable, parse_count};
use cover_map::VaccineNameResolver;
use cover_model::{
    DimensionIndex, FactKey, FinancialYear, LoadWarning, Measurement, ReferenceKind,
};

use super::WarningLog;
use super::cells::{
    FactBatch, lookup_cohort, lookup_year, percentage, resolve_vaccine_columns, vaccine_columns,
};

/// Column of each vaccine in the percentage and count sheets.
type SheetColumns = (Option<usize>, Option<usize>);

/// Rows of one area in the percentage and count sheets.
type SheetRows<'t> = (Option<&'t DataRow>, Option<&'t DataRow>);

/// Builds facts from one or both sheets of a local authority table.
///
/// Rows are joined on area code and columns on resolved vaccine, so the
/// sheets may list areas and vaccines in different orders. A sheet without
/// its partner still loads, with only its own measures filled.
pub(super) fn local_authority_facts(
    percentages: Option<&ExtractedTable>,
    counts: Option<&ExtractedTable>,
    fallback_year: FinancialYear,
    resolver: &mut VaccineNameResolver,
    dims: &DimensionIndex,
    warnings: &mut WarningLog,
) -> FactBatch {
    let mut batch = FactBatch::default();
    let Some(primary) = percentages.or(counts) else {
        return batch;
    };
    if percentages.is_none() || counts.is_none() {
        warnings.record(LoadWarning::UnpairedSheet {
            table: primary.source.table_id.to_string(),
        });
    }

    let header_row = primary.header.row;
    let year = primary.source.year.unwrap_or(fallback_year);
    let Some(year_id) = lookup_year(dims, year, header_row, warnings) else {
        return batch;
    };
    let Some(cohort_id) =
        lookup_cohort(dims, primary.source.cohort_months, header_row, warnings)
    else {
        return batch;
    };

    let mut vaccines: BTreeMap<i64, SheetColumns> = BTreeMap::new();
    if let Some(table) = percentages {
        let cols = vaccine_columns(&table.columns);
        for (col, id) in resolve_vaccine_columns(cols, table.header.row, resolver, dims, warnings)
        {
            vaccines.entry(id).or_default().0.get_or_insert(col);
        }
    }
    if let Some(table) = counts {
        let cols = vaccine_columns(&table.columns);
        for (col, id) in resolve_vaccine_columns(cols, table.header.row, resolver, dims, warnings)
        {
            vaccines.entry(id).or_default().1.get_or_insert(col);
        }
    }

    let mut areas: BTreeMap<&str, SheetRows<'_>> = BTreeMap::new();
    for row in percentages.into_iter().flat_map(|table| &table.rows) {
        areas.entry(row.identifier.as_str()).or_default().0.get_or_insert(row);
    }
    for row in counts.into_iter().flat_map(|table| &table.rows) {
        areas.entry(row.identifier.as_str()).or_default().1.get_or_insert(row);
    }

    let population_col = primary.source.kind.layout().population_col;
    for (code, (pct_row, count_row)) in areas {
        batch.rows += 1;
        if dims.area(code).is_none() {
            warnings.record(LoadWarning::UnresolvedReference {
                row: pct_row.or(count_row).map_or(header_row, |row| row.index),
                reference: ReferenceKind::Area,
                value: code.to_string(),
            });
            continue;
        }

        let eligible = population_col.and_then(|col| {
            pct_row
                .and_then(|row| parse_count(row.cell(col)))
                .or_else(|| count_row.and_then(|row| parse_count(row.cell(col))))
        });

        for (&vaccine_id, &(pct_col, count_col)) in &vaccines {
            let coverage_percentage = match (pct_row, pct_col) {
                (Some(row), Some(col)) => percentage(row.cell(col), row.index, col, warnings),
                _ => None,
            };
            let vaccinated_count = match (count_row, count_col) {
                (Some(row), Some(col)) => parse_count(row.cell(col)),
                _ => None,
            };
            batch.push(
                FactKey::LocalAuthority {
                    year_id,
                    area_code: code.to_string(),
                    cohort_id,
                    vaccine_id,
                },
                Measurement {
                    eligible_population: eligible,
                    vaccinated_count,
                    coverage_percentage,
                    coverage_range: None,
                },
            );
        }
    }
    batch
}
