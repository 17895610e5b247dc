//! HepB and BCG programme tables.

use cover_ingest::{ExtractedTable, Normalized, ValueColumns, normalize, parse_count};
use cover_model::{
    DimensionIndex, FactKey, FinancialYear, LoadWarning, Measurement, ReferenceKind,
};

use super::WarningLog;
use super::cells::{FactBatch, PERCENT_DECIMALS, lookup_cohort, lookup_year};

pub(super) fn special_program_facts(
    table: &ExtractedTable,
    fallback_year: FinancialYear,
    dims: &DimensionIndex,
    warnings: &mut WarningLog,
) -> FactBatch {
    let mut batch = FactBatch::default();
    let header_row = table.header.row;

    let Some(program_type) = table.source.program_type() else {
        return batch;
    };
    let year = table.source.year.unwrap_or(fallback_year);
    let Some(year_id) = lookup_year(dims, year, header_row, warnings) else {
        return batch;
    };
    let ValueColumns::ProgramCohorts(groups) = &table.columns else {
        return batch;
    };
    let groups: Vec<_> = groups
        .iter()
        .filter_map(|group| {
            lookup_cohort(dims, Some(group.cohort_months), header_row, warnings)
                .map(|cohort_id| (group, cohort_id))
        })
        .collect();

    for row in &table.rows {
        batch.rows += 1;
        let Some(area) = dims.area(&row.identifier) else {
            warnings.record(LoadWarning::UnresolvedReference {
                row: row.index,
                reference: ReferenceKind::Area,
                value: row.identifier.clone(),
            });
            continue;
        };

        for &(group, cohort_id) in &groups {
            let col = group.coverage_col;
            let (coverage_percentage, coverage_range) =
                match normalize(row.cell(col), Some(PERCENT_DECIMALS), true) {
                    Normalized::Number(value) if (0.0..=100.0).contains(&value) => {
                        (Some(value), None)
                    }
                    Normalized::Number(value) => {
                        warnings.record(LoadWarning::OutOfRangePercentage {
                            row: row.index,
                            column: col,
                            value,
                        });
                        (None, None)
                    }
                    Normalized::Range(text) => (None, Some(text)),
                    Normalized::Null => (None, None),
                };

            batch.push(
                FactKey::SpecialProgram {
                    year_id,
                    area_code: area.area_code.clone(),
                    program_type,
                    cohort_id,
                },
                Measurement {
                    eligible_population: group
                        .eligible_col
                        .and_then(|col| parse_count(row.cell(col))),
                    vaccinated_count: group
                        .vaccinated_col
                        .and_then(|col| parse_count(row.cell(col))),
                    coverage_percentage,
                    coverage_range,
                },
            );
        }
    }
    batch
}
