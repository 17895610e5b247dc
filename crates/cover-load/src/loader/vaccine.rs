//! Layouts with one column per vaccine and one row per country or year.

use cover_ingest::{ExtractedTable, parse_count};
use cover_map::VaccineNameResolver;
use cover_model::{
    AreaType, DimensionIndex, FactKey, FinancialYear, LoadWarning, Measurement, ReferenceKind,
};

use super::WarningLog;
use super::cells::{
    FactBatch, lookup_cohort, lookup_year, percentage, resolve_vaccine_columns, row_year,
    vaccine_columns,
};

/// National tables: one row per country, year and cohort fixed per file.
pub(super) fn national_facts(
    table: &ExtractedTable,
    year: FinancialYear,
    resolver: &mut VaccineNameResolver,
    dims: &DimensionIndex,
    warnings: &mut WarningLog,
) -> FactBatch {
    let mut batch = FactBatch::default();
    let layout = table.source.kind.layout();
    let header_row = table.header.row;

    let Some(year_id) = lookup_year(dims, year, header_row, warnings) else {
        return batch;
    };
    let Some(cohort_id) = lookup_cohort(dims, table.source.cohort_months, header_row, warnings)
    else {
        return batch;
    };
    let columns = resolve_vaccine_columns(
        vaccine_columns(&table.columns),
        header_row,
        resolver,
        dims,
        warnings,
    );

    for row in &table.rows {
        batch.rows += 1;
        let Some(area) = dims.area_by_name(&row.identifier, AreaType::Country) else {
            warnings.record(LoadWarning::UnresolvedReference {
                row: row.index,
                reference: ReferenceKind::Area,
                value: row.identifier.clone(),
            });
            continue;
        };
        let eligible = layout.population_col.and_then(|col| parse_count(row.cell(col)));

        for &(col, vaccine_id) in &columns {
            batch.push(
                FactKey::National {
                    year_id,
                    area_code: area.area_code.clone(),
                    cohort_id,
                    vaccine_id,
                },
                Measurement {
                    eligible_population: eligible,
                    vaccinated_count: None,
                    coverage_percentage: percentage(row.cell(col), row.index, col, warnings),
                    coverage_range: None,
                },
            );
        }
    }
    batch
}

/// England time series: one row per financial year, cohort fixed per file.
pub(super) fn time_series_facts(
    table: &ExtractedTable,
    resolver: &mut VaccineNameResolver,
    dims: &DimensionIndex,
    warnings: &mut WarningLog,
) -> FactBatch {
    let mut batch = FactBatch::default();
    let layout = table.source.kind.layout();
    let header_row = table.header.row;

    let Some(cohort_id) = lookup_cohort(dims, table.source.cohort_months, header_row, warnings)
    else {
        return batch;
    };
    let columns = resolve_vaccine_columns(
        vaccine_columns(&table.columns),
        header_row,
        resolver,
        dims,
        warnings,
    );

    for row in &table.rows {
        batch.rows += 1;
        let Some(year_id) = row_year(&row.identifier).and_then(|y| dims.year_id(&y.label()))
        else {
            warnings.record(LoadWarning::UnresolvedReference {
                row: row.index,
                reference: ReferenceKind::Year,
                value: row.identifier.clone(),
            });
            continue;
        };
        let eligible = layout.population_col.and_then(|col| parse_count(row.cell(col)));

        for &(col, vaccine_id) in &columns {
            batch.push(
                FactKey::EnglandTimeSeries {
                    year_id,
                    cohort_id,
                    vaccine_id,
                },
                Measurement {
                    eligible_population: eligible,
                    vaccinated_count: None,
                    coverage_percentage: percentage(row.cell(col), row.index, col, warnings),
                    coverage_range: None,
                },
            );
        }
    }
    batch
}
