//! Regional time series: the transposed layout.
//!
//! Rows are financial years and columns are areas, so the area is looked up
//! by column header name and the vaccine is fixed by the table number.

use cover_ingest::{ExtractedTable, ValueColumns};
use cover_model::{
    AreaType, DimensionIndex, FactKey, GeographicArea, LoadWarning, Measurement, ReferenceKind,
};

use super::WarningLog;
use super::cells::{FactBatch, lookup_cohort, percentage, row_year};

/// Vaccine code reported by a regional table.
pub fn regional_vaccine(table_number: u8) -> Option<&'static str> {
    match table_number {
        14 => Some("DTaP_IPV_Hib_HepB"),
        15 => Some("MMR1"),
        _ => None,
    }
}

/// Area named by a column header: a region, or a country such as England.
fn header_area<'d>(dims: &'d DimensionIndex, header: &str) -> Option<&'d GeographicArea> {
    let name = header.replace("(%)", "");
    let name = name.trim();
    dims.area_by_name(name, AreaType::Region)
        .or_else(|| dims.area_by_name(name, AreaType::Country))
}

pub(super) fn regional_facts(
    table: &ExtractedTable,
    dims: &DimensionIndex,
    warnings: &mut WarningLog,
) -> FactBatch {
    let mut batch = FactBatch::default();
    let header_row = table.header.row;
    let table_number = table.source.table_id.number;

    let Some(vaccine_id) = regional_vaccine(table_number).and_then(|code| dims.vaccine_id(code))
    else {
        warnings.record(LoadWarning::UnresolvedReference {
            row: header_row,
            reference: ReferenceKind::Vaccine,
            value: table.source.table_id.to_string(),
        });
        return batch;
    };
    let Some(cohort_id) = lookup_cohort(dims, table.source.cohort_months, header_row, warnings)
    else {
        return batch;
    };

    let ValueColumns::Regions(columns) = &table.columns else {
        return batch;
    };
    let mut areas = Vec::with_capacity(columns.len());
    for column in columns {
        match header_area(dims, &column.header) {
            Some(area) => areas.push((column.index, area.area_code.as_str())),
            None => warnings.record(LoadWarning::UnresolvedReference {
                row: header_row,
                reference: ReferenceKind::Area,
                value: column.header.clone(),
            }),
        }
    }

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

        for &(col, area_code) in &areas {
            batch.push(
                FactKey::RegionalTimeSeries {
                    year_id,
                    area_code: area_code.to_string(),
                    cohort_id,
                    vaccine_id,
                },
                Measurement {
                    coverage_percentage: percentage(row.cell(col), row.index, col, warnings),
                    ..Measurement::default()
                },
            );
        }
    }
    batch
}
