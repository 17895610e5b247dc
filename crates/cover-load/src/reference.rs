//! Reference data seeded before any fact load.
//!
//! Countries, English regions, the canonical vaccines, the age cohorts and
//! the financial years are fixed. Upper tier local authorities are taken
//! from the local authority tables themselves.

use serde::Serialize;
use tracing::{debug, info};

use cover_ingest::{ExtractedTable, strip_notes};
use cover_map::CanonicalVaccine;
use cover_model::{
    AgeCohort, AreaType, CoverageWriter, DimensionIndex, FinancialYear, GeographicArea,
};

pub const UNITED_KINGDOM: (&str, &str) = ("K02000001", "United Kingdom");

pub const ENGLAND_CODE: &str = "E92000001";

/// The four countries of the United Kingdom.
pub const COUNTRIES: &[(&str, &str)] = &[
    (ENGLAND_CODE, "England"),
    ("S92000003", "Scotland"),
    ("W92000004", "Wales"),
    ("N92000002", "Northern Ireland"),
];

/// English regions; all have England as parent.
pub const REGIONS: &[(&str, &str)] = &[
    ("E12000001", "North East"),
    ("E12000002", "North West"),
    ("E12000003", "Yorkshire and The Humber"),
    ("E12000004", "East Midlands"),
    ("E12000005", "West Midlands"),
    ("E12000006", "East of England"),
    ("E12000007", "London"),
    ("E12000008", "South East"),
    ("E12000009", "South West"),
];

/// Age cohorts as (name, age in months, description).
pub const COHORTS: &[(&str, u32, &str)] = &[
    ("12 months", 12, "Children reaching their first birthday"),
    ("24 months", 24, "Children reaching their second birthday"),
    ("5 years", 60, "Children reaching their fifth birthday"),
    ("3 months", 3, "Infants evaluated at 3 months"),
];

/// Area code prefixes of upper tier local authorities.
const UTLA_PREFIXES: &[&str] = &["E06", "E08", "E09", "E10"];

/// Rows created by a seeding pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub areas: usize,
    pub vaccines: usize,
    pub cohorts: usize,
    pub years: usize,
}

/// Fixed geographic areas, parents before children.
pub fn reference_areas() -> Vec<GeographicArea> {
    let (uk_code, uk_name) = UNITED_KINGDOM;
    std::iter::once(GeographicArea::new(uk_code, uk_name, AreaType::Country, None))
        .chain(
            COUNTRIES
                .iter()
                .map(|(code, name)| GeographicArea::new(*code, *name, AreaType::Country, None)),
        )
        .chain(REGIONS.iter().map(|(code, name)| {
            GeographicArea::new(*code, *name, AreaType::Region, Some(ENGLAND_CODE))
        }))
        .collect()
}

pub fn reference_cohorts() -> Vec<AgeCohort> {
    COHORTS
        .iter()
        .map(|(name, months, description)| AgeCohort::new(*name, *months, Some(description)))
        .collect()
}

/// Creates every missing reference row.
pub fn seed_reference_data<W: CoverageWriter>(
    writer: &mut W,
    vaccines: &[CanonicalVaccine],
    years: impl IntoIterator<Item = FinancialYear>,
) -> Result<SeedReport, W::Error> {
    let mut report = SeedReport {
        areas: seed_areas(writer, &reference_areas())?,
        ..SeedReport::default()
    };

    for vaccine in vaccines {
        if writer.ensure_vaccine(&vaccine.to_vaccine())? {
            report.vaccines += 1;
        }
    }
    for cohort in reference_cohorts() {
        if writer.ensure_cohort(&cohort)? {
            report.cohorts += 1;
        }
    }
    for year in years {
        if writer.ensure_year(&year)? {
            report.years += 1;
        }
    }

    info!(
        areas = report.areas,
        vaccines = report.vaccines,
        cohorts = report.cohorts,
        years = report.years,
        "Seeded reference data"
    );
    Ok(report)
}

/// Creates missing areas, returning how many were new.
pub fn seed_areas<W: CoverageWriter>(
    writer: &mut W,
    areas: &[GeographicArea],
) -> Result<usize, W::Error> {
    let mut created = 0;
    for area in areas {
        if writer.ensure_area(area)? {
            created += 1;
        }
    }
    Ok(created)
}

/// Upper tier local authorities named by a local authority table.
///
/// The parent is the region named in the region column, when known.
pub fn utla_areas(table: &ExtractedTable, dims: &DimensionIndex) -> Vec<GeographicArea> {
    let layout = table.source.kind.layout();
    let (Some(name_col), Some(region_col)) = (layout.name_col, layout.region_col) else {
        return Vec::new();
    };

    let areas: Vec<GeographicArea> = table
        .rows
        .iter()
        .filter(|row| {
            UTLA_PREFIXES
                .iter()
                .any(|prefix| row.identifier.starts_with(prefix))
        })
        .map(|row| {
            let code = row.identifier.trim();
            let name = strip_notes(row.cell(name_col));
            let region = strip_notes(row.cell(region_col));
            let parent = dims
                .area_by_name(&region, AreaType::Region)
                .or_else(|| {
                    dims.area(&region)
                        .filter(|area| area.area_type == AreaType::Region)
                })
                .map(|area| area.area_code.as_str());
            let name = if name.is_empty() { code.to_string() } else { name };
            GeographicArea::new(code, name, AreaType::Utla, parent)
        })
        .collect();

    debug!(
        file = %table.source.file_name,
        areas = areas.len(),
        "Derived local authority areas"
    );
    areas
}
