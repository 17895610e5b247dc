//! Per-layout loading against a seeded store.

mod common;

use cover_ingest::read_table_path;
use cover_load::{Loader, YearRange, seed_areas, seed_reference_data, utla_areas};
use cover_map::{CANONICAL_VACCINES, VaccineNameResolver};
use cover_model::{
    AreaType, CoverageWriter, FactKey, FinancialYear, GeographicArea, LoadWarning, ReferenceKind,
};
use cover_store::CoverageStore;
use tempfile::TempDir;

use common::{LA_ROWS, LA_VACCINES, YEAR_PREFIX, local_authority_counts, write};

fn seeded_store() -> CoverageStore {
    let mut store = CoverageStore::open_in_memory().unwrap();
    let mut tx = store.transaction().unwrap();
    seed_reference_data(&mut tx, CANONICAL_VACCINES, YearRange::default().iter()).unwrap();
    tx.commit().unwrap();
    store
}

fn reporting_year() -> FinancialYear {
    FinancialYear::starting(2024)
}

#[test]
fn unpaired_count_sheet_loads_alone() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        &format!("{YEAR_PREFIX}_T5b_UTLA24m.csv"),
        &local_authority_counts(),
    );
    let table = read_table_path(&path).unwrap();
    let mut store = seeded_store();
    let mut resolver = VaccineNameResolver::new();

    let mut tx = store.transaction().unwrap();
    let dims = tx.dimensions().unwrap();
    seed_areas(&mut tx, &utla_areas(&table, &dims)).unwrap();
    let report = Loader::new(&mut resolver, reporting_year())
        .load_table(&mut tx, &table)
        .unwrap();
    let dims = tx.dimensions().unwrap();
    let stored = tx
        .measurement(&FactKey::LocalAuthority {
            year_id: dims.year_id("2024-2025").unwrap(),
            area_code: "E10000007".to_string(),
            cohort_id: dims.cohort_id(24).unwrap(),
            vaccine_id: dims.vaccine_id("MMR1").unwrap(),
        })
        .unwrap()
        .unwrap();
    tx.commit().unwrap();

    assert_eq!(
        report.warnings,
        [LoadWarning::UnpairedSheet {
            table: "T5b".to_string()
        }]
    );
    assert_eq!(report.inserted, LA_ROWS * LA_VACCINES.len());
    assert_eq!(stored.coverage_percentage, None);
    assert_eq!(stored.vaccinated_count, Some(5_000 + 70 + 4));
}

#[test]
fn unknown_rows_and_columns_are_skipped_with_warnings() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        &format!("{YEAR_PREFIX}_T2_UK24m.csv"),
        "\
Geographic area,ONS code,Number aged 24 months,Coverage at 24 months MMR1 (%),Totally Unrelated Text
England,E92000001,\"580,000\",89.1,12
Atlantis,X00000000,\"1,000\",99.0,12
Wales,W92000004,\"31,000\",93.3,12
",
    );
    let table = read_table_path(&path).unwrap();
    let mut store = seeded_store();
    let mut resolver = VaccineNameResolver::new();

    let mut tx = store.transaction().unwrap();
    let report = Loader::new(&mut resolver, reporting_year())
        .load_table(&mut tx, &table)
        .unwrap();
    tx.commit().unwrap();

    // "Atlantis" is not a country name, so the row is never extracted.
    assert_eq!(report.rows, 2);
    assert_eq!(report.inserted, 2);
    assert_eq!(
        report.warnings,
        [LoadWarning::UnresolvedColumn {
            column: 4,
            header: "Totally Unrelated Text".to_string()
        }]
    );
}

#[test]
fn unseeded_year_skips_the_file_without_failing() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "cover-anual-data-tables-2030-to-2031_T1_UK12m.csv",
        common::NATIONAL,
    );
    let table = read_table_path(&path).unwrap();
    let mut store = seeded_store();
    let mut resolver = VaccineNameResolver::new();

    let mut tx = store.transaction().unwrap();
    let report = Loader::new(&mut resolver, reporting_year())
        .load_table(&mut tx, &table)
        .unwrap();
    tx.commit().unwrap();

    assert_eq!(report.inserted, 0);
    assert_eq!(
        report.warnings,
        [LoadWarning::UnresolvedReference {
            row: 3,
            reference: ReferenceKind::Year,
            value: "2030-2031".to_string()
        }]
    );
}

#[test]
fn regional_columns_resolve_by_name() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "cover-time-series_T15_RegMMR24m.csv",
        "\
Financial year,Notes,England,Yorkshire and the Humber,Atlantis
2021 to 2022,,89.2,90.1,70.0
",
    );
    let table = read_table_path(&path).unwrap();
    let mut store = seeded_store();
    let mut resolver = VaccineNameResolver::new();

    let mut tx = store.transaction().unwrap();
    let report = Loader::new(&mut resolver, reporting_year())
        .load_table(&mut tx, &table)
        .unwrap();
    let dims = tx.dimensions().unwrap();
    let yorkshire = tx
        .measurement(&FactKey::RegionalTimeSeries {
            year_id: dims.year_id("2021-2022").unwrap(),
            area_code: "E12000003".to_string(),
            cohort_id: dims.cohort_id(24).unwrap(),
            vaccine_id: dims.vaccine_id("MMR1").unwrap(),
        })
        .unwrap()
        .unwrap();
    tx.commit().unwrap();

    assert_eq!(report.inserted, 2);
    assert_eq!(yorkshire.coverage_percentage, Some(90.1));
    assert_eq!(
        report.warnings,
        [LoadWarning::UnresolvedReference {
            row: 0,
            reference: ReferenceKind::Area,
            value: "Atlantis".to_string()
        }]
    );
}

#[test]
fn utla_parent_falls_back_to_none() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        &format!("{YEAR_PREFIX}_T6a_UTLA5y.csv"),
        "\
Code,Local authority,Region,Region code,Notes,Number aged 5 years,Coverage at 5 years MMR2 (%)
E09000001,City of London,Nowhere,,,100,[c]
W06000001,Isle of Anglesey,Wales,,,700,95.0
",
    );
    let table = read_table_path(&path).unwrap();
    let store = seeded_store();

    let areas = utla_areas(&table, &store.dimensions().unwrap());

    assert_eq!(
        areas,
        [GeographicArea::new(
            "E09000001",
            "City of London",
            AreaType::Utla,
            None
        )]
    );
}
