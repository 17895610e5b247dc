//! Whole-directory ingestion runs.

mod common;

use cover_load::{CoverConfig, run_ingest};
use cover_model::{FactKey, FactTable, LoadWarning, ProgramType, StructureKind};
use cover_store::CoverageStore;
use tempfile::TempDir;

use common::{
    BLANK_POPULATION_AUTHORITY, LA_ROWS, LA_VACCINES, NATIONAL, YEAR_PREFIX, authority_code,
    authority_percentage, authority_vaccinated, local_authority_percentages, write,
    write_data_dir,
};

fn loaded_store(dir: &TempDir) -> (CoverageStore, cover_load::RunSummary) {
    let mut store = CoverageStore::open_in_memory().unwrap();
    let summary = run_ingest(&mut store, dir.path(), &CoverConfig::default()).unwrap();
    (store, summary)
}

#[test]
fn loads_every_layout_and_reports_unknown_files() {
    let dir = TempDir::new().unwrap();
    write_data_dir(dir.path());

    let (store, summary) = loaded_store(&dir);

    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].file, "unknown_file.csv");
    assert!(!summary.is_success());

    let structures: Vec<StructureKind> = summary.files.iter().map(|f| f.structure).collect();
    assert_eq!(structures, StructureKind::LOAD_ORDER);
    assert_eq!(summary.files[1].label, "T4a+T4b");
    assert_eq!(summary.files[1].files.len(), 2);

    let counts = summary.counts;
    assert_eq!(counts.geographic_areas, 14 + LA_ROWS as i64);
    assert_eq!(counts.vaccines, 13);
    assert_eq!(counts.age_cohorts, 4);
    assert_eq!(counts.financial_years, 16);
    assert_eq!(counts.national_coverage, 5);
    assert_eq!(counts.local_authority_coverage, (LA_ROWS * LA_VACCINES.len()) as i64);
    assert_eq!(counts.england_time_series, 3);
    assert_eq!(counts.regional_time_series, 5);
    assert_eq!(counts.special_programs, 2);
    assert_eq!(store.counts().unwrap(), counts);

    assert_eq!(summary.inserted() as i64, counts.facts_total());
    assert_eq!(summary.updated(), 0);
    assert_eq!(store.source_files().unwrap().len(), 6);
}

#[test]
fn missing_population_keeps_the_percentage() {
    let dir = TempDir::new().unwrap();
    write_data_dir(dir.path());

    let (store, summary) = loaded_store(&dir);
    let dims = store.dimensions().unwrap();

    let la = summary
        .files
        .iter()
        .find(|f| f.table == FactTable::LocalAuthorityCoverage)
        .unwrap();
    assert_eq!(la.rows, LA_ROWS);
    assert!(la.warnings.is_empty());

    let n = BLANK_POPULATION_AUTHORITY;
    let key = |area: usize| FactKey::LocalAuthority {
        year_id: dims.year_id("2024-2025").unwrap(),
        area_code: authority_code(area),
        cohort_id: dims.cohort_id(12).unwrap(),
        vaccine_id: dims.vaccine_id("DTaP_IPV_Hib_HepB").unwrap(),
    };
    let measurement = store.measurement(&key(n)).unwrap().unwrap();
    assert_eq!(measurement.eligible_population, None);
    assert_eq!(measurement.coverage_percentage, Some(authority_percentage(n, 0)));
    assert_eq!(measurement.vaccinated_count, Some(authority_vaccinated(n, 0)));

    let measurement = store.measurement(&key(n + 1)).unwrap().unwrap();
    assert_eq!(measurement.eligible_population, Some(6_000 + (n + 1) as i64));
}

#[test]
fn local_authorities_hang_off_their_region() {
    let dir = TempDir::new().unwrap();
    write_data_dir(dir.path());

    let (store, _) = loaded_store(&dir);
    let dims = store.dimensions().unwrap();

    let area = dims.area(&authority_code(1)).unwrap();
    assert_eq!(area.area_name, "Authority 1");
    assert_eq!(area.parent_region_code.as_deref(), Some("E12000002"));
}

#[test]
fn special_programme_and_regional_facts() {
    let dir = TempDir::new().unwrap();
    write_data_dir(dir.path());

    let (store, summary) = loaded_store(&dir);
    let dims = store.dimensions().unwrap();

    let ranged = store
        .measurement(&FactKey::SpecialProgram {
            year_id: dims.year_id("2024-2025").unwrap(),
            area_code: authority_code(1),
            program_type: ProgramType::HepB,
            cohort_id: dims.cohort_id(24).unwrap(),
        })
        .unwrap()
        .unwrap();
    assert_eq!(ranged.coverage_range.as_deref(), Some("35% to 69%"));
    assert_eq!(ranged.coverage_percentage, None);
    assert_eq!(ranged.eligible_population, Some(14));

    let program = summary
        .files
        .iter()
        .find(|f| f.structure == StructureKind::SpecialProgram)
        .unwrap();
    assert_eq!(program.suppressed, 2);

    let england = store
        .measurement(&FactKey::RegionalTimeSeries {
            year_id: dims.year_id("2022-2023").unwrap(),
            area_code: "E92000001".to_string(),
            cohort_id: dims.cohort_id(24).unwrap(),
            vaccine_id: dims.vaccine_id("DTaP_IPV_Hib_HepB").unwrap(),
        })
        .unwrap()
        .unwrap();
    assert_eq!(england.coverage_percentage, Some(93.0));
}

#[test]
fn out_of_range_percentage_is_nulled_and_warned() {
    let dir = TempDir::new().unwrap();
    write_data_dir(dir.path());

    let (store, summary) = loaded_store(&dir);

    let series = summary
        .files
        .iter()
        .find(|f| f.structure == StructureKind::TimeSeries)
        .unwrap();
    assert!(matches!(
        series.warnings.as_slice(),
        [LoadWarning::OutOfRangePercentage { value, .. }] if *value == 150.0
    ));
    assert_eq!(series.suppressed, 1);

    for value in store.coverage_percentages().unwrap() {
        assert!((0.0..=100.0).contains(&value), "{value} out of range");
    }
}

#[test]
fn second_run_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    write_data_dir(dir.path());
    let db = dir.path().join("coverage.db");
    let config = CoverConfig::default();

    let mut store = CoverageStore::open(&db).unwrap();
    let first = run_ingest(&mut store, dir.path(), &config).unwrap();
    let dims = store.dimensions().unwrap();
    let key = FactKey::National {
        year_id: dims.year_id("2024-2025").unwrap(),
        area_code: "K02000001".to_string(),
        cohort_id: dims.cohort_id(12).unwrap(),
        vaccine_id: dims.vaccine_id("DTaP_IPV_Hib_HepB").unwrap(),
    };
    let before = store.measurement(&key).unwrap();
    drop(store);

    let mut store = CoverageStore::open(&db).unwrap();
    let second = run_ingest(&mut store, dir.path(), &config).unwrap();

    assert_eq!(second.counts, first.counts);
    assert_eq!(second.inserted(), 0);
    assert_eq!(second.updated(), first.inserted());
    assert_eq!(second.seeded.areas, 0);
    assert_eq!(second.seeded.years, 0);
    assert_eq!(store.measurement(&key).unwrap(), before);
    assert_eq!(before.unwrap().eligible_population, Some(668_160));
}

#[test]
fn suppressed_cell_on_rerun_clears_the_stored_value() {
    let dir = TempDir::new().unwrap();
    let name = format!("{YEAR_PREFIX}_T1_UK12m.csv");
    write(dir.path(), &name, NATIONAL);
    let config = CoverConfig::default();
    let mut store = CoverageStore::open_in_memory().unwrap();
    run_ingest(&mut store, dir.path(), &config).unwrap();

    let dims = store.dimensions().unwrap();
    let key = FactKey::National {
        year_id: dims.year_id("2024-2025").unwrap(),
        area_code: "K02000001".to_string(),
        cohort_id: dims.cohort_id(12).unwrap(),
        vaccine_id: dims.vaccine_id("DTaP_IPV_Hib_HepB").unwrap(),
    };
    let before = store.measurement(&key).unwrap().unwrap();
    assert_eq!(before.coverage_percentage, Some(91.2));

    write(dir.path(), &name, &NATIONAL.replacen("91.2", "[c]", 1));
    let second = run_ingest(&mut store, dir.path(), &config).unwrap();

    let after = store.measurement(&key).unwrap().unwrap();
    assert_eq!(after.coverage_percentage, None);
    assert_eq!(after.vaccinated_count, None);
    assert_eq!(second.inserted(), 0);
    assert_eq!(second.files[0].suppressed, 2);
    assert_eq!(second.counts.national_coverage, 5);
}

#[test]
fn local_authority_sheets_of_different_years_all_load() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        &format!("{YEAR_PREFIX}_T4a_UTLA12m.csv"),
        &local_authority_percentages(),
    );
    write(
        dir.path(),
        "cover-anual-data-tables-2023-to-2024_T4a_UTLA12m.csv",
        &local_authority_percentages(),
    );

    let (store, summary) = loaded_store(&dir);

    assert!(summary.is_success(), "{:?}", summary.failures);
    assert_eq!(summary.files.len(), 2);
    let per_year = (LA_ROWS * LA_VACCINES.len()) as i64;
    assert_eq!(store.counts().unwrap().local_authority_coverage, 2 * per_year);
}

#[test]
fn duplicate_local_authority_sheet_is_reported() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        &format!("{YEAR_PREFIX}_T4a_UTLA12m.csv"),
        &local_authority_percentages(),
    );
    write(
        dir.path(),
        &format!("{YEAR_PREFIX}_T4_UTLA12m.csv"),
        &local_authority_percentages(),
    );

    let (store, summary) = loaded_store(&dir);

    assert_eq!(summary.files.len(), 1);
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].file.ends_with("_T4a_UTLA12m.csv"));
    assert!(summary.failures[0].error.contains("duplicate local authority sheet"));
    let per_year = (LA_ROWS * LA_VACCINES.len()) as i64;
    assert_eq!(store.counts().unwrap().local_authority_coverage, per_year);
}

#[test]
fn unreadable_file_fails_alone() {
    let dir = TempDir::new().unwrap();
    write_data_dir(dir.path());
    std::fs::write(
        dir.path().join("cover-anual-data-tables-2024-to-2025_T2_UK24m.csv"),
        [0xFF, 0xFE, b'G', 0, b'e', 0],
    )
    .unwrap();

    let (store, summary) = loaded_store(&dir);

    assert_eq!(summary.failures.len(), 2);
    assert!(
        summary
            .failures
            .iter()
            .any(|f| f.file.ends_with("_T2_UK24m.csv") && f.error.contains("UTF-16"))
    );
    assert_eq!(summary.files.len(), 5);
    assert_eq!(store.counts().unwrap().national_coverage, 5);
}

#[test]
fn missing_directory_is_a_run_error() {
    let dir = TempDir::new().unwrap();
    let mut store = CoverageStore::open_in_memory().unwrap();

    let result = run_ingest(
        &mut store,
        &dir.path().join("does-not-exist"),
        &CoverConfig::default(),
    );
    assert!(result.is_err());
}

#[test]
fn empty_directory_still_seeds_reference_data() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "README.txt", "no tables here");

    let (store, summary) = loaded_store(&dir);

    assert!(summary.is_success());
    assert!(summary.files.is_empty());
    let counts = store.counts().unwrap();
    assert_eq!(counts.geographic_areas, 14);
    assert_eq!(counts.facts_total(), 0);
}
