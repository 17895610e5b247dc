//! Rendering of a run summary for a fixed data directory.

use std::path::PathBuf;

use cover_cli::summary::{counts_table, files_table, summary_json};
use cover_load::{CoverConfig, RunSummary, run_ingest};
use cover_store::CoverageStore;

const NATIONAL: &str = "\
Table 1: Coverage at 12 months by country,,,,
Source: COVER,,,,
Geographic area,ONS code,Number aged 12 months,Coverage at 12 months DTaP/IPV/Hib/HepB (%),Coverage at 12 months Rotavirus (%) [note 3]
United Kingdom,K02000001,\"668,160\",91.2,89.9
England [note 1],E92000001,\"560,021\",91.0,[x]
Scotland,S92000003,\"46,123\",94.5,92.1
Notes,,,,
";

fn fixture_summary() -> RunSummary {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path()
            .join("cover-anual-data-tables-2024-to-2025_T1_UK12m.csv"),
        NATIONAL,
    )
    .unwrap();
    std::fs::write(dir.path().join("unknown_file.csv"), "a,b\n1,2\n").unwrap();

    let mut store = CoverageStore::open_in_memory().unwrap();
    let mut summary = run_ingest(&mut store, dir.path(), &CoverConfig::default()).unwrap();
    summary.data_dir = PathBuf::from("data");
    summary
}

#[test]
fn run_summary_json_snapshot() {
    let summary = fixture_summary();
    insta::assert_json_snapshot!(summary, @r###"
    {
      "data_dir": "data",
      "seeded": {
        "areas": 14,
        "vaccines": 13,
        "cohorts": 4,
        "years": 16
      },
      "files": [
        {
          "label": "T1",
          "files": [
            "cover-anual-data-tables-2024-to-2025_T1_UK12m.csv"
          ],
          "structure": "national",
          "table": "national_coverage",
          "rows": 3,
          "inserted": 5,
          "updated": 0,
          "suppressed": 1,
          "warnings": []
        }
      ],
      "failures": [
        {
          "file": "unknown_file.csv",
          "error": "unrecognized table structure: unknown_file.csv"
        }
      ],
      "counts": {
        "geographic_areas": 14,
        "vaccines": 13,
        "age_cohorts": 4,
        "financial_years": 16,
        "national_coverage": 5,
        "local_authority_coverage": 0,
        "england_time_series": 0,
        "regional_time_series": 0,
        "special_programs": 0
      },
      "resolver": {
        "lookups": 2,
        "cache_hits": 0,
        "exact": 2,
        "alias": 0,
        "fuzzy": 0,
        "unresolved": 0
      }
    }
    "###);
}

#[test]
fn printed_json_parses_back() {
    let summary = fixture_summary();
    let json = summary_json(&summary).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["files"][0]["inserted"], 5);
    assert_eq!(value["failures"][0]["file"], "unknown_file.csv");
}

#[test]
fn tables_list_loaded_units_and_counts() {
    let summary = fixture_summary();
    let files = files_table(&summary).to_string();
    assert!(files.contains("T1"));
    assert!(files.contains("national_coverage"));
    assert!(files.contains("1 failed"));

    let counts = counts_table(&summary.counts).to_string();
    assert!(counts.contains("geographic_areas"));
    assert!(counts.contains("special_programs"));
}
