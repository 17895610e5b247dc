//! Fixture files reproducing the published export layouts.

#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use cover_load::REGIONS;

pub const YEAR_PREFIX: &str = "cover-anual-data-tables-2024-to-2025";

pub const LA_VACCINES: [&str; 5] = ["DTaP/IPV/Hib/HepB", "PCV1", "Rotavirus", "MenB", "MMR1"];

/// Number of local authority rows in the fixture.
pub const LA_ROWS: usize = 150;

/// Row (1-based authority number) whose eligible population is blank.
pub const BLANK_POPULATION_AUTHORITY: usize = 42;

pub fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

pub fn authority_code(n: usize) -> String {
    format!("E10{n:06}")
}

/// Coverage published for authority `n` and vaccine column `v`.
pub fn authority_percentage(n: usize, v: usize) -> f64 {
    80.0 + ((n + v) % 20) as f64
}

pub fn authority_vaccinated(n: usize, v: usize) -> i64 {
    (5_000 + n * 10 + v) as i64
}

pub const NATIONAL: &str = "\
Table 1: Coverage at 12 months by country,,,,
This worksheet contains one table.,,,,
Source: COVER,,,,
Geographic area,ONS code,Number aged 12 months,Coverage at 12 months DTaP/IPV/Hib/HepB (%),Coverage at 12 months Rotavirus (%) [note 3]
United Kingdom,K02000001,\"668,160\",91.2,89.9
England [note 1],E92000001,\"560,021\",91.0,[x]
Scotland,S92000003,\"46,123\",94.5,92.1
Notes,,,,
";

pub const TIME_SERIES: &str = "\
Table 9: Coverage at 12 months in England,,,,
Financial year,Notes,Number aged 12 months,Coverage of DTaP/IPV/Hib/HepB (%),Coverage of PCV1 (%)
2022 to 2023,,\"600,412\",92.1,93.0
2023 to 2024,[note 2],\"590,007\",91.8,150
";

pub const REGIONAL: &str = "\
Table 14: DTaP/IPV/Hib/HepB coverage at 24 months by region,,,,
Financial year,Notes,England,North East,London
2022 to 2023,,93.0,95.1,86.2
2023 to 2024,[note 4],92.6,94.8,[z]
";

pub const SPECIAL_PROGRAM: &str = "\
Table 7: Hepatitis B coverage for eligible children,,,,,,,,,,
Code,Local authority,Region,Region code,Notes,Number eligible at 12 months,Number vaccinated at 12 months,Coverage at 12 months (%),Number eligible at 24 months,Number vaccinated at 24 months,Coverage at 24 months (%)
E10000001,Authority 1,North East,E12000001,,3,3,100.0,14,[c],35% to 69%
E10000002,Authority 2,North West,E12000002,,[z],[z],[z],[x],[x],[x]
";

fn local_authority_sheet(title: &str, measure: &str, value: impl Fn(usize, usize) -> String) -> String {
    let mut out = String::new();
    writeln!(out, "{title},,,,,,,,,,").unwrap();
    writeln!(out, "This worksheet contains one table.,,,,,,,,,,").unwrap();
    let headers: Vec<String> = LA_VACCINES
        .iter()
        .map(|vaccine| format!("{measure} {vaccine}"))
        .collect();
    writeln!(
        out,
        "Code,Local authority,Region,Region code,Notes,Number aged 12 months,{}",
        headers.join(",")
    )
    .unwrap();

    for n in 1..=LA_ROWS {
        let (region_code, region_name) = REGIONS[n % REGIONS.len()];
        let population = if n == BLANK_POPULATION_AUTHORITY {
            String::new()
        } else {
            format!("\"6,{:03}\"", n)
        };
        let values: Vec<String> = (0..LA_VACCINES.len()).map(|v| value(n, v)).collect();
        writeln!(
            out,
            "{},Authority {n},{region_name},{region_code},,{population},{}",
            authority_code(n),
            values.join(",")
        )
        .unwrap();
    }
    out
}

pub fn local_authority_percentages() -> String {
    local_authority_sheet(
        "Table 4a: Coverage at 12 months by upper tier local authority",
        "Coverage at 12 months",
        |n, v| format!("{:.1}", authority_percentage(n, v)),
    )
}

pub fn local_authority_counts() -> String {
    local_authority_sheet(
        "Table 4b: Children vaccinated by 12 months by upper tier local authority",
        "Number vaccinated at 12 months",
        |n, v| authority_vaccinated(n, v).to_string(),
    )
}

/// Writes a complete data directory, plus one unrecognised file.
pub fn write_data_dir(dir: &Path) {
    write(dir, &format!("{YEAR_PREFIX}_T1_UK12m.csv"), NATIONAL);
    write(
        dir,
        &format!("{YEAR_PREFIX}_T4a_UTLA12m.csv"),
        &local_authority_percentages(),
    );
    write(
        dir,
        &format!("{YEAR_PREFIX}_T4b_UTLA12m.csv"),
        &local_authority_counts(),
    );
    write(dir, "cover-time-series_T9_Eng12m.csv", TIME_SERIES);
    write(dir, "cover-time-series_T14_RegDTaP24m.csv", REGIONAL);
    write(dir, &format!("{YEAR_PREFIX}_T7_UTLAHepB.csv"), SPECIAL_PROGRAM);
    write(dir, "unknown_file.csv", NATIONAL);
}
