//! File discovery and load planning for a data directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::warn;

use cover_model::{FinancialYear, SheetRole, StructureKind};

use crate::classify::{SourceTable, identify};
use crate::error::{IngestError, Result};

/// CSV files directly inside `dir`, ordered by file name. Subdirectories
/// and other extensions are skipped.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let read_error = |source| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if path.is_file() && has_csv_extension(&path) {
            files.push(path);
        }
    }
    files.sort_unstable_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// One unit of work: a single file, or the two sheets of a local
/// authority table loaded together.
#[derive(Debug, Clone)]
pub enum LoadUnit {
    Single(SourceTable),
    LocalAuthority {
        table: u8,
        percentages: Option<SourceTable>,
        counts: Option<SourceTable>,
    },
}

impl LoadUnit {
    pub fn kind(&self) -> StructureKind {
        match self {
            Self::Single(source) => source.kind,
            Self::LocalAuthority { .. } => StructureKind::LocalAuthority,
        }
    }

    fn table_number(&self) -> u8 {
        match self {
            Self::Single(source) => source.table_id.number,
            Self::LocalAuthority { table, .. } => *table,
        }
    }

    /// Files in this unit.
    pub fn sources(&self) -> Vec<&SourceTable> {
        match self {
            Self::Single(source) => vec![source],
            Self::LocalAuthority {
                percentages,
                counts,
                ..
            } => percentages.iter().chain(counts.iter()).collect(),
        }
    }

    /// Short label for logs, e.g. `T4a+T4b`.
    pub fn label(&self) -> String {
        self.sources()
            .iter()
            .map(|source| source.table_id.to_string())
            .collect::<Vec<_>>()
            .join("+")
    }
}

/// Files of a directory grouped into units in load order, plus the files
/// that could not be classified.
#[derive(Debug, Default)]
pub struct LoadPlan {
    pub units: Vec<LoadUnit>,
    pub rejected: Vec<(PathBuf, IngestError)>,
}

/// Sheets of one local authority table share this key. Files published
/// for different years or cohorts are separate units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct SheetKey {
    table: u8,
    year: Option<FinancialYear>,
    cohort_months: Option<u32>,
}

#[derive(Debug, Default)]
struct SheetPair {
    percentages: Option<SourceTable>,
    counts: Option<SourceTable>,
}

/// Classifies `files`, pairs local authority sheets and orders the units
/// by layout load rank, then table number.
///
/// A second sheet with the same key and role is rejected with
/// [`IngestError::DuplicateSheet`]; the first one (in `files` order) wins.
pub fn plan_load(files: &[PathBuf]) -> LoadPlan {
    let mut plan = LoadPlan::default();
    let mut sheets: BTreeMap<SheetKey, SheetPair> = BTreeMap::new();

    for path in files {
        let source = match identify(path) {
            Ok(source) => source,
            Err(err) => {
                plan.rejected.push((path.clone(), err));
                continue;
            }
        };

        if source.kind != StructureKind::LocalAuthority {
            plan.units.push(LoadUnit::Single(source));
            continue;
        }

        let key = SheetKey {
            table: source.table_id.number,
            year: source.year,
            cohort_months: source.cohort_months,
        };
        let pair = sheets.entry(key).or_default();
        let slot = match source.sheet_role() {
            SheetRole::Percentages => &mut pair.percentages,
            SheetRole::Counts => &mut pair.counts,
        };
        match slot {
            Some(existing) => {
                warn!(
                    kept = %existing.file_name,
                    rejected = %source.file_name,
                    "Duplicate local authority sheet"
                );
                let err = IngestError::DuplicateSheet {
                    file_name: source.file_name.clone(),
                    kept: existing.file_name.clone(),
                };
                plan.rejected.push((source.path, err));
            }
            None => *slot = Some(source),
        }
    }

    plan.units.extend(sheets.into_iter().map(|(key, pair)| {
        LoadUnit::LocalAuthority {
            table: key.table,
            percentages: pair.percentages,
            counts: pair.counts,
        }
    }));
    plan.units
        .sort_by_key(|unit| (unit.kind().load_rank(), unit.table_number()));
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn listing_keeps_csv_files_in_name_order() {
        let dir = TempDir::new().unwrap();
        for name in [
            "cover_T4a_UTLA12m.csv",
            "cover_T1_UK12m.csv",
            "NOTES.CSV",
            "readme.txt",
        ] {
            std::fs::write(dir.path().join(name), "a,b\n1,2\n").unwrap();
        }
        std::fs::create_dir(dir.path().join("archive.csv")).unwrap();

        let names: Vec<String> = list_csv_files(dir.path())
            .unwrap()
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            ["NOTES.CSV", "cover_T1_UK12m.csv", "cover_T4a_UTLA12m.csv"]
        );
    }

    #[test]
    fn listing_a_file_is_a_missing_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("cover_T1_UK12m.csv");
        std::fs::write(&file, "a\n").unwrap();

        assert!(matches!(
            list_csv_files(&file),
            Err(IngestError::DirectoryNotFound { .. })
        ));
        assert!(list_csv_files(&dir.path().join("absent")).is_err());
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|name| PathBuf::from("/data").join(name)).collect()
    }

    #[test]
    fn plan_orders_by_load_rank_and_pairs_sheets() {
        let plan = plan_load(&paths(&[
            "x_T8_UTLABCG.csv",
            "x_T5b_UTLA24m.csv",
            "x_T14_RegDTaP24m.csv",
            "x_T4a_UTLA12m.csv",
            "x_T4b_UTLA12m.csv",
            "x_T10_Eng24m.csv",
            "x_T2_UK24m.csv",
            "unknown_file.csv",
        ]));

        let labels: Vec<String> = plan.units.iter().map(LoadUnit::label).collect();
        assert_eq!(labels, ["T2", "T4a+T4b", "T5b", "T10", "T14", "T8"]);
        assert_eq!(plan.rejected.len(), 1);
        assert!(matches!(
            plan.rejected[0].1,
            IngestError::UnrecognizedStructure { .. }
        ));
    }

    #[test]
    fn unsuffixed_local_authority_table_is_a_percentages_sheet() {
        let plan = plan_load(&paths(&["x_T6_UTLA5y.csv"]));
        let LoadUnit::LocalAuthority {
            percentages,
            counts,
            ..
        } = &plan.units[0]
        else {
            panic!("expected a local authority unit");
        };
        assert!(percentages.is_some());
        assert!(counts.is_none());
    }

    #[test]
    fn sheets_of_other_years_and_cohorts_are_separate_units() {
        let plan = plan_load(&paths(&[
            "cover-2023-to-2024_T4a_UTLA12m.csv",
            "cover-2023-to-2024_T4b_UTLA12m.csv",
            "cover-2024-to-2025_T4a_UTLA12m.csv",
            "cover-2024-to-2025_T4b_UTLA12m.csv",
            "cover-2024-to-2025_T4a_UTLA18m.csv",
        ]));

        assert!(plan.rejected.is_empty());
        let years: Vec<Option<FinancialYear>> = plan
            .units
            .iter()
            .map(|unit| unit.sources()[0].year)
            .collect();
        assert_eq!(
            years,
            [
                Some(FinancialYear::starting(2023)),
                Some(FinancialYear::starting(2024)),
                Some(FinancialYear::starting(2024)),
            ]
        );
        let labels: Vec<String> = plan.units.iter().map(LoadUnit::label).collect();
        assert_eq!(labels, ["T4a+T4b", "T4a+T4b", "T4a"]);
    }

    #[test]
    fn same_sheet_twice_is_rejected() {
        let plan = plan_load(&paths(&[
            "cover-2024-to-2025_T4_UTLA12m.csv",
            "cover-2024-to-2025_T4a_UTLA12m.csv",
        ]));

        assert_eq!(plan.units.len(), 1);
        assert_eq!(plan.units[0].label(), "T4");
        assert_eq!(plan.rejected.len(), 1);
        let (path, err) = &plan.rejected[0];
        assert!(path.ends_with("cover-2024-to-2025_T4a_UTLA12m.csv"));
        assert!(matches!(
            err,
            IngestError::DuplicateSheet { kept, .. } if kept == "cover-2024-to-2025_T4_UTLA12m.csv"
        ));
    }
}
