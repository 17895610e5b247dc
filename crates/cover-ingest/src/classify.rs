//! File name classification.
//!
//! Published file names carry a table token (`_T4a_`), a reporting year
//! (`2024-to-2025`) and usually a cohort suffix (`UTLA12m`, `UK5y`). The
//! table number alone decides the layout.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use cover_model::{FinancialYear, ProgramType, SheetRole, StructureKind, TableId};

use crate::error::{IngestError, Result};

static TABLE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|_)T(\d{1,2})([ab])?_").expect("Invalid table token regex")
});

static YEAR_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})-to-(\d{4})").expect("Invalid year token regex"));

static COHORT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})([my])$").expect("Invalid cohort token regex"));

/// A source file whose layout is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceTable {
    pub path: PathBuf,
    pub file_name: String,
    pub kind: StructureKind,
    pub table_id: TableId,
    /// Cohort age in months from the file name suffix.
    pub cohort_months: Option<u32>,
    /// Reporting year from the file name.
    pub year: Option<FinancialYear>,
}

impl SourceTable {
    /// Programme reported by a special-programme table.
    pub fn program_type(&self) -> Option<ProgramType> {
        match (self.kind, self.table_id.number) {
            (StructureKind::SpecialProgram, 7) => Some(ProgramType::HepB),
            (StructureKind::SpecialProgram, 8) => Some(ProgramType::Bcg),
            _ => None,
        }
    }

    /// Sheet role, treating an unsuffixed local authority table as a
    /// percentages sheet.
    pub fn sheet_role(&self) -> SheetRole {
        self.table_id.sheet.unwrap_or(SheetRole::Percentages)
    }
}

/// Layout for a table number.
pub fn kind_for_table(number: u8) -> Option<StructureKind> {
    match number {
        1..=3 => Some(StructureKind::National),
        4..=6 => Some(StructureKind::LocalAuthority),
        7 | 8 => Some(StructureKind::SpecialProgram),
        9..=11 => Some(StructureKind::TimeSeries),
        14 | 15 => Some(StructureKind::RegionalTimeSeries),
        _ => None,
    }
}

/// Table token of a file name, if any.
pub fn table_id(file_name: &str) -> Option<TableId> {
    let caps = TABLE_TOKEN.captures(file_name)?;
    let number: u8 = caps.get(1)?.as_str().parse().ok()?;
    let sheet = caps.get(2).map(|m| match m.as_str() {
        "b" => SheetRole::Counts,
        _ => SheetRole::Percentages,
    });
    Some(TableId { number, sheet })
}

/// Layout of a file, decided from its name alone.
pub fn classify(file_name: &str) -> Option<StructureKind> {
    table_id(file_name).and_then(|id| kind_for_table(id.number))
}

/// Reporting year embedded as `YYYY-to-YYYY`.
pub fn year_token(file_name: &str) -> Option<FinancialYear> {
    let caps = YEAR_TOKEN.captures(file_name)?;
    format!("{}-{}", &caps[1], &caps[2]).parse().ok()
}

/// Cohort age in months from the last name segment (`UTLA12m` → 12,
/// `UK5y` → 60).
pub fn cohort_token(file_name: &str) -> Option<u32> {
    let stem = file_name
        .rsplit_once('.')
        .map_or(file_name, |(stem, _)| stem);
    let segment = stem.rsplit('_').next().unwrap_or(stem);
    let caps = COHORT_TOKEN.captures(segment)?;
    let amount: u32 = caps[1].parse().ok()?;
    match &caps[2] {
        "y" => amount.checked_mul(12),
        _ => Some(amount),
    }
}

/// Classifies a file path into a [`SourceTable`].
pub fn identify(path: &Path) -> Result<SourceTable> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let (table_id, kind) = table_id(&file_name)
        .and_then(|id| kind_for_table(id.number).map(|kind| (id, kind)))
        .ok_or_else(|| IngestError::UnrecognizedStructure {
            file_name: file_name.clone(),
        })?;

    Ok(SourceTable {
        path: path.to_path_buf(),
        cohort_months: cohort_token(&file_name),
        year: year_token(&file_name),
        file_name,
        kind,
        table_id,
    })
}
