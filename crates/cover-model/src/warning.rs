//! Row- and file-level warnings absorbed during a load.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which dimension a row reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Area,
    Vaccine,
    Cohort,
    Year,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Area => "area",
            Self::Vaccine => "vaccine",
            Self::Cohort => "cohort",
            Self::Year => "financial year",
        })
    }
}

/// A non-fatal problem found while loading one file.
///
/// Row numbers are 0-based positions in the source grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadWarning {
    /// No row contained the header indicator; row 0 was used.
    HeaderNotFound { indicator: String },
    /// The header row yielded no usable value columns.
    NoValueColumns { header_row: usize },
    /// A value column header matched no canonical vaccine.
    UnresolvedColumn { column: usize, header: String },
    /// A row referenced a dimension value that is not loaded.
    UnresolvedReference {
        row: usize,
        reference: ReferenceKind,
        value: String,
    },
    /// A parsed percentage fell outside `[0, 100]` and was stored as null.
    OutOfRangePercentage {
        row: usize,
        column: usize,
        value: f64,
    },
    /// A paired sheet was loaded without its partner.
    UnpairedSheet { table: String },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeaderNotFound { indicator } => {
                write!(f, "header row not found (looked for '{indicator}'), using row 0")
            }
            Self::NoValueColumns { header_row } => {
                write!(f, "no value columns found in header row {header_row}")
            }
            Self::UnresolvedColumn { column, header } => {
                write!(f, "column {column} '{header}' matches no known vaccine")
            }
            Self::UnresolvedReference {
                row,
                reference,
                value,
            } => write!(f, "row {row}: unknown {reference} '{value}'"),
            Self::OutOfRangePercentage { row, column, value } => {
                write!(f, "row {row} column {column}: percentage {value} out of range")
            }
            Self::UnpairedSheet { table } => {
                write!(f, "{table} loaded without its paired sheet")
            }
        }
    }
}
