//! Source table identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which half of a paired local authority table a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetRole {
    /// `a` sheet: coverage percentages.
    Percentages,
    /// `b` sheet: vaccinated counts.
    Counts,
}

impl SheetRole {
    pub fn suffix(self) -> char {
        match self {
            Self::Percentages => 'a',
            Self::Counts => 'b',
        }
    }
}

/// Table identifier taken from a file name, e.g. `T4a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TableId {
    pub number: u8,
    pub sheet: Option<SheetRole>,
}

impl TableId {
    pub fn new(number: u8) -> Self {
        Self {
            number,
            sheet: None,
        }
    }

    pub fn with_sheet(number: u8, sheet: SheetRole) -> Self {
        Self {
            number,
            sheet: Some(sheet),
        }
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.number)?;
        if let Some(sheet) = self.sheet {
            write!(f, "{}", sheet.suffix())?;
        }
        Ok(())
    }
}
