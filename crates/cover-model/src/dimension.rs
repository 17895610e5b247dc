//! Dimension rows: areas, vaccines, age cohorts and financial years.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Closed set of geographic levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaType {
    Country,
    Region,
    Utla,
}

impl AreaType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Region => "region",
            Self::Utla => "utla",
        }
    }
}

impl FromStr for AreaType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "country" => Ok(Self::Country),
            "region" => Ok(Self::Region),
            "utla" => Ok(Self::Utla),
            other => Err(ModelError::InvalidAreaType(other.to_string())),
        }
    }
}

impl fmt::Display for AreaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeographicArea {
    pub area_code: String,
    pub area_name: String,
    pub area_type: AreaType,
    /// Weak back-reference to the containing region or country.
    pub parent_region_code: Option<String>,
}

impl GeographicArea {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        area_type: AreaType,
        parent: Option<&str>,
    ) -> Self {
        Self {
            area_code: code.into(),
            area_name: name.into(),
            area_type,
            parent_region_code: parent.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vaccine {
    pub vaccine_code: String,
    pub vaccine_name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeCohort {
    pub cohort_name: String,
    pub age_months: u32,
    pub description: Option<String>,
}

impl AgeCohort {
    pub fn new(name: impl Into<String>, age_months: u32, description: Option<&str>) -> Self {
        Self {
            cohort_name: name.into(),
            age_months,
            description: description.map(str::to_string),
        }
    }
}

/// A UK financial year, 1 April to 31 March.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FinancialYear {
    pub year_start: i32,
    pub year_end: i32,
}

impl FinancialYear {
    /// The financial year beginning in April of `year_start`.
    ///
    /// For years read from input use [`FinancialYear::checked_starting`];
    /// this one saturates at `i32::MAX`.
    pub fn starting(year_start: i32) -> Self {
        Self {
            year_start,
            year_end: year_start.saturating_add(1),
        }
    }

    /// `None` when the end year does not fit in an `i32`.
    pub fn checked_starting(year_start: i32) -> Option<Self> {
        let year_end = year_start.checked_add(1)?;
        Some(Self {
            year_start,
            year_end,
        })
    }

    /// Canonical `YYYY-YYYY` label.
    pub fn label(&self) -> String {
        format!("{}-{}", self.year_start, self.year_end)
    }

    pub fn evaluation_start_date(&self) -> String {
        format!("{}-04-01", self.year_start)
    }

    pub fn evaluation_end_date(&self) -> String {
        format!("{}-03-31", self.year_end)
    }
}

impl FromStr for FinancialYear {
    type Err = ModelError;

    /// Parses `YYYY-YYYY` or `YYYY to YYYY`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (start, end) = trimmed
            .split_once(" to ")
            .or_else(|| trimmed.split_once('-'))
            .ok_or_else(|| ModelError::InvalidYearLabel(s.to_string()))?;
        let start: i32 = start
            .trim()
            .parse()
            .map_err(|_| ModelError::InvalidYearLabel(s.to_string()))?;
        let end: i32 = end
            .trim()
            .parse()
            .map_err(|_| ModelError::InvalidYearLabel(s.to_string()))?;
        Self::checked_starting(start)
            .filter(|year| year.year_end == end)
            .ok_or_else(|| ModelError::InvalidYearLabel(s.to_string()))
    }
}

impl fmt::Display for FinancialYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year_start, self.year_end)
    }
}

/// Targeted programmes reported separately from the routine schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProgramType {
    HepB,
    #[serde(rename = "BCG")]
    Bcg,
}

impl ProgramType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HepB => "HepB",
            Self::Bcg => "BCG",
        }
    }
}

impl FromStr for ProgramType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HepB" => Ok(Self::HepB),
            "BCG" => Ok(Self::Bcg),
            other => Err(ModelError::InvalidProgramType(other.to_string())),
        }
    }
}

impl fmt::Display for ProgramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
