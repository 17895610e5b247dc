//! Coverage facts and their natural keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dimension::ProgramType;
use crate::structure::StructureKind;

/// The five fact tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactTable {
    NationalCoverage,
    LocalAuthorityCoverage,
    EnglandTimeSeries,
    RegionalTimeSeries,
    SpecialPrograms,
}

impl FactTable {
    pub const ALL: [FactTable; 5] = [
        FactTable::NationalCoverage,
        FactTable::LocalAuthorityCoverage,
        FactTable::EnglandTimeSeries,
        FactTable::RegionalTimeSeries,
        FactTable::SpecialPrograms,
    ];

    /// SQL table name.
    pub fn table_name(self) -> &'static str {
        match self {
            Self::NationalCoverage => "national_coverage",
            Self::LocalAuthorityCoverage => "local_authority_coverage",
            Self::EnglandTimeSeries => "england_time_series",
            Self::RegionalTimeSeries => "regional_time_series",
            Self::SpecialPrograms => "special_programs",
        }
    }
}

impl StructureKind {
    /// Fact table a layout loads into.
    pub fn fact_table(self) -> FactTable {
        match self {
            Self::National => FactTable::NationalCoverage,
            Self::LocalAuthority => FactTable::LocalAuthorityCoverage,
            Self::TimeSeries => FactTable::EnglandTimeSeries,
            Self::RegionalTimeSeries => FactTable::RegionalTimeSeries,
            Self::SpecialProgram => FactTable::SpecialPrograms,
        }
    }
}

impl fmt::Display for FactTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Natural key of one fact row. Dimension references are surrogate ids,
/// except areas which are keyed by their ONS code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "table", rename_all = "snake_case")]
pub enum FactKey {
    National {
        year_id: i64,
        area_code: String,
        cohort_id: i64,
        vaccine_id: i64,
    },
    LocalAuthority {
        year_id: i64,
        area_code: String,
        cohort_id: i64,
        vaccine_id: i64,
    },
    EnglandTimeSeries {
        year_id: i64,
        cohort_id: i64,
        vaccine_id: i64,
    },
    RegionalTimeSeries {
        year_id: i64,
        area_code: String,
        cohort_id: i64,
        vaccine_id: i64,
    },
    SpecialProgram {
        year_id: i64,
        area_code: String,
        program_type: ProgramType,
        cohort_id: i64,
    },
}

impl FactKey {
    pub fn table(&self) -> FactTable {
        match self {
            Self::National { .. } => FactTable::NationalCoverage,
            Self::LocalAuthority { .. } => FactTable::LocalAuthorityCoverage,
            Self::EnglandTimeSeries { .. } => FactTable::EnglandTimeSeries,
            Self::RegionalTimeSeries { .. } => FactTable::RegionalTimeSeries,
            Self::SpecialProgram { .. } => FactTable::SpecialPrograms,
        }
    }
}

/// Measured fields of a fact row. Every field is nullable: suppressed or
/// not-applicable source cells are stored as null, never as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub eligible_population: Option<i64>,
    pub vaccinated_count: Option<i64>,
    /// Percentage in `[0, 100]`.
    pub coverage_percentage: Option<f64>,
    /// Disclosure range such as `35% to 69%` (special programmes only).
    pub coverage_range: Option<String>,
}

impl Measurement {
    /// True when nothing was measured for this cell. Eligible population
    /// alone is row context, not a measurement.
    pub fn is_suppressed(&self) -> bool {
        self.vaccinated_count.is_none()
            && self.coverage_percentage.is_none()
            && self.coverage_range.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageFact {
    pub key: FactKey,
    pub measurement: Measurement,
}

/// Result of writing one fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}
