//! Physical layouts of the published coverage tables.
//!
//! Every source file is one of five layouts. Each layout carries a static
//! [`LayoutConfig`] describing where its header row is, which column holds
//! the row identifier and where the repeating value columns begin.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Structural variant of a source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    /// `T1_`–`T3_`: UK and its countries, one cohort per file.
    National,
    /// `T4`–`T6`: upper tier local authorities, split into `a`/`b` sheets.
    LocalAuthority,
    /// `T9_`–`T11_`: England by financial year.
    TimeSeries,
    /// `T14_`/`T15_`: financial years in rows, regions in columns.
    RegionalTimeSeries,
    /// `T7_`/`T8_`: HepB and BCG programmes by local authority.
    SpecialProgram,
}

impl StructureKind {
    /// All layouts in fact-load dependency order.
    pub const LOAD_ORDER: [StructureKind; 5] = [
        StructureKind::National,
        StructureKind::LocalAuthority,
        StructureKind::TimeSeries,
        StructureKind::RegionalTimeSeries,
        StructureKind::SpecialProgram,
    ];

    /// Layout configuration for this variant.
    pub fn layout(self) -> &'static LayoutConfig {
        match self {
            Self::National => &NATIONAL_LAYOUT,
            Self::LocalAuthority => &LOCAL_AUTHORITY_LAYOUT,
            Self::TimeSeries => &TIME_SERIES_LAYOUT,
            Self::RegionalTimeSeries => &REGIONAL_TIME_SERIES_LAYOUT,
            Self::SpecialProgram => &SPECIAL_PROGRAM_LAYOUT,
        }
    }

    /// Position in [`Self::LOAD_ORDER`].
    pub fn load_rank(self) -> usize {
        match self {
            Self::National => 0,
            Self::LocalAuthority => 1,
            Self::TimeSeries => 2,
            Self::RegionalTimeSeries => 3,
            Self::SpecialProgram => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::National => "national",
            Self::LocalAuthority => "local_authority",
            Self::TimeSeries => "time_series",
            Self::RegionalTimeSeries => "regional_time_series",
            Self::SpecialProgram => "special_program",
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the identifier cell of a data row contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    /// ONS area code such as `E10000019`.
    AreaCode,
    /// One of the UK country names.
    CountryName,
    /// Financial year, `2009 to 2010` or `2009-2010`.
    FinancialYear,
}

/// What the repeating value columns are labelled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueAxis {
    /// One column per vaccine.
    Vaccines,
    /// One column per geographic region (transposed layout).
    Regions,
    /// Groups of eligible/vaccinated/coverage columns per cohort.
    ProgramCohorts,
}

/// Boilerplate phrase that prefixes vaccine names in column headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderPattern {
    /// `Coverage at 12 months DTaP/IPV/Hib/HepB (%)`
    CoverageAt,
    /// `Coverage of DTaP/IPV/Hib/HepB (%)`
    CoverageOf,
}

impl HeaderPattern {
    pub fn phrase(self) -> &'static str {
        match self {
            Self::CoverageAt => "Coverage at",
            Self::CoverageOf => "Coverage of",
        }
    }
}

/// Static description of one layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Token searched for (substring match) to locate the header row.
    pub header_indicator: &'static str,
    /// Column holding the row identifier.
    pub identifier_col: usize,
    pub identifier_kind: IdentifierKind,
    /// First repeating value column. Everything before it is metadata.
    pub value_col_start: usize,
    pub value_axis: ValueAxis,
    /// Column holding the eligible population, when the layout has one.
    pub population_col: Option<usize>,
    /// Column holding the region name for area rows.
    pub region_col: Option<usize>,
    /// Column holding the area name for area rows.
    pub name_col: Option<usize>,
    pub header_pattern: Option<HeaderPattern>,
}

pub static NATIONAL_LAYOUT: LayoutConfig = LayoutConfig {
    header_indicator: "Geographic area",
    identifier_col: 0,
    identifier_kind: IdentifierKind::CountryName,
    value_col_start: 3,
    value_axis: ValueAxis::Vaccines,
    population_col: Some(2),
    region_col: None,
    name_col: None,
    header_pattern: Some(HeaderPattern::CoverageAt),
};

pub static LOCAL_AUTHORITY_LAYOUT: LayoutConfig = LayoutConfig {
    header_indicator: "Code",
    identifier_col: 0,
    identifier_kind: IdentifierKind::AreaCode,
    value_col_start: 6,
    value_axis: ValueAxis::Vaccines,
    population_col: Some(5),
    region_col: Some(2),
    name_col: Some(1),
    header_pattern: Some(HeaderPattern::CoverageAt),
};

pub static TIME_SERIES_LAYOUT: LayoutConfig = LayoutConfig {
    header_indicator: "Financial year",
    identifier_col: 0,
    identifier_kind: IdentifierKind::FinancialYear,
    value_col_start: 3,
    value_axis: ValueAxis::Vaccines,
    population_col: Some(2),
    region_col: None,
    name_col: None,
    header_pattern: Some(HeaderPattern::CoverageOf),
};

pub static REGIONAL_TIME_SERIES_LAYOUT: LayoutConfig = LayoutConfig {
    header_indicator: "Financial year",
    identifier_col: 0,
    identifier_kind: IdentifierKind::FinancialYear,
    value_col_start: 2,
    value_axis: ValueAxis::Regions,
    population_col: None,
    region_col: None,
    name_col: None,
    header_pattern: None,
};

pub static SPECIAL_PROGRAM_LAYOUT: LayoutConfig = LayoutConfig {
    header_indicator: "Code",
    identifier_col: 0,
    identifier_kind: IdentifierKind::AreaCode,
    value_col_start: 5,
    value_axis: ValueAxis::ProgramCohorts,
    population_col: None,
    region_col: Some(2),
    name_col: Some(1),
    header_pattern: Some(HeaderPattern::CoverageAt),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_authority_values_start_after_metadata() {
        let layout = StructureKind::LocalAuthority.layout();
        assert_eq!(layout.value_col_start, 6);
        assert_eq!(StructureKind::National.layout().value_col_start, 3);
    }

    #[test]
    fn regional_layout_is_transposed() {
        let layout = StructureKind::RegionalTimeSeries.layout();
        assert_eq!(layout.value_axis, ValueAxis::Regions);
        assert!(layout.header_pattern.is_none());
    }

    #[test]
    fn load_rank_matches_load_order() {
        for (idx, kind) in StructureKind::LOAD_ORDER.iter().enumerate() {
            assert_eq!(kind.load_rank(), idx);
        }
    }
}
