//! Data-row detection.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use cover_model::{IdentifierKind, StructureKind};

use crate::source::Grid;
use crate::notes::strip_notes;

/// Header words that never appear in a real identifier.
const HEADER_KEYWORDS: &[&str] = &[
    "Geographic",
    "Coverage",
    "Financial year",
    "Local authority",
    "Number aged",
    "Evaluation",
    "Code",
    "Unnamed",
];

const COUNTRY_NAMES: &[&str] = &[
    "United Kingdom",
    "England",
    "Scotland",
    "Wales",
    "Northern Ireland",
];

static AREA_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ESWN]\d{8}").expect("Invalid area code regex"));

static FINANCIAL_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d{4} to \d{4}\b|\d{4}-\d{4}$)").expect("Invalid financial year regex")
});

/// A data row kept from the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataRow {
    /// 0-based row index in the source grid.
    pub index: usize,
    /// Identifier cell with note markers removed.
    pub identifier: String,
    pub cells: Vec<String>,
}

impl DataRow {
    /// Cell text, or `""` when the row is shorter than `col`.
    pub fn cell(&self, col: usize) -> &str {
        self.cells.get(col).map_or("", String::as_str)
    }
}

/// Whether an identifier cell marks a data row for `kind`.
pub fn is_data_row(identifier: &str, kind: StructureKind) -> bool {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return false;
    }
    if HEADER_KEYWORDS
        .iter()
        .any(|keyword| identifier.contains(keyword))
    {
        return false;
    }
    match kind.layout().identifier_kind {
        IdentifierKind::AreaCode => AREA_CODE.is_match(identifier),
        IdentifierKind::CountryName => COUNTRY_NAMES.contains(&identifier),
        IdentifierKind::FinancialYear => FINANCIAL_YEAR.is_match(identifier),
    }
}

/// Rows below `header_row` whose identifier passes [`is_data_row`].
pub fn extract_data_rows(grid: &Grid, header_row: usize, kind: StructureKind) -> Vec<DataRow> {
    let identifier_col = kind.layout().identifier_col;
    grid.rows()
        .iter()
        .enumerate()
        .skip(header_row + 1)
        .filter_map(|(index, cells)| {
            let identifier = strip_notes(cells.get(identifier_col).map_or("", String::as_str));
            is_data_row(&identifier, kind).then(|| DataRow {
                index,
                identifier,
                cells: cells.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_authority_rows() {
        let kind = StructureKind::LocalAuthority;
        assert!(is_data_row("E10000019", kind));
        assert!(is_data_row("W06000001", kind));
        assert!(!is_data_row("Geographic area", kind));
        assert!(!is_data_row("", kind));
        assert!(!is_data_row("   ", kind));
        assert!(!is_data_row("Code", kind));
        assert!(!is_data_row("London", kind));
        assert!(!is_data_row("E1000001", kind));
    }

    #[test]
    fn national_rows_are_exact_country_names() {
        let kind = StructureKind::National;
        assert!(is_data_row("United Kingdom", kind));
        assert!(is_data_row("Northern Ireland", kind));
        assert!(!is_data_row("England and Wales", kind));
        assert!(!is_data_row("Source: COVER", kind));
    }

    #[test]
    fn time_series_rows_are_financial_years() {
        for kind in [StructureKind::TimeSeries, StructureKind::RegionalTimeSeries] {
            assert!(is_data_row("2009 to 2010", kind));
            assert!(is_data_row("2023-2024", kind));
            assert!(!is_data_row("Financial year", kind));
            assert!(!is_data_row("2023-2024 provisional", kind));
            assert!(!is_data_row("Data for 2009 to 2010", kind));
        }
    }

    #[test]
    fn header_keywords_win_over_shape() {
        assert!(!is_data_row("E10000019 Code", StructureKind::SpecialProgram));
    }

    #[test]
    fn extraction_starts_below_header() {
        let grid = Grid::new(vec![
            vec!["E92000001".into(), "looks like data above header".into()],
            vec!["Code".into(), "Name".into()],
            vec!["E09000001".into(), "City of London".into()],
            vec!["Notes".into()],
            vec!["E09000002 [note 3]".into(), "Barking and Dagenham".into()],
        ]);
        let rows = extract_data_rows(&grid, 1, StructureKind::LocalAuthority);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index, 2);
        assert_eq!(rows[1].identifier, "E09000002");
        assert_eq!(rows[1].cell(1), "Barking and Dagenham");
        assert_eq!(rows[1].cell(7), "");
    }
}
