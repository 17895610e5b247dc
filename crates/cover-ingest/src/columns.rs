//! Value column extraction.
//!
//! Each [`ValueAxis`] has its own strategy. Vaccine and region columns are
//! one value per column; special-programme columns come in groups of
//! eligible/vaccinated/coverage per cohort.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use cover_model::{HeaderPattern, LayoutConfig, ValueAxis};

use crate::notes::strip_notes;

static COHORT_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s+(months?|years?)").expect("Invalid cohort phrase regex")
});

/// One labelled value column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueColumn {
    pub index: usize,
    /// Header text with note markers removed.
    pub header: String,
}

/// Column group for one cohort of a special-programme table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CohortColumns {
    pub cohort_months: u32,
    pub coverage_col: usize,
    pub eligible_col: Option<usize>,
    pub vaccinated_col: Option<usize>,
    pub header: String,
}

/// Value columns of one table, shaped by its axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "axis", content = "columns", rename_all = "snake_case")]
pub enum ValueColumns {
    Vaccines(Vec<ValueColumn>),
    Regions(Vec<ValueColumn>),
    ProgramCohorts(Vec<CohortColumns>),
}

impl ValueColumns {
    pub fn len(&self) -> usize {
        match self {
            Self::Vaccines(cols) | Self::Regions(cols) => cols.len(),
            Self::ProgramCohorts(groups) => groups.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extracts the value columns of a header row.
pub fn extract_value_columns(header: &[String], layout: &LayoutConfig) -> ValueColumns {
    match layout.value_axis {
        ValueAxis::Vaccines => ValueColumns::Vaccines(vaccine_columns(header, layout)),
        ValueAxis::Regions => ValueColumns::Regions(region_columns(header, layout)),
        ValueAxis::ProgramCohorts => ValueColumns::ProgramCohorts(cohort_groups(header, layout)),
    }
}

fn labelled(header: &[String], start: usize) -> impl Iterator<Item = (usize, String)> + '_ {
    header
        .iter()
        .enumerate()
        .skip(start)
        .map(|(index, text)| (index, strip_notes(text)))
}

fn vaccine_columns(header: &[String], layout: &LayoutConfig) -> Vec<ValueColumn> {
    labelled(header, layout.value_col_start)
        .filter(|(_, text)| {
            !text.is_empty() && !["Note", "Unnamed", "nan"].iter().any(|skip| text.contains(skip))
        })
        .map(|(index, header)| ValueColumn { index, header })
        .collect()
}

fn region_columns(header: &[String], layout: &LayoutConfig) -> Vec<ValueColumn> {
    labelled(header, layout.value_col_start)
        .filter(|(_, text)| !text.is_empty() && !text.to_lowercase().contains("note"))
        .map(|(index, header)| ValueColumn { index, header })
        .collect()
}

/// Cohort age in months named by a header such as `Coverage at 24 months`.
pub fn cohort_months_in(text: &str) -> Option<u32> {
    let caps = COHORT_PHRASE.captures(text)?;
    let amount: u32 = caps[1].parse().ok()?;
    if caps[2].to_lowercase().starts_with("year") {
        amount.checked_mul(12)
    } else {
        Some(amount)
    }
}

fn cohort_groups(header: &[String], layout: &LayoutConfig) -> Vec<CohortColumns> {
    let start = layout.value_col_start;
    let phrase = layout
        .header_pattern
        .map_or("Coverage", HeaderPattern::phrase);
    let headers: Vec<String> = header.iter().map(|text| strip_notes(text)).collect();

    headers
        .iter()
        .enumerate()
        .skip(start)
        .filter(|(_, text)| text.contains(phrase) && text.contains('%'))
        .filter_map(|(coverage_col, text)| {
            let cohort_months = cohort_months_in(text)?;
            let mut eligible_col = None;
            let mut vaccinated_col = None;
            for idx in (coverage_col.saturating_sub(2).max(start)..coverage_col).rev() {
                let lowered = headers[idx].to_lowercase();
                if eligible_col.is_none() && lowered.contains("eligible") {
                    eligible_col = Some(idx);
                }
                if vaccinated_col.is_none() && lowered.contains("vaccinated") {
                    vaccinated_col = Some(idx);
                }
            }
            Some(CohortColumns {
                cohort_months,
                coverage_col,
                eligible_col,
                vaccinated_col,
                header: text.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cover_model::StructureKind;

    fn header(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| (*cell).to_string()).collect()
    }

    #[test]
    fn vaccine_columns_start_at_layout_offset() {
        let row = header(&[
            "Geographic area",
            "ONS code",
            "Number aged 12 months",
            "Coverage at 12 months DTaP/IPV/Hib/HepB (%)",
            "Coverage at 12 months PCV1 (%) [note 5]",
            "",
            "Note",
        ]);
        let ValueColumns::Vaccines(cols) =
            extract_value_columns(&row, StructureKind::National.layout())
        else {
            panic!("expected vaccine columns");
        };
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].index, 3);
        assert_eq!(cols[1].header, "Coverage at 12 months PCV1 (%)");
    }

    #[test]
    fn region_columns_skip_notes() {
        let row = header(&[
            "Financial year",
            "Notes",
            "England",
            "North East",
            "London [note 7]",
            "",
        ]);
        let columns = extract_value_columns(&row, StructureKind::RegionalTimeSeries.layout());
        assert_eq!(
            columns,
            ValueColumns::Regions(vec![
                ValueColumn {
                    index: 2,
                    header: "England".to_string()
                },
                ValueColumn {
                    index: 3,
                    header: "North East".to_string()
                },
                ValueColumn {
                    index: 4,
                    header: "London".to_string()
                },
            ])
        );
    }

    #[test]
    fn program_columns_group_by_cohort() {
        let row = header(&[
            "Code",
            "Name",
            "Region",
            "ODS code",
            "ODS name",
            "Number aged 12 months eligible",
            "Number aged 12 months vaccinated",
            "Coverage at 12 months (%)",
            "Number aged 24 months eligible",
            "Number aged 24 months vaccinated",
            "Coverage at 24 months (%)",
        ]);
        let ValueColumns::ProgramCohorts(groups) =
            extract_value_columns(&row, StructureKind::SpecialProgram.layout())
        else {
            panic!("expected cohort groups");
        };
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].cohort_months, 12);
        assert_eq!(groups[0].coverage_col, 7);
        assert_eq!(groups[0].eligible_col, Some(5));
        assert_eq!(groups[0].vaccinated_col, Some(6));
        assert_eq!(groups[1].cohort_months, 24);
        assert_eq!(groups[1].eligible_col, Some(8));
    }

    #[test]
    fn empty_header_yields_no_columns() {
        let columns = extract_value_columns(&[], StructureKind::LocalAuthority.layout());
        assert!(columns.is_empty());
    }

    #[test]
    fn cohort_phrases() {
        assert_eq!(cohort_months_in("Coverage at 3 months (%)"), Some(3));
        assert_eq!(cohort_months_in("Coverage at 5 years MMR2 (%)"), Some(60));
        assert_eq!(cohort_months_in("Coverage (%)"), None);
        assert_eq!(cohort_months_in("Coverage at 400000000 years (%)"), None);
    }
}
