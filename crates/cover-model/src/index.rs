//! In-memory lookup over loaded dimension rows.

use std::collections::BTreeMap;

use crate::dimension::{AreaType, GeographicArea};

/// Snapshot of the dimension tables used to resolve row references.
///
/// Built once per file from the store, so every lookup during a load sees
/// the same dimension state.
#[derive(Debug, Clone, Default)]
pub struct DimensionIndex {
    areas: BTreeMap<String, GeographicArea>,
    area_names: BTreeMap<(AreaType, String), String>,
    vaccines: BTreeMap<String, i64>,
    cohorts: BTreeMap<u32, i64>,
    years: BTreeMap<String, i64>,
}

impl DimensionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_area(&mut self, area: GeographicArea) {
        self.area_names.insert(
            (area.area_type, name_key(&area.area_name)),
            area.area_code.clone(),
        );
        self.areas.insert(area.area_code.clone(), area);
    }

    pub fn insert_vaccine(&mut self, vaccine_code: impl Into<String>, vaccine_id: i64) {
        self.vaccines.insert(vaccine_code.into(), vaccine_id);
    }

    pub fn insert_cohort(&mut self, age_months: u32, cohort_id: i64) {
        self.cohorts.insert(age_months, cohort_id);
    }

    pub fn insert_year(&mut self, year_label: impl Into<String>, year_id: i64) {
        self.years.insert(year_label.into(), year_id);
    }

    pub fn area(&self, area_code: &str) -> Option<&GeographicArea> {
        self.areas.get(area_code)
    }

    /// Case-insensitive lookup by area name within one area type.
    pub fn area_by_name(&self, name: &str, area_type: AreaType) -> Option<&GeographicArea> {
        let code = self.area_names.get(&(area_type, name_key(name)))?;
        self.areas.get(code)
    }

    pub fn vaccine_id(&self, vaccine_code: &str) -> Option<i64> {
        self.vaccines.get(vaccine_code).copied()
    }

    pub fn cohort_id(&self, age_months: u32) -> Option<i64> {
        self.cohorts.get(&age_months).copied()
    }

    pub fn year_id(&self, year_label: &str) -> Option<i64> {
        self.years.get(year_label).copied()
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }
}

fn name_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
