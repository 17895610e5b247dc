//! Conversions between model types and SQL values.

use chrono::{DateTime, Utc};
use rusqlite::types::Value;

use cover_model::{FactKey, Measurement};

use crate::{Result, StoreError};

pub fn encode_dt(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::DateParse(e.to_string()))
}

fn int(value: Option<i64>) -> Value {
    value.map_or(Value::Null, Value::Integer)
}

fn real(value: Option<f64>) -> Value {
    value.map_or(Value::Null, Value::Real)
}

fn text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |s| Value::Text(s.to_string()))
}

/// Natural key columns of a fact, in `UNIQUE` constraint order.
pub fn key_columns(key: &FactKey) -> Vec<(&'static str, Value)> {
    match key {
        FactKey::National {
            year_id,
            area_code,
            cohort_id,
            vaccine_id,
        }
        | FactKey::LocalAuthority {
            year_id,
            area_code,
            cohort_id,
            vaccine_id,
        }
        | FactKey::RegionalTimeSeries {
            year_id,
            area_code,
            cohort_id,
            vaccine_id,
        } => vec![
            ("year_id", Value::Integer(*year_id)),
            ("area_code", Value::Text(area_code.clone())),
            ("cohort_id", Value::Integer(*cohort_id)),
            ("vaccine_id", Value::Integer(*vaccine_id)),
        ],
        FactKey::EnglandTimeSeries {
            year_id,
            cohort_id,
            vaccine_id,
        } => vec![
            ("year_id", Value::Integer(*year_id)),
            ("cohort_id", Value::Integer(*cohort_id)),
            ("vaccine_id", Value::Integer(*vaccine_id)),
        ],
        FactKey::SpecialProgram {
            year_id,
            area_code,
            program_type,
            cohort_id,
        } => vec![
            ("year_id", Value::Integer(*year_id)),
            ("area_code", Value::Text(area_code.clone())),
            ("program_type", Value::Text(program_type.as_str().to_string())),
            ("cohort_id", Value::Integer(*cohort_id)),
        ],
    }
}

/// Whether the fact's table carries a `coverage_range` column.
pub fn has_range_column(key: &FactKey) -> bool {
    matches!(key, FactKey::SpecialProgram { .. })
}

/// Measured columns written for a fact.
pub fn measurement_columns(key: &FactKey, m: &Measurement) -> Vec<(&'static str, Value)> {
    let mut columns = vec![
        ("eligible_population", int(m.eligible_population)),
        ("vaccinated_count", int(m.vaccinated_count)),
        ("coverage_percentage", real(m.coverage_percentage)),
    ];
    if has_range_column(key) {
        columns.push(("coverage_range", text(m.coverage_range.as_deref())));
    }
    columns
}

/// `a = ?1 AND b = ?2 ...` starting at placeholder `first`.
pub fn placeholders(columns: &[(&'static str, Value)], first: usize, sep: &str) -> String {
    columns
        .iter()
        .enumerate()
        .map(|(idx, (name, _))| format!("{name} = ?{}", first + idx))
        .collect::<Vec<_>>()
        .join(sep)
}
