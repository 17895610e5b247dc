//! [`CoverageStore`], the SQLite implementation of the normalized store.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension as _, Transaction, params, params_from_iter};
use serde::Serialize;
use tracing::debug;

use cover_model::{
    AgeCohort, AreaType, CoverageFact, CoverageWriter, DimensionIndex, FactKey, FactTable,
    FinancialYear, GeographicArea, Measurement, UpsertOutcome, Vaccine,
};

use crate::encode::{
    decode_dt, encode_dt, has_range_column, key_columns, measurement_columns, placeholders,
};
use crate::schema::SCHEMA;
use crate::{Result, StoreError};

/// Audit row for one loaded source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFileRecord {
    pub file_name: String,
    pub sha256: String,
    pub structure: String,
    pub inserted: usize,
    pub updated: usize,
    pub suppressed: usize,
    pub warnings: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Row counts per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub geographic_areas: i64,
    pub vaccines: i64,
    pub age_cohorts: i64,
    pub financial_years: i64,
    pub national_coverage: i64,
    pub local_authority_coverage: i64,
    pub england_time_series: i64,
    pub regional_time_series: i64,
    pub special_programs: i64,
}

impl StoreCounts {
    pub fn fact(&self, table: FactTable) -> i64 {
        match table {
            FactTable::NationalCoverage => self.national_coverage,
            FactTable::LocalAuthorityCoverage => self.local_authority_coverage,
            FactTable::EnglandTimeSeries => self.england_time_series,
            FactTable::RegionalTimeSeries => self.regional_time_series,
            FactTable::SpecialPrograms => self.special_programs,
        }
    }

    pub fn facts_total(&self) -> i64 {
        FactTable::ALL.iter().map(|table| self.fact(*table)).sum()
    }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A coverage store backed by a single SQLite file.
pub struct CoverageStore {
    conn: Connection,
}

impl CoverageStore {
    /// Open (or create) a store at `path` and run schema initialisation.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Opening coverage store");
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open an in-memory store, used for dry runs and tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Start a unit of work. Dropping the returned [`StoreTx`] without
    /// committing rolls it back.
    pub fn transaction(&mut self) -> Result<StoreTx<'_>> {
        Ok(StoreTx {
            tx: self.conn.transaction()?,
        })
    }

    pub fn dimensions(&self) -> Result<DimensionIndex> {
        load_dimensions(&self.conn)
    }

    pub fn counts(&self) -> Result<StoreCounts> {
        let count = |table: &str| -> Result<i64> {
            Ok(self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?)
        };
        Ok(StoreCounts {
            geographic_areas: count("geographic_areas")?,
            vaccines: count("vaccines")?,
            age_cohorts: count("age_cohorts")?,
            financial_years: count("financial_years")?,
            national_coverage: count(FactTable::NationalCoverage.table_name())?,
            local_authority_coverage: count(FactTable::LocalAuthorityCoverage.table_name())?,
            england_time_series: count(FactTable::EnglandTimeSeries.table_name())?,
            regional_time_series: count(FactTable::RegionalTimeSeries.table_name())?,
            special_programs: count(FactTable::SpecialPrograms.table_name())?,
        })
    }

    /// Measured fields stored for a natural key.
    pub fn measurement(&self, key: &FactKey) -> Result<Option<Measurement>> {
        find_measurement(&self.conn, key)
    }

    /// Every non-null coverage percentage across the fact tables.
    pub fn coverage_percentages(&self) -> Result<Vec<f64>> {
        let mut values = Vec::new();
        for table in FactTable::ALL {
            let mut stmt = self.conn.prepare(&format!(
                "SELECT coverage_percentage FROM {} WHERE coverage_percentage IS NOT NULL",
                table.table_name()
            ))?;
            let rows = stmt.query_map([], |r| r.get::<_, f64>(0))?;
            for value in rows {
                values.push(value?);
            }
        }
        Ok(values)
    }

    /// Source file manifest, ordered by file name.
    pub fn source_files(&self) -> Result<Vec<SourceFileRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT file_name, sha256, structure, inserted, updated, suppressed, warnings, loaded_at
             FROM source_files ORDER BY file_name",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok((
                r.get::<_, String>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, i64>(3)?,
                r.get::<_, i64>(4)?,
                r.get::<_, i64>(5)?,
                r.get::<_, i64>(6)?,
                r.get::<_, String>(7)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (file_name, sha256, structure, inserted, updated, suppressed, warnings, loaded_at) =
                row?;
            records.push(SourceFileRecord {
                file_name,
                sha256,
                structure,
                inserted: usize::try_from(inserted).unwrap_or_default(),
                updated: usize::try_from(updated).unwrap_or_default(),
                suppressed: usize::try_from(suppressed).unwrap_or_default(),
                warnings: usize::try_from(warnings).unwrap_or_default(),
                loaded_at: decode_dt(&loaded_at)?,
            });
        }
        Ok(records)
    }
}

// ─── Transaction ─────────────────────────────────────────────────────────────

/// One unit of work against the store.
pub struct StoreTx<'conn> {
    tx: Transaction<'conn>,
}

impl StoreTx<'_> {
    /// Insert or replace the manifest row for a source file.
    pub fn record_source_file(&mut self, record: &SourceFileRecord) -> Result<()> {
        self.tx.execute(
            "INSERT INTO source_files
               (file_name, sha256, structure, inserted, updated, suppressed, warnings, loaded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(file_name) DO UPDATE SET
               sha256 = excluded.sha256,
               structure = excluded.structure,
               inserted = excluded.inserted,
               updated = excluded.updated,
               suppressed = excluded.suppressed,
               warnings = excluded.warnings,
               loaded_at = excluded.loaded_at",
            params![
                record.file_name,
                record.sha256,
                record.structure,
                record.inserted as i64,
                record.updated as i64,
                record.suppressed as i64,
                record.warnings as i64,
                encode_dt(record.loaded_at),
            ],
        )?;
        Ok(())
    }

    pub fn measurement(&self, key: &FactKey) -> Result<Option<Measurement>> {
        find_measurement(&self.tx, key)
    }

    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }

    pub fn rollback(self) -> Result<()> {
        self.tx.rollback()?;
        Ok(())
    }
}

impl CoverageWriter for StoreTx<'_> {
    type Error = StoreError;

    fn ensure_area(&mut self, area: &GeographicArea) -> Result<bool> {
        let changed = self.tx.execute(
            "INSERT OR IGNORE INTO geographic_areas
               (area_code, area_name, area_type, parent_region_code)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                area.area_code,
                area.area_name,
                area.area_type.as_str(),
                area.parent_region_code,
            ],
        )?;
        Ok(changed == 1)
    }

    fn ensure_vaccine(&mut self, vaccine: &Vaccine) -> Result<bool> {
        let changed = self.tx.execute(
            "INSERT OR IGNORE INTO vaccines (vaccine_code, vaccine_name, description)
             VALUES (?1, ?2, ?3)",
            params![vaccine.vaccine_code, vaccine.vaccine_name, vaccine.description],
        )?;
        Ok(changed == 1)
    }

    fn ensure_cohort(&mut self, cohort: &AgeCohort) -> Result<bool> {
        let changed = self.tx.execute(
            "INSERT OR IGNORE INTO age_cohorts (cohort_name, age_months, description)
             VALUES (?1, ?2, ?3)",
            params![cohort.cohort_name, cohort.age_months, cohort.description],
        )?;
        Ok(changed == 1)
    }

    fn ensure_year(&mut self, year: &FinancialYear) -> Result<bool> {
        let changed = self.tx.execute(
            "INSERT OR IGNORE INTO financial_years
               (year_label, year_start, year_end, evaluation_start_date, evaluation_end_date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                year.label(),
                year.year_start,
                year.year_end,
                year.evaluation_start_date(),
                year.evaluation_end_date(),
            ],
        )?;
        Ok(changed == 1)
    }

    fn dimensions(&self) -> Result<DimensionIndex> {
        load_dimensions(&self.tx)
    }

    fn upsert_fact(&mut self, fact: &CoverageFact) -> Result<UpsertOutcome> {
        upsert_fact(&self.tx, fact)
    }

    fn update_fact(&mut self, fact: &CoverageFact) -> Result<bool> {
        match find_fact_id(&self.tx, &fact.key)? {
            Some(id) => {
                update_fact_row(&self.tx, fact, id)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ─── Queries ─────────────────────────────────────────────────────────────────

fn load_dimensions(conn: &Connection) -> Result<DimensionIndex> {
    let mut index = DimensionIndex::new();

    let mut stmt = conn.prepare(
        "SELECT area_code, area_name, area_type, parent_region_code FROM geographic_areas",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, Option<String>>(3)?,
        ))
    })?;
    for row in rows {
        let (area_code, area_name, area_type, parent_region_code) = row?;
        index.insert_area(GeographicArea {
            area_code,
            area_name,
            area_type: area_type.parse::<AreaType>()?,
            parent_region_code,
        });
    }

    let mut stmt = conn.prepare("SELECT vaccine_code, vaccine_id FROM vaccines")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?)))?;
    for row in rows {
        let (code, id) = row?;
        index.insert_vaccine(code, id);
    }

    let mut stmt = conn.prepare("SELECT age_months, cohort_id FROM age_cohorts")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, u32>(0)?, r.get::<_, i64>(1)?)))?;
    for row in rows {
        let (months, id) = row?;
        index.insert_cohort(months, id);
    }

    let mut stmt = conn.prepare("SELECT year_label, year_id FROM financial_years")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?)))?;
    for row in rows {
        let (label, id) = row?;
        index.insert_year(label, id);
    }

    Ok(index)
}

fn find_fact_id(conn: &Connection, key: &FactKey) -> Result<Option<i64>> {
    let table = key.table().table_name();
    let key_cols = key_columns(key);
    let sql = format!(
        "SELECT id FROM {table} WHERE {}",
        placeholders(&key_cols, 1, " AND ")
    );
    let id = conn
        .query_row(&sql, params_from_iter(key_cols.iter().map(|(_, v)| v)), |r| {
            r.get(0)
        })
        .optional()?;
    Ok(id)
}

fn find_measurement(conn: &Connection, key: &FactKey) -> Result<Option<Measurement>> {
    let table = key.table().table_name();
    let key_cols = key_columns(key);
    let range = if has_range_column(key) {
        "coverage_range"
    } else {
        "NULL"
    };
    let sql = format!(
        "SELECT eligible_population, vaccinated_count, coverage_percentage, {range}
         FROM {table} WHERE {}",
        placeholders(&key_cols, 1, " AND ")
    );
    let measurement = conn
        .query_row(&sql, params_from_iter(key_cols.iter().map(|(_, v)| v)), |r| {
            Ok(Measurement {
                eligible_population: r.get(0)?,
                vaccinated_count: r.get(1)?,
                coverage_percentage: r.get(2)?,
                coverage_range: r.get(3)?,
            })
        })
        .optional()?;
    Ok(measurement)
}

fn update_fact_row(conn: &Connection, fact: &CoverageFact, id: i64) -> Result<()> {
    let table = fact.key.table().table_name();
    let measures = measurement_columns(&fact.key, &fact.measurement);
    let sql = format!(
        "UPDATE {table} SET {} WHERE id = ?{}",
        placeholders(&measures, 1, ", "),
        measures.len() + 1
    );
    let values = measures
        .iter()
        .map(|(_, v)| v.clone())
        .chain(std::iter::once(rusqlite::types::Value::Integer(id)));
    conn.execute(&sql, params_from_iter(values))?;
    Ok(())
}

fn upsert_fact(conn: &Connection, fact: &CoverageFact) -> Result<UpsertOutcome> {
    if let Some(id) = find_fact_id(conn, &fact.key)? {
        update_fact_row(conn, fact, id)?;
        return Ok(UpsertOutcome::Updated);
    }

    let table = fact.key.table().table_name();
    let measures = measurement_columns(&fact.key, &fact.measurement);
    let columns: Vec<_> = key_columns(&fact.key).into_iter().chain(measures).collect();
    let names = columns
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ");
    let slots = (1..=columns.len())
        .map(|idx| format!("?{idx}"))
        .collect::<Vec<_>>()
        .join(", ");
    conn.execute(
        &format!("INSERT INTO {table} ({names}) VALUES ({slots})"),
        params_from_iter(columns.iter().map(|(_, v)| v)),
    )?;
    Ok(UpsertOutcome::Inserted)
}
