//! SQL schema for the coverage store.
//!
//! Executed once per connection. Dimension tables come first so fact
//! tables can reference them.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS geographic_areas (
    area_code          TEXT PRIMARY KEY,
    area_name          TEXT NOT NULL,
    area_type          TEXT NOT NULL CHECK (area_type IN ('country', 'region', 'utla')),
    parent_region_code TEXT REFERENCES geographic_areas(area_code)
);

CREATE TABLE IF NOT EXISTS vaccines (
    vaccine_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    vaccine_code TEXT NOT NULL UNIQUE,
    vaccine_name TEXT NOT NULL,
    description  TEXT
);

CREATE TABLE IF NOT EXISTS age_cohorts (
    cohort_id   INTEGER PRIMARY KEY AUTOINCREMENT,
    cohort_name TEXT NOT NULL UNIQUE,
    age_months  INTEGER NOT NULL UNIQUE,
    description TEXT
);

CREATE TABLE IF NOT EXISTS financial_years (
    year_id               INTEGER PRIMARY KEY AUTOINCREMENT,
    year_label            TEXT NOT NULL UNIQUE,   -- 'YYYY-YYYY'
    year_start            INTEGER NOT NULL,
    year_end              INTEGER NOT NULL,
    evaluation_start_date TEXT NOT NULL,
    evaluation_end_date   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS national_coverage (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    year_id             INTEGER NOT NULL REFERENCES financial_years(year_id),
    area_code           TEXT NOT NULL REFERENCES geographic_areas(area_code),
    cohort_id           INTEGER NOT NULL REFERENCES age_cohorts(cohort_id),
    vaccine_id          INTEGER NOT NULL REFERENCES vaccines(vaccine_id),
    eligible_population INTEGER,
    vaccinated_count    INTEGER,
    coverage_percentage REAL CHECK (coverage_percentage BETWEEN 0 AND 100),
    UNIQUE (year_id, area_code, cohort_id, vaccine_id)
);

CREATE TABLE IF NOT EXISTS local_authority_coverage (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    year_id             INTEGER NOT NULL REFERENCES financial_years(year_id),
    area_code           TEXT NOT NULL REFERENCES geographic_areas(area_code),
    cohort_id           INTEGER NOT NULL REFERENCES age_cohorts(cohort_id),
    vaccine_id          INTEGER NOT NULL REFERENCES vaccines(vaccine_id),
    eligible_population INTEGER,
    vaccinated_count    INTEGER,
    coverage_percentage REAL CHECK (coverage_percentage BETWEEN 0 AND 100),
    UNIQUE (year_id, area_code, cohort_id, vaccine_id)
);

CREATE TABLE IF NOT EXISTS england_time_series (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    year_id             INTEGER NOT NULL REFERENCES financial_years(year_id),
    cohort_id           INTEGER NOT NULL REFERENCES age_cohorts(cohort_id),
    vaccine_id          INTEGER NOT NULL REFERENCES vaccines(vaccine_id),
    eligible_population INTEGER,
    vaccinated_count    INTEGER,
    coverage_percentage REAL CHECK (coverage_percentage BETWEEN 0 AND 100),
    UNIQUE (year_id, cohort_id, vaccine_id)
);

CREATE TABLE IF NOT EXISTS regional_time_series (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    year_id             INTEGER NOT NULL REFERENCES financial_years(year_id),
    area_code           TEXT NOT NULL REFERENCES geographic_areas(area_code),
    cohort_id           INTEGER NOT NULL REFERENCES age_cohorts(cohort_id),
    vaccine_id          INTEGER NOT NULL REFERENCES vaccines(vaccine_id),
    eligible_population INTEGER,
    vaccinated_count    INTEGER,
    coverage_percentage REAL CHECK (coverage_percentage BETWEEN 0 AND 100),
    UNIQUE (year_id, area_code, cohort_id, vaccine_id)
);

CREATE TABLE IF NOT EXISTS special_programs (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    year_id             INTEGER NOT NULL REFERENCES financial_years(year_id),
    area_code           TEXT NOT NULL REFERENCES geographic_areas(area_code),
    program_type        TEXT NOT NULL CHECK (program_type IN ('HepB', 'BCG')),
    cohort_id           INTEGER NOT NULL REFERENCES age_cohorts(cohort_id),
    eligible_population INTEGER,
    vaccinated_count    INTEGER,
    coverage_percentage REAL CHECK (coverage_percentage BETWEEN 0 AND 100),
    coverage_range      TEXT,             -- disclosure range, e.g. '35% to 69%'
    UNIQUE (year_id, area_code, program_type, cohort_id)
);

-- One row per source file name, replaced on every load of that file.
CREATE TABLE IF NOT EXISTS source_files (
    file_name  TEXT PRIMARY KEY,
    sha256     TEXT NOT NULL,
    structure  TEXT NOT NULL,
    inserted   INTEGER NOT NULL,
    updated    INTEGER NOT NULL,
    suppressed INTEGER NOT NULL,
    warnings   INTEGER NOT NULL,
    loaded_at  TEXT NOT NULL             -- RFC 3339 UTC
);

CREATE INDEX IF NOT EXISTS geographic_areas_type_idx ON geographic_areas(area_type);

PRAGMA user_version = 1;
";
