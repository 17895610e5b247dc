//! Coverage table ingestion.
//!
//! This crate turns the published CSV exports of the COVER dataset into
//! extracted tables ready for loading.
//!
//! # Features
//!
//! - **Discovery**: List a data directory and plan loads in dependency order
//! - **Classification**: Decide a file's layout from its table token
//! - **Header Location**: Find the real header row below decorative preamble
//! - **Row Extraction**: Keep data rows, drop titles and notes
//! - **Value Cleaning**: Turn suppressed, ranged and formatted cells into numbers or null

#![deny(unsafe_code)]

mod classify;
mod columns;
mod discovery;
mod error;
mod header;
mod normalize;
mod notes;
mod rows;
mod source;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === File Reading ===
pub use source::{Grid, parse_grid, read_grid, read_source, sha256_hex};

// === Classification ===
pub use classify::{
    SourceTable, classify, cohort_token, identify, kind_for_table, table_id, year_token,
};

// === File Discovery ===
pub use discovery::{LoadPlan, LoadUnit, list_csv_files, plan_load};

// === Extraction ===
pub use columns::{
    CohortColumns, ValueColumn, ValueColumns, cohort_months_in, extract_value_columns,
};
pub use header::{HeaderLocation, locate_header};
pub use notes::strip_notes;
pub use rows::{DataRow, extract_data_rows, is_data_row};
pub use table::{ExtractedTable, read_table, read_table_path};

// === Value Cleaning ===
pub use normalize::{Normalized, normalize, parse_count, parse_number};
