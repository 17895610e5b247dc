//! Loading of extracted coverage tables into the normalized store.
//!
//! # Features
//!
//! - **Configuration**: Layered TOML file, environment and command-line settings
//! - **Reference Data**: Countries, regions, vaccines, cohorts, years and derived local authorities
//! - **Loading**: One strategy per layout, upserting facts by natural key
//! - **Runs**: Whole-directory ingestion with per-file transactions and a combined summary

#![deny(unsafe_code)]

mod config;
mod error;
mod loader;
mod reference;
mod run;

// === Error Types ===
pub use error::{LoadError, Result};

// === Configuration ===
pub use config::{
    CONFIG_ENV_VAR, CONFIG_FILE_NAME, ConfigFile, ConfigOverrides, CoverConfig, DEFAULT_DATABASE,
    YearRange, YearsSection, locate_config,
};

// === Reference Data ===
pub use reference::{
    COHORTS, COUNTRIES, ENGLAND_CODE, REGIONS, SeedReport, UNITED_KINGDOM, reference_areas,
    reference_cohorts, seed_areas, seed_reference_data, utla_areas,
};

// === Loading ===
pub use loader::{FileReport, Loader, PERCENT_DECIMALS, bounded_percentage, regional_vaccine};

// === Runs ===
pub use run::{FileFailure, RunSummary, run_ingest};
