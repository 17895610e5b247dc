//! CLI argument definitions for the `cover` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cover",
    version,
    about = "Load UK vaccination coverage (COVER) tables into a normalized SQLite store",
    long_about = "Load the published COVER CSV tables into a normalized SQLite store.\n\n\
                  Recognises national, local authority, time series, regional and\n\
                  special programme layouts, cleans suppressed and formatted values,\n\
                  and maps free-text vaccine headers onto canonical vaccine codes."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load every recognised CSV file in a data directory.
    Ingest(IngestArgs),

    /// Show the detected layout, table ID and header row of files.
    Classify(ClassifyArgs),

    /// Resolve column headers to canonical vaccine codes.
    Resolve(ResolveArgs),

    /// List the canonical vaccines and their aliases.
    Vaccines,

    /// Show row counts of an existing store.
    Status(StatusArgs),
}

#[derive(Parser)]
pub struct IngestArgs {
    /// Directory containing the COVER CSV exports.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// SQLite database file (default: data/vaccination_coverage.db).
    #[arg(long = "database", value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// TOML config file (default: $COVER_CONFIG, then <DATA_DIR>/cover.toml).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Financial year for tables whose file name carries none, e.g. 2024-2025.
    #[arg(long = "reporting-year", value_name = "YYYY-YYYY")]
    pub reporting_year: Option<String>,

    /// Minimum similarity for fuzzy vaccine matches, between 0 and 1.
    #[arg(long = "fuzzy-threshold", value_name = "F")]
    pub fuzzy_threshold: Option<f64>,

    /// Load into an in-memory store and discard it.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Print the run summary as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct ClassifyArgs {
    /// CSV files to inspect.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Parser)]
pub struct ResolveArgs {
    /// Column headers as they appear in the source files.
    #[arg(value_name = "HEADER", required = true)]
    pub headers: Vec<String>,

    /// Minimum similarity for fuzzy matches, between 0 and 1.
    #[arg(long = "fuzzy-threshold", value_name = "F")]
    pub fuzzy_threshold: Option<f64>,
}

#[derive(Parser)]
pub struct StatusArgs {
    /// SQLite database file (default: data/vaccination_coverage.db).
    #[arg(long = "database", value_name = "PATH")]
    pub database: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
