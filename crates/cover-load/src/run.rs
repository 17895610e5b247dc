//! Multi-file ingestion runs.
//!
//! A run lists the data directory, seeds the dimension tables, then loads
//! each unit in dependency order inside its own transaction. A failing unit
//! is rolled back and reported; the run always attempts every unit.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use cover_ingest::{ExtractedTable, LoadPlan, LoadUnit, list_csv_files, plan_load, read_table};
use cover_map::{CANONICAL_VACCINES, ResolverStats, VaccineNameResolver};
use cover_model::{CoverageWriter, FinancialYear, StructureKind};
use cover_store::{CoverageStore, SourceFileRecord, StoreCounts, StoreTx};

use crate::config::CoverConfig;
use crate::error::Result;
use crate::loader::{FileReport, Loader};
use crate::reference::{SeedReport, seed_areas, seed_reference_data, utla_areas};

/// A file that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub file: String,
    pub error: String,
}

/// Combined result of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub data_dir: PathBuf,
    pub seeded: SeedReport,
    pub files: Vec<FileReport>,
    pub failures: Vec<FileFailure>,
    /// Row counts per table after the run.
    pub counts: StoreCounts,
    pub resolver: ResolverStats,
}

impl RunSummary {
    /// True when every file loaded.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn warning_count(&self) -> usize {
        self.files.iter().map(|file| file.warnings.len()).sum()
    }

    pub fn inserted(&self) -> usize {
        self.files.iter().map(|file| file.inserted).sum()
    }

    pub fn updated(&self) -> usize {
        self.files.iter().map(|file| file.updated).sum()
    }
}

/// Loads every recognised file under `data_dir` into `store`.
///
/// Fails only when the directory cannot be listed, the resolver cannot be
/// built or the reference data cannot be written. Per-file problems end up
/// in [`RunSummary::failures`].
pub fn run_ingest(
    store: &mut CoverageStore,
    data_dir: &Path,
    config: &CoverConfig,
) -> Result<RunSummary> {
    let span = info_span!("ingest", dir = %data_dir.display());
    let _guard = span.enter();

    let files = list_csv_files(data_dir)?;
    let plan = plan_load(&files);
    info!(
        files = files.len(),
        units = plan.units.len(),
        rejected = plan.rejected.len(),
        "Planned load"
    );

    let mut failures: Vec<FileFailure> = plan
        .rejected
        .iter()
        .map(|(path, err)| {
            let file = display_name(path);
            warn!(file = %file, error = %err, "Skipping file");
            FileFailure {
                file,
                error: err.to_string(),
            }
        })
        .collect();

    let mut resolver = VaccineNameResolver::with_threshold(config.fuzzy_threshold)?;
    let seeded = seed_dimensions(store, &plan, config)?;

    let mut reports = Vec::with_capacity(plan.units.len());
    for unit in &plan.units {
        match load_unit(store, &mut resolver, unit, config.reporting_year) {
            Ok(report) => reports.push(report),
            Err(err) => {
                let file = unit
                    .sources()
                    .iter()
                    .map(|source| source.file_name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                warn!(file = %file, error = %err, "File load failed");
                failures.push(FileFailure {
                    file,
                    error: err.to_string(),
                });
            }
        }
    }

    let summary = RunSummary {
        data_dir: data_dir.to_path_buf(),
        seeded,
        files: reports,
        failures,
        counts: store.counts()?,
        resolver: resolver.stats(),
    };
    info!(
        loaded = summary.files.len(),
        failed = summary.failures.len(),
        inserted = summary.inserted(),
        updated = summary.updated(),
        warnings = summary.warning_count(),
        "Ingest finished"
    );
    Ok(summary)
}

/// Seeds reference data, every year named by the plan, and the local
/// authorities named by local authority files, in one transaction.
fn seed_dimensions(
    store: &mut CoverageStore,
    plan: &LoadPlan,
    config: &CoverConfig,
) -> Result<SeedReport> {
    let mut years: BTreeSet<FinancialYear> = config.years.iter().collect();
    years.insert(config.reporting_year);
    years.extend(
        plan.units
            .iter()
            .flat_map(LoadUnit::sources)
            .filter_map(|source| source.year),
    );

    let mut tx = store.transaction()?;
    let mut report = seed_reference_data(&mut tx, CANONICAL_VACCINES, years)?;

    let dims = tx.dimensions()?;
    for unit in plan
        .units
        .iter()
        .filter(|unit| unit.kind() == StructureKind::LocalAuthority)
    {
        for source in unit.sources() {
            match read_table(source.clone()) {
                Ok(table) => report.areas += seed_areas(&mut tx, &utla_areas(&table, &dims))?,
                Err(err) => debug!(
                    file = %source.file_name,
                    error = %err,
                    "Cannot derive areas, file will fail at load"
                ),
            }
        }
    }

    tx.commit()?;
    Ok(report)
}

/// Reads and loads one unit in its own transaction.
fn load_unit(
    store: &mut CoverageStore,
    resolver: &mut VaccineNameResolver,
    unit: &LoadUnit,
    reporting_year: FinancialYear,
) -> Result<FileReport> {
    let span = info_span!("file", file = %unit.label(), structure = %unit.kind());
    let _guard = span.enter();

    match unit {
        LoadUnit::Single(source) => {
            let table = read_table(source.clone())?;
            let mut tx = store.transaction()?;
            let report = Loader::new(resolver, reporting_year).load_table(&mut tx, &table)?;
            record_sources(&mut tx, &[&table], &report)?;
            tx.commit()?;
            Ok(report)
        }
        LoadUnit::LocalAuthority {
            percentages,
            counts,
            ..
        } => {
            let percentages = percentages.clone().map(read_table).transpose()?;
            let counts = counts.clone().map(read_table).transpose()?;
            let mut tx = store.transaction()?;
            let report = Loader::new(resolver, reporting_year).load_local_authority(
                &mut tx,
                percentages.as_ref(),
                counts.as_ref(),
            )?;
            let tables: Vec<&ExtractedTable> = percentages.iter().chain(counts.iter()).collect();
            record_sources(&mut tx, &tables, &report)?;
            tx.commit()?;
            Ok(report)
        }
    }
}

/// Writes manifest rows for the files of a unit. Counts are per unit.
fn record_sources(
    tx: &mut StoreTx<'_>,
    tables: &[&ExtractedTable],
    report: &FileReport,
) -> Result<()> {
    let loaded_at = Utc::now();
    for table in tables {
        tx.record_source_file(&SourceFileRecord {
            file_name: table.source.file_name.clone(),
            sha256: table.sha256.clone(),
            structure: table.source.kind.to_string(),
            inserted: report.inserted,
            updated: report.updated,
            suppressed: report.suppressed,
            warnings: report.warnings.len(),
            loaded_at,
        })?;
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}
