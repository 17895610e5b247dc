//! Fact loading.
//!
//! Each layout has its own strategy that turns an extracted table into a
//! batch of facts against a snapshot of the dimension tables. The batch is
//! then upserted through a [`CoverageWriter`]. Reference failures skip the
//! affected record and are kept as warnings; only writer errors abort.

mod cells;
mod local_authority;
mod program;
mod regional;
mod vaccine;

use serde::Serialize;
use tracing::{info, warn};

use cover_ingest::ExtractedTable;
use cover_map::VaccineNameResolver;
use cover_model::{
    CoverageWriter, FactTable, FinancialYear, LoadWarning, SheetRole, StructureKind,
    UpsertOutcome,
};

pub use cells::{PERCENT_DECIMALS, bounded_percentage};
pub use regional::regional_vaccine;

use cells::FactBatch;

/// Outcome of loading one unit (a file, or a pair of sheets).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    /// Table label such as `T1` or `T4a+T4b`.
    pub label: String,
    pub files: Vec<String>,
    pub structure: StructureKind,
    pub table: FactTable,
    /// Data rows read.
    pub rows: usize,
    pub inserted: usize,
    pub updated: usize,
    /// Cells with nothing measured. They never create a row; an existing
    /// row for the same key is nulled and counted as updated.
    pub suppressed: usize,
    pub warnings: Vec<LoadWarning>,
}

/// Warnings for one unit, logged as they are recorded.
#[derive(Debug)]
pub(crate) struct WarningLog {
    file: String,
    items: Vec<LoadWarning>,
}

impl WarningLog {
    /// Starts from warnings already raised (and logged) while reading.
    fn new(file: String, inherited: impl IntoIterator<Item = LoadWarning>) -> Self {
        Self {
            file,
            items: inherited.into_iter().collect(),
        }
    }

    pub(crate) fn record(&mut self, warning: LoadWarning) {
        warn!(file = %self.file, "{warning}");
        self.items.push(warning);
    }
}

/// Loads extracted tables, sharing one resolver across every file of a run.
pub struct Loader<'r> {
    resolver: &'r mut VaccineNameResolver,
    reporting_year: FinancialYear,
}

impl<'r> Loader<'r> {
    /// `reporting_year` applies to single-year tables whose file name has no
    /// year token.
    pub fn new(resolver: &'r mut VaccineNameResolver, reporting_year: FinancialYear) -> Self {
        Self {
            resolver,
            reporting_year,
        }
    }

    /// Loads one table. A local authority sheet loads on its own.
    pub fn load_table<W: CoverageWriter>(
        &mut self,
        writer: &mut W,
        table: &ExtractedTable,
    ) -> Result<FileReport, W::Error> {
        let dims = writer.dimensions()?;
        let mut warnings = WarningLog::new(
            table.source.file_name.clone(),
            table.warnings.iter().cloned(),
        );
        let batch = match table.source.kind {
            StructureKind::National => vaccine::national_facts(
                table,
                table.source.year.unwrap_or(self.reporting_year),
                self.resolver,
                &dims,
                &mut warnings,
            ),
            StructureKind::TimeSeries => {
                vaccine::time_series_facts(table, self.resolver, &dims, &mut warnings)
            }
            StructureKind::RegionalTimeSeries => {
                regional::regional_facts(table, &dims, &mut warnings)
            }
            StructureKind::SpecialProgram => program::special_program_facts(
                table,
                self.reporting_year,
                &dims,
                &mut warnings,
            ),
            StructureKind::LocalAuthority => {
                let (percentages, counts) = match table.source.sheet_role() {
                    SheetRole::Percentages => (Some(table), None),
                    SheetRole::Counts => (None, Some(table)),
                };
                local_authority::local_authority_facts(
                    percentages,
                    counts,
                    self.reporting_year,
                    self.resolver,
                    &dims,
                    &mut warnings,
                )
            }
        };

        write_batch(writer, &[table], batch, warnings)
    }

    /// Loads the percentage and count sheets of a local authority table
    /// together. Either may be missing.
    pub fn load_local_authority<W: CoverageWriter>(
        &mut self,
        writer: &mut W,
        percentages: Option<&ExtractedTable>,
        counts: Option<&ExtractedTable>,
    ) -> Result<FileReport, W::Error> {
        let sources: Vec<&ExtractedTable> = percentages.into_iter().chain(counts).collect();
        let dims = writer.dimensions()?;
        let mut warnings = WarningLog::new(
            file_names(&sources).join(", "),
            sources.iter().flat_map(|table| table.warnings.iter().cloned()),
        );
        let batch = local_authority::local_authority_facts(
            percentages,
            counts,
            self.reporting_year,
            self.resolver,
            &dims,
            &mut warnings,
        );

        write_batch(writer, &sources, batch, warnings)
    }
}

fn file_names(sources: &[&ExtractedTable]) -> Vec<String> {
    sources
        .iter()
        .map(|table| table.source.file_name.clone())
        .collect()
}

fn write_batch<W: CoverageWriter>(
    writer: &mut W,
    sources: &[&ExtractedTable],
    batch: FactBatch,
    warnings: WarningLog,
) -> Result<FileReport, W::Error> {
    let structure = sources
        .first()
        .map_or(StructureKind::LocalAuthority, |table| table.source.kind);
    let mut report = FileReport {
        label: sources
            .iter()
            .map(|table| table.source.table_id.to_string())
            .collect::<Vec<_>>()
            .join("+"),
        files: file_names(sources),
        structure,
        table: structure.fact_table(),
        rows: batch.rows,
        inserted: 0,
        updated: 0,
        suppressed: batch.suppressed.len(),
        warnings: warnings.items,
    };

    for fact in &batch.facts {
        match writer.upsert_fact(fact)? {
            UpsertOutcome::Inserted => report.inserted += 1,
            UpsertOutcome::Updated => report.updated += 1,
        }
    }
    for fact in &batch.suppressed {
        if writer.update_fact(fact)? {
            report.updated += 1;
        }
    }

    info!(
        file = %report.label,
        table = %report.table,
        rows = report.rows,
        inserted = report.inserted,
        updated = report.updated,
        suppressed = report.suppressed,
        warnings = report.warnings.len(),
        "Loaded facts"
    );
    Ok(report)
}
