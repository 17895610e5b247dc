use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};
use tracing::{info, info_span};

use cover_ingest::read_table_path;
use cover_load::{ConfigOverrides, CoverConfig, RunSummary, run_ingest};
use cover_map::{CANONICAL_VACCINES, MatchMethod, Resolution, VaccineNameResolver};
use cover_store::CoverageStore;

use cover_cli::summary::{
    align_column, apply_table_style, counts_table, dim_cell, header_cell,
};

use crate::cli::{ClassifyArgs, IngestArgs, ResolveArgs, StatusArgs};

pub fn run_ingest_command(args: &IngestArgs) -> Result<RunSummary> {
    let overrides = ConfigOverrides {
        database: args.database.clone(),
        reporting_year: args.reporting_year.clone(),
        fuzzy_threshold: args.fuzzy_threshold,
    };
    let config = CoverConfig::load(args.config.as_deref(), Some(&args.data_dir), &overrides)
        .context("load configuration")?;

    let mut store = if args.dry_run {
        info!("Dry run, loading into an in-memory store");
        CoverageStore::open_in_memory().context("open in-memory store")?
    } else {
        open_store(&config.database, true)?
    };

    run_ingest(&mut store, &args.data_dir, &config)
        .with_context(|| format!("ingest {}", args.data_dir.display()))
}

/// Returns false when any file could not be read or classified.
pub fn run_classify(args: &ClassifyArgs) -> Result<bool> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Structure"),
        header_cell("Table"),
        header_cell("Header row"),
        header_cell("Data rows"),
        header_cell("Value columns"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);

    let mut all_ok = true;
    for path in &args.files {
        let span = info_span!("file", file = %path.display());
        let _guard = span.enter();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        match read_table_path(path) {
            Ok(extracted) => {
                let header = if extracted.header.found {
                    Cell::new(extracted.header.row)
                } else {
                    Cell::new(format!("{} (fallback)", extracted.header.row)).fg(Color::Yellow)
                };
                table.add_row(vec![
                    Cell::new(name),
                    Cell::new(extracted.source.kind),
                    Cell::new(extracted.source.table_id),
                    header,
                    Cell::new(extracted.rows.len()),
                    Cell::new(extracted.columns.len()),
                ]);
            }
            Err(err) => {
                all_ok = false;
                table.add_row(vec![
                    Cell::new(name),
                    Cell::new(err.to_string()).fg(Color::Red),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                ]);
            }
        }
    }
    println!("{table}");
    Ok(all_ok)
}

/// Returns false when any header stayed unresolved.
pub fn run_resolve(args: &ResolveArgs) -> Result<bool> {
    let mut resolver = match args.fuzzy_threshold {
        Some(threshold) => VaccineNameResolver::with_threshold(threshold)
            .context("build vaccine resolver")?,
        None => VaccineNameResolver::new(),
    };

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Header"),
        header_cell("Vaccine"),
        header_cell("Method"),
        header_cell("Score"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);

    let mut all_resolved = true;
    for header in &args.headers {
        let row = match resolver.resolve_detailed(header) {
            Resolution::Matched {
                vaccine_code,
                method,
                score,
            } => vec![
                Cell::new(header),
                Cell::new(vaccine_code)
                    .fg(Color::Green)
                    .add_attribute(Attribute::Bold),
                Cell::new(method_label(method)),
                Cell::new(format!("{score:.2}")),
            ],
            Resolution::Unresolved {
                best_candidate,
                best_score,
                ..
            } => {
                all_resolved = false;
                let closest = best_candidate.map_or_else(
                    || "-".to_string(),
                    |code| format!("closest {code}"),
                );
                vec![
                    Cell::new(header),
                    Cell::new("UNRESOLVED")
                        .fg(Color::Red)
                        .add_attribute(Attribute::Bold),
                    dim_cell(closest),
                    dim_cell(format!("{best_score:.2}")),
                ]
            }
        };
        table.add_row(row);
    }
    println!("{table}");
    Ok(all_resolved)
}

pub fn run_vaccines() {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Name"),
        header_cell("Aliases"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    for vaccine in CANONICAL_VACCINES {
        let aliases = if vaccine.aliases.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(vaccine.aliases.join(", "))
        };
        table.add_row(vec![
            Cell::new(vaccine.code)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(vaccine.name),
            aliases,
            Cell::new(vaccine.description),
        ]);
    }
    println!("{table}");
}

pub fn run_status(args: &StatusArgs) -> Result<()> {
    let overrides = ConfigOverrides {
        database: args.database.clone(),
        ..ConfigOverrides::default()
    };
    let config = CoverConfig::load(None, None, &overrides).context("load configuration")?;
    let store = open_store(&config.database, false)?;
    let counts = store.counts().context("count rows")?;
    println!("Database: {}", config.database.display());
    println!("{}", counts_table(&counts));

    let manifest = store.source_files().context("read load manifest")?;
    if !manifest.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("File"),
            header_cell("Structure"),
            header_cell("Inserted"),
            header_cell("Updated"),
            header_cell("Warnings"),
            header_cell("Loaded at"),
        ]);
        apply_table_style(&mut table);
        for record in manifest {
            table.add_row(vec![
                Cell::new(record.file_name),
                Cell::new(record.structure),
                Cell::new(record.inserted),
                Cell::new(record.updated),
                Cell::new(record.warnings),
                dim_cell(record.loaded_at.to_rfc3339()),
            ]);
        }
        println!();
        println!("Loaded files:");
        println!("{table}");
    }
    Ok(())
}

fn open_store(path: &Path, create: bool) -> Result<CoverageStore> {
    if create {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
    } else if !path.exists() {
        bail!("database not found: {}", path.display());
    }
    CoverageStore::open(path).with_context(|| format!("open database {}", path.display()))
}

fn method_label(method: MatchMethod) -> &'static str {
    match method {
        MatchMethod::Exact => "exact",
        MatchMethod::Alias => "alias",
        MatchMethod::Fuzzy => "fuzzy",
    }
}
