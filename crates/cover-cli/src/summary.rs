//! Terminal rendering of run summaries and store counts.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cover_load::RunSummary;
use cover_model::FactTable;
use cover_store::StoreCounts;

pub fn print_summary(summary: &RunSummary) {
    println!("Data directory: {}", summary.data_dir.display());
    println!(
        "Seeded: {} areas, {} vaccines, {} cohorts, {} years",
        summary.seeded.areas, summary.seeded.vaccines, summary.seeded.cohorts, summary.seeded.years
    );
    println!("{}", files_table(summary));
    print_warning_table(summary);
    println!();
    println!("Store:");
    println!("{}", counts_table(&summary.counts));
    let stats = summary.resolver;
    println!(
        "Resolver: {} lookups ({} cached), {} exact, {} alias, {} fuzzy, {} unresolved",
        stats.lookups, stats.cache_hits, stats.exact, stats.alias, stats.fuzzy, stats.unresolved
    );
    if !summary.failures.is_empty() {
        eprintln!("Failed files:");
        for failure in &summary.failures {
            eprintln!("- {}: {}", failure.file, failure.error);
        }
    }
}

/// Pretty JSON form of a run summary, as printed by `ingest --json`.
pub fn summary_json(summary: &RunSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}

/// One row per loaded unit plus a total row.
pub fn files_table(summary: &RunSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Structure"),
        header_cell("Fact table"),
        header_cell("Rows"),
        header_cell("Inserted"),
        header_cell("Updated"),
        header_cell("Suppressed"),
        header_cell("Warnings"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 3..8 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total_rows = 0usize;
    let mut total_suppressed = 0usize;
    for report in &summary.files {
        total_rows += report.rows;
        total_suppressed += report.suppressed;
        table.add_row(vec![
            Cell::new(&report.label)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(report.structure),
            Cell::new(report.table),
            Cell::new(report.rows),
            count_cell(report.inserted, Color::Green),
            count_cell(report.updated, Color::Cyan),
            dim_cell(report.suppressed),
            count_cell(report.warnings.len(), Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} loaded", summary.files.len())).add_attribute(Attribute::Bold),
        failed_cell(summary.failures.len()),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        count_cell(summary.inserted(), Color::Green).add_attribute(Attribute::Bold),
        count_cell(summary.updated(), Color::Cyan).add_attribute(Attribute::Bold),
        dim_cell(total_suppressed),
        count_cell(summary.warning_count(), Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    table
}

fn print_warning_table(summary: &RunSummary) {
    if summary.warning_count() == 0 {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Table"), header_cell("Warning")]);
    apply_table_style(&mut table);
    for report in &summary.files {
        for warning in &report.warnings {
            table.add_row(vec![
                Cell::new(&report.label).fg(Color::Blue),
                Cell::new(warning.to_string()).fg(Color::Yellow),
            ]);
        }
    }
    println!();
    println!("Warnings:");
    println!("{table}");
}

/// Row counts for the dimension and fact tables.
pub fn counts_table(counts: &StoreCounts) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Table"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    let dimensions = [
        ("geographic_areas", counts.geographic_areas),
        ("vaccines", counts.vaccines),
        ("age_cohorts", counts.age_cohorts),
        ("financial_years", counts.financial_years),
    ];
    for (name, rows) in dimensions {
        table.add_row(vec![dim_cell(name), Cell::new(rows)]);
    }
    for fact in FactTable::ALL {
        table.add_row(vec![Cell::new(fact.table_name()), Cell::new(counts.fact(fact))]);
    }
    table.add_row(vec![
        Cell::new("facts total")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(counts.facts_total()).add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn failed_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(format!("{count} failed"))
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
