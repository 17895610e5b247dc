//! Reading one source file into an extracted table.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use cover_model::LoadWarning;

use crate::classify::{SourceTable, identify};
use crate::columns::{ValueColumns, extract_value_columns};
use crate::source::{parse_grid, read_source, sha256_hex};
use crate::error::Result;
use crate::header::{HeaderLocation, locate_header};
use crate::rows::{DataRow, extract_data_rows};

/// Data rows and value columns of one source file.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedTable {
    pub source: SourceTable,
    /// Hex SHA-256 of the file bytes.
    pub sha256: String,
    pub header: HeaderLocation,
    /// Header row cells as read.
    pub headers: Vec<String>,
    pub columns: ValueColumns,
    pub rows: Vec<DataRow>,
    /// Structural warnings found while reading.
    pub warnings: Vec<LoadWarning>,
}

/// Classifies and reads a file.
pub fn read_table_path(path: &Path) -> Result<ExtractedTable> {
    read_table(identify(path)?)
}

/// Reads a classified file: locates its header, extracts its value
/// columns and keeps its data rows.
pub fn read_table(source: SourceTable) -> Result<ExtractedTable> {
    let bytes = read_source(&source.path)?;
    let sha256 = sha256_hex(&bytes);
    let grid = parse_grid(&bytes, &source.path)?;
    let layout = source.kind.layout();

    let mut warnings = Vec::new();

    let header = locate_header(&grid, layout.header_indicator);
    if !header.found {
        warn!(
            file = %source.file_name,
            indicator = layout.header_indicator,
            "Header row not found, using row 0"
        );
        warnings.push(LoadWarning::HeaderNotFound {
            indicator: layout.header_indicator.to_string(),
        });
    }

    let headers = grid.row(header.row).map(<[String]>::to_vec).unwrap_or_default();
    let columns = extract_value_columns(&headers, layout);
    if columns.is_empty() {
        warn!(
            file = %source.file_name,
            header_row = header.row,
            "No value columns in header row"
        );
        warnings.push(LoadWarning::NoValueColumns {
            header_row: header.row,
        });
    }

    let rows = extract_data_rows(&grid, header.row, source.kind);
    debug!(
        file = %source.file_name,
        kind = %source.kind,
        header_row = header.row,
        columns = columns.len(),
        rows = rows.len(),
        grid_rows = grid.len(),
        "Extracted table"
    );

    Ok(ExtractedTable {
        source,
        sha256,
        header,
        headers,
        columns,
        rows,
        warnings,
    })
}
