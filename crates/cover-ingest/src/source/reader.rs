//! CSV file reading without a fixed header position.

use std::path::Path;

use sha2::Digest;

use crate::error::{IngestError, Result};

use super::grid::Grid;

/// Maximum file size for CSV loading (100 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 100 * 1024 * 1024;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Check file size before loading.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_CSV_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::open(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Validate the leading bytes of a file. UTF-16 byte-order marks are
/// rejected; a UTF-8 BOM is accepted and stripped by [`parse_grid`].
pub fn validate_encoding(bytes: &[u8], path: &Path) -> Result<()> {
    if bytes.len() >= 2 {
        if bytes[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if bytes[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }
    Ok(())
}

/// Hex SHA-256 digest of a file's bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    hex::encode(digest)
}

/// Reads a file's bytes after the size and encoding checks.
pub fn read_source(path: &Path) -> Result<Vec<u8>> {
    check_file_size(path)?;
    let bytes = std::fs::read(path).map_err(|e| IngestError::open(path, e))?;
    validate_encoding(&bytes, path)?;
    Ok(bytes)
}

/// Parses CSV bytes into a [`Grid`].
///
/// Every record is kept, including title and notes rows above the header.
/// Records may have differing field counts. Invalid UTF-8 sequences are
/// replaced rather than rejected.
pub fn parse_grid(bytes: &[u8], path: &Path) -> Result<Grid> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        rows.push(
            record
                .iter()
                .map(|field| String::from_utf8_lossy(field).trim().to_string())
                .collect(),
        );
    }

    if rows.is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    Ok(Grid::new(rows))
}

/// Reads and parses a CSV file into a [`Grid`].
pub fn read_grid(path: &Path) -> Result<Grid> {
    let bytes = read_source(path)?;
    parse_grid(&bytes, path)
}
