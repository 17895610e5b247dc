//! Header row detection.

use serde::Serialize;

use crate::source::Grid;

/// Where the header row was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderLocation {
    /// 0-based row index in the grid.
    pub row: usize,
    /// False when no row contained the indicator and row 0 was assumed.
    pub found: bool,
}

/// Finds the first row where any cell contains `indicator`.
///
/// Falls back to row 0 with `found == false` when no row matches.
pub fn locate_header(grid: &Grid, indicator: &str) -> HeaderLocation {
    grid.rows()
        .iter()
        .position(|cells| cells.iter().any(|cell| cell.contains(indicator)))
        .map_or(
            HeaderLocation {
                row: 0,
                found: false,
            },
            |row| HeaderLocation { row, found: true },
        )
}
