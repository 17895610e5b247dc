//! Ragged cell grid.

/// Every record of a CSV file as trimmed text, rows of unequal length
/// allowed. Preamble rows, the header and data all live here; nothing is
/// interpreted at this level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, idx: usize) -> Option<&[String]> {
        self.rows.get(idx).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell text, or `""` when the row is shorter than `col`.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map_or("", String::as_str)
    }

    /// Widest row length.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_rows_read_as_empty_cells() {
        let grid = Grid::new(vec![
            vec!["Title".to_string()],
            vec!["Code".to_string(), "Name".to_string(), "Region".to_string()],
        ]);
        assert_eq!(grid.cell(0, 2), "");
        assert_eq!(grid.cell(1, 2), "Region");
        assert_eq!(grid.cell(9, 0), "");
        assert_eq!(grid.width(), 3);
    }
}
