//! Raw file reading into a ragged grid of cells.

mod grid;
mod reader;

pub use grid::Grid;
pub use reader::{parse_grid, read_grid, read_source, sha256_hex};
