//! Generic tabular storage: labeled grids and their CSV files.

mod file;
mod grid;

pub use file::{parse_grid, read_grid, write_grid};
pub use grid::Grid;
