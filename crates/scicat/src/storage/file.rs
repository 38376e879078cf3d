//! CSV files holding one labeled grid each.
//!
//! The first header cell is left empty; the remaining header cells label the
//! columns and the first field of every record is its row key.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;

use tracing::debug;

use crate::error::{Result, ScicatError};

use super::grid::Grid;

/// Read a labeled grid of raw cell text from a CSV file.
pub fn read_grid(path: impl AsRef<Path>) -> Result<Grid<String>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ScicatError::io(path, e))?;
    parse_grid(BufReader::new(file), path)
}

/// Parse a labeled grid from any reader; `path` is only used in error messages.
pub fn parse_grid(reader: impl Read, path: &Path) -> Result<Grid<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(ScicatError::Parse {
            path: path.to_path_buf(),
            line: 1,
            message: "missing header row".to_string(),
        });
    }
    let columns: Vec<String> = headers.iter().skip(1).map(|s| s.to_string()).collect();

    let mut index = Vec::new();
    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let Some(key) = record.get(0) else {
            continue;
        };
        let mut row: Vec<String> = record.iter().skip(1).map(|s| s.to_string()).collect();

        // Pad short records, drop surplus fields
        row.resize(columns.len(), String::new());

        if index.contains(&key.to_string()) {
            return Err(ScicatError::Parse {
                path: path.to_path_buf(),
                line: i + 2,
                message: format!("duplicate row key '{}'", key),
            });
        }
        index.push(key.to_string());
        rows.push(row);
    }

    Grid::from_rows(index, columns, rows)
}

/// Write a labeled grid of cell text to a CSV file, replacing any existing file.
pub fn write_grid(path: impl AsRef<Path>, grid: &Grid<String>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| ScicatError::io(path, e))?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));

    let header = std::iter::once("").chain(grid.columns().iter().map(String::as_str));
    writer.write_record(header)?;
    for (key, row) in grid.index().iter().zip(grid.rows()) {
        let record = std::iter::once(key.as_str()).chain(row.iter().map(String::as_str));
        writer.write_record(record)?;
    }

    writer.flush().map_err(|e| ScicatError::io(path, e))?;

    debug!(path = %path.display(), rows = grid.row_count(), "wrote table");
    Ok(())
}
