//! Row-indexed, column-labeled grid.

use crate::error::{Result, ScicatError};

/// A rectangular table addressed by row key and column label.
///
/// Every row holds exactly one cell per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    index: Vec<String>,
    columns: Vec<String>,
    rows: Vec<Vec<T>>,
}

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `fill`.
    pub fn filled(index: Vec<String>, columns: Vec<String>, fill: T) -> Result<Self> {
        check_unique(&index, "row")?;
        check_unique(&columns, "column")?;
        let rows = vec![vec![fill; columns.len()]; index.len()];
        Ok(Self {
            index,
            columns,
            rows,
        })
    }

    /// Append a column with every cell set to `fill`.
    pub fn add_column(&mut self, name: impl Into<String>, fill: T) -> Result<()> {
        let name = name.into();
        if self.columns.contains(&name) {
            return Err(ScicatError::DuplicateKey(name));
        }
        self.columns.push(name);
        for row in &mut self.rows {
            row.push(fill.clone());
        }
        Ok(())
    }

    /// Append a row with every cell set to `fill`.
    pub fn add_row(&mut self, key: impl Into<String>, fill: T) -> Result<()> {
        let key = key.into();
        if self.index.contains(&key) {
            return Err(ScicatError::DuplicateKey(key));
        }
        self.index.push(key);
        self.rows.push(vec![fill; self.columns.len()]);
        Ok(())
    }
}

impl<T> Grid<T> {
    /// Build a grid from row-major data, checking its shape.
    pub fn from_rows(index: Vec<String>, columns: Vec<String>, rows: Vec<Vec<T>>) -> Result<Self> {
        check_unique(&index, "row")?;
        check_unique(&columns, "column")?;
        if rows.len() != index.len() {
            return Err(ScicatError::Dimension(format!(
                "{} rows of data for {} row keys",
                rows.len(),
                index.len()
            )));
        }
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(ScicatError::Dimension(format!(
                "row '{}' has {} cells for {} columns",
                index[i],
                row.len(),
                columns.len()
            )));
        }
        Ok(Self {
            index,
            columns,
            rows,
        })
    }

    /// Row keys, in order.
    pub fn index(&self) -> &[String] {
        &self.index
    }

    /// Column labels, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of a row key.
    pub fn row_position(&self, key: &str) -> Option<usize> {
        self.index.iter().position(|k| k == key)
    }

    /// Position of a column label.
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Get a cell by row key and column label.
    pub fn get(&self, row: &str, column: &str) -> Option<&T> {
        let r = self.row_position(row)?;
        let c = self.column_position(column)?;
        self.get_at(r, c)
    }

    /// Get a cell by position.
    pub fn get_at(&self, row: usize, column: usize) -> Option<&T> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Get a mutable cell by position.
    pub fn get_at_mut(&mut self, row: usize, column: usize) -> Option<&mut T> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(column))
    }

    /// Replace a cell by row key and column label.
    pub fn set(&mut self, row: &str, column: &str, value: T) -> Result<()> {
        let r = self
            .row_position(row)
            .ok_or_else(|| ScicatError::UnknownRow(row.to_string()))?;
        let c = self
            .column_position(column)
            .ok_or_else(|| ScicatError::UnknownColumn(column.to_string()))?;
        self.rows[r][c] = value;
        Ok(())
    }

    /// Rename a row key.
    pub fn rename_row(&mut self, old: &str, new: impl Into<String>) -> Result<()> {
        let new = new.into();
        let pos = self
            .row_position(old)
            .ok_or_else(|| ScicatError::UnknownRow(old.to_string()))?;
        if old != new && self.index.contains(&new) {
            return Err(ScicatError::DuplicateKey(new));
        }
        self.index[pos] = new;
        Ok(())
    }

    /// Rename a column label.
    pub fn rename_column(&mut self, old: &str, new: impl Into<String>) -> Result<()> {
        let new = new.into();
        let pos = self
            .column_position(old)
            .ok_or_else(|| ScicatError::UnknownColumn(old.to_string()))?;
        if old != new && self.columns.contains(&new) {
            return Err(ScicatError::DuplicateKey(new));
        }
        self.columns[pos] = new;
        Ok(())
    }

    /// Consume the grid, returning its row-major cells.
    pub fn into_rows(self) -> Vec<Vec<T>> {
        self.rows
    }

    /// Row-major data.
    pub fn rows(&self) -> &[Vec<T>] {
        &self.rows
    }

    /// Iterate over every cell as `(row key, column label, cell)`.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str, &T)> {
        self.index.iter().zip(&self.rows).flat_map(move |(key, row)| {
            self.columns
                .iter()
                .zip(row)
                .map(move |(col, cell)| (key.as_str(), col.as_str(), cell))
        })
    }

    /// Values of one column, in row order.
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = &T> {
        self.rows.iter().filter_map(move |row| row.get(column))
    }

    /// Transform every cell, keeping the labels.
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Grid<U> {
        Grid {
            index: self.index.clone(),
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .map(|row| row.iter().map(&f).collect())
                .collect(),
        }
    }

    /// Check that another grid has the same labels in the same order.
    pub fn same_labels<U>(&self, other: &Grid<U>) -> bool {
        self.index == other.index && self.columns == other.columns
    }
}

fn check_unique(keys: &[String], kind: &str) -> Result<()> {
    for (i, key) in keys.iter().enumerate() {
        if keys[..i].contains(key) {
            return Err(ScicatError::Dimension(format!(
                "{} key '{}' appears more than once",
                kind, key
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    fn sample() -> Grid<i32> {
        Grid::from_rows(
            labels(&["a", "b"]),
            labels(&["x", "y", "z"]),
            vec![vec![1, 2, 3], vec![4, 5, 6]],
        )
        .unwrap()
    }

    #[test]
    fn test_get_and_set() {
        let mut grid = sample();
        assert_eq!(grid.get("b", "y"), Some(&5));
        grid.set("a", "z", 30).unwrap();
        assert_eq!(grid.get_at(0, 2), Some(&30));
        assert!(matches!(grid.set("c", "x", 0), Err(ScicatError::UnknownRow(_))));
        assert!(matches!(grid.set("a", "w", 0), Err(ScicatError::UnknownColumn(_))));
    }

    #[test]
    fn test_from_rows_checks_shape() {
        let ragged =
            Grid::from_rows(labels(&["a", "b"]), labels(&["x"]), vec![vec![1], vec![2, 3]]);
        assert!(matches!(ragged, Err(ScicatError::Dimension(_))));
        let short = Grid::from_rows(labels(&["a", "b"]), labels(&["x"]), vec![vec![1]]);
        assert!(matches!(short, Err(ScicatError::Dimension(_))));
        let dup = Grid::from_rows(labels(&["a", "a"]), labels(&["x"]), vec![vec![1], vec![2]]);
        assert!(matches!(dup, Err(ScicatError::Dimension(_))));
    }

    #[test]
    fn test_add_row_and_column() {
        let mut grid = sample();
        grid.add_column("w", 0).unwrap();
        grid.add_row("c", -1).unwrap();
        assert_eq!(grid.column_count(), 4);
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.get("a", "w"), Some(&0));
        assert_eq!(grid.get("c", "x"), Some(&-1));
        assert!(matches!(grid.add_row("a", 0), Err(ScicatError::DuplicateKey(_))));
    }

    #[test]
    fn test_rename() {
        let mut grid = sample();
        grid.rename_row("a", "alpha").unwrap();
        grid.rename_column("x", "ex").unwrap();
        assert_eq!(grid.get("alpha", "ex"), Some(&1));
        assert!(matches!(grid.rename_row("a", "b"), Err(ScicatError::UnknownRow(_))));
        assert!(matches!(grid.rename_column("ex", "y"), Err(ScicatError::DuplicateKey(_))));
    }

    #[test]
    fn test_cells_iterates_row_major() {
        let grid = sample();
        let cells: Vec<_> = grid.cells().map(|(r, c, v)| (r, c, *v)).collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], ("a", "x", 1));
        assert_eq!(cells[5], ("b", "z", 6));
    }

    #[test]
    fn test_map_keeps_labels() {
        let grid = sample();
        let doubled = grid.map(|v| v * 2);
        assert!(grid.same_labels(&doubled));
        assert_eq!(doubled.get("b", "z"), Some(&12));
    }
}
