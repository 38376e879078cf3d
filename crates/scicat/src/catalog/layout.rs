//! On-disk layout of a catalog directory and conversion between the single
//! entry grid and the four per-field tables.
//!
//! ```text
//! stars/
//! ├── values.csv
//! ├── errors_positive.csv
//! ├── errors_negative.csv
//! ├── references.csv
//! ├── reference_dictionary.txt
//! ├── user_accessing.txt          # only while an editor has it open
//! └── archive/
//!     └── 20261019T101500/        # same files, one directory per backup
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::datum::{is_null_text, number_text, Datum, Entry, Field};
use crate::error::{Result, ScicatError};
use crate::storage::{read_grid, write_grid, Grid};

use super::references::ReferenceDictionary;

/// Extension of the table files.
pub const TABLE_SUFFIX: &str = "csv";

/// Reference dictionary file name.
pub const DICTIONARY_FILE: &str = "reference_dictionary.txt";

/// Lock marker file name.
pub const LOCK_FILE: &str = "user_accessing.txt";

/// Backup subdirectory name.
pub const ARCHIVE_DIR: &str = "archive";

/// Paths of the files that make up one catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLayout {
    root: PathBuf,
}

impl CatalogLayout {
    /// Layout rooted at a catalog directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The catalog directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory name, used as the catalog's name.
    pub fn name(&self) -> String {
        self.root
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Table file for one field.
    pub fn table(&self, field: Field) -> PathBuf {
        self.root
            .join(format!("{}.{}", field.table_name(), TABLE_SUFFIX))
    }

    /// Reference dictionary file.
    pub fn dictionary(&self) -> PathBuf {
        self.root.join(DICTIONARY_FILE)
    }

    /// Lock marker file.
    pub fn lock_marker(&self) -> PathBuf {
        self.root.join(LOCK_FILE)
    }

    /// Backup directory.
    pub fn archive(&self) -> PathBuf {
        self.root.join(ARCHIVE_DIR)
    }

    /// Whether this layout is itself a backup inside another catalog's archive.
    pub fn is_snapshot(&self) -> bool {
        self.root
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|name| name == ARCHIVE_DIR)
    }

    /// Read the four tables and the reference dictionary.
    pub fn read(&self) -> Result<(Grid<Entry>, ReferenceDictionary)> {
        let [values, err_pos, err_neg, refs] = Field::ALL.map(|field| read_grid(self.table(field)));
        let (values, err_pos, err_neg, refs) = (values?, err_pos?, err_neg?, refs?);

        for (field, grid) in [
            (Field::ErrPos, &err_pos),
            (Field::ErrNeg, &err_neg),
            (Field::Reference, &refs),
        ] {
            if !values.same_labels(grid) {
                return Err(ScicatError::Dimension(format!(
                    "'{}' does not share the rows and columns of '{}'",
                    self.table(field).display(),
                    self.table(Field::Value).display()
                )));
            }
        }

        let mut rows = Vec::with_capacity(values.row_count());
        for r in 0..values.row_count() {
            let mut row = Vec::with_capacity(values.column_count());
            for c in 0..values.column_count() {
                let cell = |grid: &Grid<String>| grid.get_at(r, c).cloned().unwrap_or_default();
                row.push(Entry {
                    value: Datum::from_cell(&cell(&values)),
                    err_pos: self.parse_error(&cell(&err_pos), Field::ErrPos, r)?,
                    err_neg: self.parse_error(&cell(&err_neg), Field::ErrNeg, r)?,
                    reference: parse_reference(&cell(&refs)),
                });
            }
            rows.push(row);
        }
        let entries = Grid::from_rows(values.index().to_vec(), values.columns().to_vec(), rows)?;

        let dictionary_path = self.dictionary();
        let references = if dictionary_path.exists() {
            ReferenceDictionary::load(&dictionary_path)?
        } else {
            debug!(path = %dictionary_path.display(), "no reference dictionary; starting empty");
            ReferenceDictionary::new()
        };

        Ok((entries, references))
    }

    /// Write the four tables and the reference dictionary, creating the
    /// directory if needed.
    pub fn write(&self, entries: &Grid<Entry>, references: &ReferenceDictionary) -> Result<()> {
        std::fs::create_dir_all(&self.root).map_err(|e| ScicatError::io(&self.root, e))?;
        for field in Field::ALL {
            write_grid(self.table(field), &field_grid(entries, field))?;
        }
        references.save(self.dictionary())?;
        debug!(root = %self.root.display(), "catalog written");
        Ok(())
    }

    fn parse_error(&self, raw: &str, field: Field, row: usize) -> Result<Option<f64>> {
        match Datum::parse(raw) {
            Datum::Number(x) => Ok(Some(x)),
            Datum::Null => Ok(None),
            Datum::Text(text) => Err(ScicatError::Parse {
                path: self.table(field),
                line: row + 2,
                message: format!("'{}' is not a number", text),
            }),
        }
    }
}

/// Render one field of every entry as table text.
pub fn field_grid(entries: &Grid<Entry>, field: Field) -> Grid<String> {
    entries.map(|entry| field_text(entry, field))
}

/// Table text for one field of an entry.
pub fn field_text(entry: &Entry, field: Field) -> String {
    let error = |e: Option<f64>| {
        e.filter(|x| x.is_finite())
            .map_or_else(|| field.null_marker().to_string(), number_text)
    };
    match field {
        Field::Value => entry
            .value
            .to_cell()
            .unwrap_or_else(|| field.null_marker().to_string()),
        Field::ErrPos => error(entry.err_pos),
        Field::ErrNeg => error(entry.err_neg),
        Field::Reference => entry
            .reference
            .clone()
            .filter(|r| !is_null_text(r))
            .unwrap_or_else(|| field.null_marker().to_string()),
    }
}

/// Read one cell of the reference table.
pub fn parse_reference(raw: &str) -> Option<String> {
    if is_null_text(raw) {
        None
    } else {
        Some(raw.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let layout = CatalogLayout::new("/data/stars");
        assert_eq!(layout.name(), "stars");
        assert_eq!(layout.table(Field::ErrNeg), Path::new("/data/stars/errors_negative.csv"));
        assert_eq!(layout.dictionary(), Path::new("/data/stars/reference_dictionary.txt"));
        assert_eq!(layout.lock_marker(), Path::new("/data/stars/user_accessing.txt"));
        assert!(!layout.is_snapshot());
        assert!(CatalogLayout::new("/data/stars/archive/20260101T000000").is_snapshot());
    }

    #[test]
    fn test_field_text_null_markers() {
        let entry = Entry::null();
        assert_eq!(field_text(&entry, Field::Value), "");
        assert_eq!(field_text(&entry, Field::ErrPos), "");
        assert_eq!(field_text(&entry, Field::Reference), "none");

        let entry = Entry::new("G2V").with_errors(0.1, 2e-6).with_reference("gray06");
        assert_eq!(field_text(&entry, Field::Value), "G2V");
        assert_eq!(field_text(&entry, Field::ErrNeg), "0.1");
        assert_eq!(field_text(&entry, Field::ErrPos), "2e-6");
        assert_eq!(field_text(&entry, Field::Reference), "gray06");
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::TempDir::new().unwrap();
        let layout = CatalogLayout::new(dir.path().join("cat"));
        let mut entries = Grid::filled(
            vec!["GJ 876".to_string(), "GJ 581".to_string()],
            vec!["Teff".to_string(), "SpT".to_string()],
            Entry::null(),
        )
        .unwrap();
        let teff = Entry::new(3129.0)
            .with_errors(19.0, 21.0)
            .with_reference("vb14");
        entries.set("GJ 876", "Teff", teff).unwrap();
        entries.set("GJ 581", "SpT", Entry::new("M3V")).unwrap();
        let references: ReferenceDictionary =
            [("vb14", "von Braun et al. 2014")].into_iter().collect();

        layout.write(&entries, &references).unwrap();
        let (read_entries, read_references) = layout.read().unwrap();

        assert_eq!(read_entries, entries);
        assert_eq!(read_references, references);
    }

    #[test]
    fn test_read_rejects_misaligned_tables() {
        let dir = tempfile::TempDir::new().unwrap();
        let layout = CatalogLayout::new(dir.path().join("cat"));
        let entries =
            Grid::filled(vec!["a".to_string()], vec!["x".to_string()], Entry::null()).unwrap();
        layout.write(&entries, &ReferenceDictionary::new()).unwrap();
        std::fs::write(layout.table(Field::ErrNeg), ",y\na,\n").unwrap();

        assert!(matches!(layout.read(), Err(ScicatError::Dimension(_))));
    }

    #[test]
    fn test_read_rejects_text_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let layout = CatalogLayout::new(dir.path().join("cat"));
        let entries =
            Grid::filled(vec!["a".to_string()], vec!["x".to_string()], Entry::null()).unwrap();
        layout.write(&entries, &ReferenceDictionary::new()).unwrap();
        std::fs::write(layout.table(Field::ErrPos), ",x\na,big\n").unwrap();

        assert!(matches!(layout.read(), Err(ScicatError::Parse { line: 2, .. })));
    }
}
