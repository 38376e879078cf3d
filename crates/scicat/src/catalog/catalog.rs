//! The catalog: a grid of entries synchronized with its directory on disk.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info, warn};

use crate::datum::{is_null_text, Datum, Entry};
use crate::error::{Result, ScicatError};
use crate::storage::Grid;

use super::archive;
use super::keys::Keys;
use super::layout::CatalogLayout;
use super::lock::{AdvisoryLock, MarkerFileLock};
use super::references::{self, ReferenceDictionary};
use super::warning::CatalogWarning;

/// Relative tolerance for numeric equality.
const RELATIVE_TOLERANCE: f64 = 1e-5;

/// Absolute tolerance for numeric equality.
const ABSOLUTE_TOLERANCE: f64 = 1e-8;

/// Editor identity used when none is supplied.
pub const DEFAULT_EDITOR: &str = "unknown";

/// How a catalog is opened.
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    /// Open without taking the lock; every mutation fails.
    pub read_only: bool,
    /// Identity recorded in the lock marker.
    pub editor: String,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            read_only: false,
            editor: DEFAULT_EDITOR.to_string(),
        }
    }
}

impl CatalogOptions {
    /// Options for a read-only session.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    /// Set the editor identity.
    pub fn with_editor(mut self, editor: impl Into<String>) -> Self {
        self.editor = editor.into();
        self
    }

    /// Set read-only mode.
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

/// Schema and optional data for a catalog that does not exist yet.
///
/// Tables left unset are filled with nulls. Supplied tables must have one row
/// per row key and one cell per column.
#[derive(Debug, Clone, Default)]
pub struct NewCatalog {
    rows: Vec<String>,
    columns: Vec<String>,
    values: Option<Vec<Vec<Datum>>>,
    err_pos: Option<Vec<Vec<Option<f64>>>>,
    err_neg: Option<Vec<Vec<Option<f64>>>>,
    references: Option<Vec<Vec<Option<String>>>>,
    dictionary: ReferenceDictionary,
}

impl NewCatalog {
    /// Empty catalog with the given row keys and column labels.
    pub fn new<R, C>(rows: R, columns: C) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows.into_iter().map(Into::into).collect(),
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Initial values.
    pub fn with_values(mut self, values: Vec<Vec<Datum>>) -> Self {
        self.values = Some(values);
        self
    }

    /// Initial positive errors.
    pub fn with_err_pos(mut self, err_pos: Vec<Vec<Option<f64>>>) -> Self {
        self.err_pos = Some(err_pos);
        self
    }

    /// Initial negative errors.
    pub fn with_err_neg(mut self, err_neg: Vec<Vec<Option<f64>>>) -> Self {
        self.err_neg = Some(err_neg);
        self
    }

    /// Initial reference keys.
    pub fn with_references(mut self, references: Vec<Vec<Option<String>>>) -> Self {
        self.references = Some(references);
        self
    }

    /// Initial reference dictionary.
    pub fn with_dictionary(mut self, dictionary: ReferenceDictionary) -> Self {
        self.dictionary = dictionary;
        self
    }

    /// Assemble the entry grid, checking every supplied table's shape.
    fn build(self) -> Result<(Grid<Entry>, ReferenceDictionary)> {
        let (rows, columns) = (self.rows, self.columns);
        let mut entries = Grid::filled(rows.clone(), columns.clone(), Entry::null())?;

        fn apply<T>(
            entries: &mut Grid<Entry>,
            data: Option<Vec<Vec<T>>>,
            rows: &[String],
            columns: &[String],
            mut assign: impl FnMut(&mut Entry, T),
        ) -> Result<()> {
            let Some(data) = data else {
                return Ok(());
            };
            let grid = Grid::from_rows(rows.to_vec(), columns.to_vec(), data)?;
            for (r, row) in grid.into_rows().into_iter().enumerate() {
                for (c, cell) in row.into_iter().enumerate() {
                    if let Some(entry) = entries.get_at_mut(r, c) {
                        assign(entry, cell);
                    }
                }
            }
            Ok(())
        }

        apply(&mut entries, self.values, &rows, &columns, |e, v| e.value = v)?;
        apply(&mut entries, self.err_pos, &rows, &columns, |e, v| e.err_pos = v)?;
        apply(&mut entries, self.err_neg, &rows, &columns, |e, v| e.err_neg = v)?;
        apply(&mut entries, self.references, &rows, &columns, |e, v| e.reference = v)?;

        for (key, definition) in self.dictionary.iter() {
            references::check_entry(key, definition)?;
        }
        let entries = entries.map(normalize);
        Ok((entries, self.dictionary))
    }
}

/// A writer's hold on a catalog.
struct Session {
    lock: Box<dyn AdvisoryLock>,
    editor: String,
    /// Backup taken when the session began.
    backup: Option<PathBuf>,
}

/// Tabular scientific data: values with positive and negative errors and
/// reference keys, kept in sync with a catalog directory.
///
/// A catalog opened for writing holds an advisory lock and takes a backup on
/// open; [`Catalog::close`] releases the lock and discards the backup when
/// nothing changed. Read-only catalogs need no closing.
///
/// ```no_run
/// use scicat::catalog::{Catalog, CatalogOptions, NewCatalog};
/// use scicat::Entry;
///
/// let mut stars = Catalog::create(
///     "stars",
///     NewCatalog::new(["GJ 876", "GJ 581"], ["Teff", "mass"]),
///     CatalogOptions::default().with_editor("parke"),
/// )?;
/// stars.add_reference("vb14", "von Braun et al. 2014, MNRAS 438, 2413")?;
/// stars.set("GJ 876", "Teff", Entry::new(3129.0).with_errors(19.0, 19.0).with_reference("vb14"))?;
/// stars.close()?;
/// # Ok::<(), scicat::ScicatError>(())
/// ```
pub struct Catalog {
    layout: CatalogLayout,
    entries: Grid<Entry>,
    references: ReferenceDictionary,
    read_only: bool,
    session: Option<Session>,
    warnings: Vec<CatalogWarning>,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("root", &self.layout.root())
            .field("rows", &self.entries.row_count())
            .field("columns", &self.entries.column_count())
            .field("read_only", &self.read_only)
            .field("editor", &self.editor())
            .finish()
    }
}

impl Catalog {
    /// Open an existing catalog, locking it with its marker file unless read-only.
    pub fn open(root: impl AsRef<Path>, options: CatalogOptions) -> Result<Self> {
        let layout = CatalogLayout::new(root.as_ref());
        let lock = MarkerFileLock::new(layout.lock_marker());
        Self::open_with_lock(root, options, lock)
    }

    /// Open an existing catalog for reading only.
    pub fn open_read_only(root: impl AsRef<Path>) -> Result<Self> {
        Self::open(root, CatalogOptions::read_only())
    }

    /// Open an existing catalog using a caller-supplied lock.
    ///
    /// Writers fail with [`ScicatError::Locked`] while another editor holds the
    /// lock. A backup is taken on open unless the catalog is itself a backup.
    pub fn open_with_lock(
        root: impl AsRef<Path>,
        options: CatalogOptions,
        lock: impl AdvisoryLock + 'static,
    ) -> Result<Self> {
        let layout = CatalogLayout::new(root.as_ref());
        if !layout.root().is_dir() {
            return Err(ScicatError::NotFound {
                path: layout.root().to_path_buf(),
            });
        }

        if options.read_only {
            let (entries, references) = layout.read()?;
            info!(catalog = %layout.name(), "opened read-only; changes cannot be saved");
            return Ok(Self {
                layout,
                entries,
                references,
                read_only: true,
                session: None,
                warnings: Vec::new(),
            });
        }

        lock.acquire(&options.editor)?;
        let (entries, references) = match layout.read() {
            Ok(loaded) => loaded,
            Err(e) => {
                lock.release()?;
                return Err(e);
            }
        };

        let mut catalog = Self {
            layout,
            entries,
            references,
            read_only: false,
            session: Some(Session {
                lock: Box::new(lock),
                editor: options.editor,
                backup: None,
            }),
            warnings: Vec::new(),
        };

        if !catalog.layout.is_snapshot() {
            match catalog.backup() {
                Ok(dir) => {
                    if let Some(session) = catalog.session.as_mut() {
                        session.backup = Some(dir);
                    }
                }
                Err(e) => {
                    catalog.release_lock()?;
                    return Err(e);
                }
            }
        }

        info!(
            catalog = %catalog.name(),
            editor = %catalog.editor().unwrap_or(DEFAULT_EDITOR),
            "opened for editing; call close() when done so others can edit"
        );
        Ok(catalog)
    }

    /// Create a catalog at a location that does not exist yet and persist it.
    ///
    /// Fails with [`ScicatError::Conflict`] if anything exists at `root`.
    pub fn create(
        root: impl AsRef<Path>,
        new: NewCatalog,
        options: CatalogOptions,
    ) -> Result<Self> {
        let layout = CatalogLayout::new(root.as_ref());
        let lock = MarkerFileLock::new(layout.lock_marker());
        Self::create_with_lock(root, new, options, lock)
    }

    /// Create a catalog using a caller-supplied lock.
    ///
    /// Nothing is left on disk when creation fails.
    pub fn create_with_lock(
        root: impl AsRef<Path>,
        new: NewCatalog,
        options: CatalogOptions,
        lock: impl AdvisoryLock + 'static,
    ) -> Result<Self> {
        let layout = CatalogLayout::new(root.as_ref());
        if layout.root().exists() {
            return Err(ScicatError::Conflict {
                path: layout.root().to_path_buf(),
            });
        }

        let (entries, references) = new.build()?;
        let archive = layout.archive();
        std::fs::create_dir_all(&archive).map_err(|e| ScicatError::io(&archive, e))?;

        let session = if options.read_only {
            None
        } else {
            if let Err(e) = lock.acquire(&options.editor) {
                discard_dir(layout.root());
                return Err(e);
            }
            Some(Session {
                lock: Box::new(lock),
                editor: options.editor,
                backup: None,
            })
        };

        let mut catalog = Self {
            layout,
            entries,
            references,
            read_only: false,
            session,
            warnings: Vec::new(),
        };

        let keys: Vec<String> = catalog
            .entries
            .cells()
            .filter_map(|(_, _, entry)| entry.reference.clone())
            .collect();
        for key in keys {
            catalog.check_reference(Some(&key));
        }

        if let Err(e) = catalog.persist() {
            let released = catalog.release_lock();
            discard_dir(catalog.layout.root());
            released?;
            return Err(e);
        }
        catalog.read_only = options.read_only;

        info!(catalog = %catalog.name(), rows = catalog.len(), "created catalog");
        Ok(catalog)
    }

    /// Write a full copy of this catalog to a new location and open it for editing.
    pub fn copy_to(&self, root: impl AsRef<Path>, options: CatalogOptions) -> Result<Self> {
        fn field_rows<T>(entries: &Grid<Entry>, field: impl Fn(&Entry) -> T) -> Vec<Vec<T>> {
            entries
                .rows()
                .iter()
                .map(|row| row.iter().map(&field).collect())
                .collect()
        }

        let new = NewCatalog {
            rows: self.entries.index().to_vec(),
            columns: self.entries.columns().to_vec(),
            values: Some(field_rows(&self.entries, |e| e.value.clone())),
            err_pos: Some(field_rows(&self.entries, |e| e.err_pos)),
            err_neg: Some(field_rows(&self.entries, |e| e.err_neg)),
            references: Some(field_rows(&self.entries, |e| e.reference.clone())),
            dictionary: self.references.clone(),
        };
        Self::create(root, new, options)
    }

    // ------------------------------------------------------------------
    // Reading
    // ------------------------------------------------------------------

    /// The catalog directory.
    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    /// The catalog name (its directory name).
    pub fn name(&self) -> String {
        self.layout.name()
    }

    /// Whether mutations are refused.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Identity of the editor holding this session, if writable.
    pub fn editor(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.editor.as_str())
    }

    /// Backup taken when this session opened.
    pub fn session_backup(&self) -> Option<&Path> {
        self.session.as_ref().and_then(|s| s.backup.as_deref())
    }

    /// Row keys, in order.
    pub fn rows(&self) -> &[String] {
        self.entries.index()
    }

    /// Column labels, in order.
    pub fn columns(&self) -> &[String] {
        self.entries.columns()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.entries.row_count()
    }

    /// Check whether the catalog has no rows.
    pub fn is_empty(&self) -> bool {
        self.entries.row_count() == 0
    }

    /// Entry at a row and column.
    pub fn get(&self, row: &str, column: &str) -> Option<&Entry> {
        self.entries.get(row, column)
    }

    /// Values of one column as `(row key, value)` pairs.
    pub fn column(&self, column: &str) -> Option<Vec<(&str, &Datum)>> {
        let c = self.entries.column_position(column)?;
        Some(
            self.entries
                .index()
                .iter()
                .map(String::as_str)
                .zip(self.entries.column_values(c).map(|e| &e.value))
                .collect(),
        )
    }

    /// Iterate over every entry as `(row key, column label, entry)`.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &Entry)> {
        self.entries.cells()
    }

    /// Plain-text description of one entry: `value (+errpos, -errneg) [ref]`.
    pub fn describe(&self, row: &str, column: &str) -> Option<String> {
        self.get(row, column).map(Entry::to_string)
    }

    /// The reference dictionary.
    pub fn references(&self) -> &ReferenceDictionary {
        &self.references
    }

    /// Definition of a reference key.
    pub fn reference(&self, key: &str) -> Option<&str> {
        self.references.get(key)
    }

    /// Warnings raised so far in this session.
    pub fn warnings(&self) -> &[CatalogWarning] {
        &self.warnings
    }

    /// Take and clear the accumulated warnings.
    pub fn take_warnings(&mut self) -> Vec<CatalogWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Backups in this catalog's archive, oldest first.
    pub fn snapshots(&self) -> Result<Vec<PathBuf>> {
        archive::list_snapshots(&self.layout.archive())
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Overwrite the entry at every selected cell with `entry`.
    ///
    /// Either `rows` or `columns` may list several keys, in which case `entry` is
    /// broadcast along it. Every field of the target cells is replaced, so fields
    /// left unset in `entry` become null. All targets are checked before anything
    /// changes and the batch is written to disk once.
    pub fn set(
        &mut self,
        rows: impl Into<Keys>,
        columns: impl Into<Keys>,
        entry: Entry,
    ) -> Result<()> {
        let targets = self.resolve(rows.into(), columns.into())?;
        let entries = vec![entry; targets.len()];
        self.write_entries(targets, entries)
    }

    /// Like [`Catalog::set`], but with one entry per selected cell.
    pub fn set_many(
        &mut self,
        rows: impl Into<Keys>,
        columns: impl Into<Keys>,
        entries: Vec<Entry>,
    ) -> Result<()> {
        let targets = self.resolve(rows.into(), columns.into())?;
        if entries.len() != targets.len() {
            return Err(ScicatError::Dimension(format!(
                "{} entries given for {} cells",
                entries.len(),
                targets.len()
            )));
        }
        self.write_entries(targets, entries)
    }

    /// Append a column of null entries.
    pub fn add_column(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        self.commit(|entries| entries.add_column(name, Entry::null()))
    }

    /// Append a row of null entries.
    pub fn add_row(&mut self, key: impl Into<String>) -> Result<()> {
        let key = key.into();
        self.commit(|entries| entries.add_row(key, Entry::null()))
    }

    /// Rename a column.
    pub fn rename_column(&mut self, old: &str, new: impl Into<String>) -> Result<()> {
        let new = new.into();
        self.commit(|entries| entries.rename_column(old, new))
    }

    /// Rename a row.
    pub fn rename_row(&mut self, old: &str, new: impl Into<String>) -> Result<()> {
        let new = new.into();
        self.commit(|entries| entries.rename_row(old, new))
    }

    /// Define or redefine a reference key.
    ///
    /// Replacing an existing key with a different definition raises a warning.
    /// Text that would not reload unchanged is rejected with [`ScicatError::Config`].
    pub fn add_reference(
        &mut self,
        key: impl Into<String>,
        definition: impl Into<String>,
    ) -> Result<()> {
        self.ensure_writable()?;
        let (key, definition) = (key.into(), definition.into());
        references::check_entry(&key, &definition)?;

        let previous = self.references.insert(key.clone(), definition.clone());
        if let Err(e) = self.references.save(self.layout.dictionary()) {
            match &previous {
                Some(old) => self.references.insert(key, old.clone()),
                None => self.references.remove(&key),
            };
            return Err(e);
        }

        if let Some(previous) = previous.filter(|old| *old != definition) {
            self.raise(CatalogWarning::ReferenceRedefined {
                key,
                previous,
                definition,
            });
        }
        Ok(())
    }

    /// Warn if `key` is a non-null reference missing from the dictionary.
    pub fn check_reference(&mut self, key: Option<&str>) {
        let Some(key) = key.filter(|k| !is_null_text(k)) else {
            return;
        };
        if !self.references.contains(key) {
            self.raise(CatalogWarning::UndefinedReference {
                key: key.to_string(),
            });
        }
    }

    /// Write every table and the dictionary to disk.
    pub fn save(&self) -> Result<()> {
        self.ensure_writable()?;
        self.persist()
    }

    /// Copy the current state into a new timestamped directory under `archive/`.
    pub fn backup(&self) -> Result<PathBuf> {
        self.ensure_writable()?;
        let dir = archive::create_snapshot_dir(&self.layout.archive(), Local::now())?;
        CatalogLayout::new(&dir).write(&self.entries, &self.references)?;
        debug!(backup = %dir.display(), "backed up catalog");
        Ok(dir)
    }

    /// End the editing session.
    ///
    /// Discards the backup taken on open when the catalog still equals it, then
    /// releases the lock. Does nothing for read-only catalogs.
    pub fn close(mut self) -> Result<()> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };

        let pruned = match &session.backup {
            Some(dir) if dir.is_dir() => self.prune_backup(dir),
            _ => Ok(()),
        };
        session.lock.release()?;
        info!(catalog = %self.name(), editor = %session.editor, "closed catalog");
        pruned
    }

    fn prune_backup(&self, dir: &Path) -> Result<()> {
        let snapshot = Catalog::open_read_only(dir)?;
        if snapshot == *self {
            archive::remove_snapshot(dir)?;
            debug!(backup = %dir.display(), "no changes this session; removed backup");
        } else {
            debug!(backup = %dir.display(), "catalog changed; keeping backup");
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn ensure_writable(&self) -> Result<()> {
        if self.read_only {
            Err(ScicatError::ReadOnly {
                path: self.layout.root().to_path_buf(),
            })
        } else {
            Ok(())
        }
    }

    /// Positions of every selected cell, checked against the schema.
    fn resolve(&self, rows: Keys, columns: Keys) -> Result<Vec<(usize, usize)>> {
        self.ensure_writable()?;
        if rows.is_many() && columns.is_many() {
            return Err(ScicatError::AmbiguousBroadcast);
        }

        let rows = rows
            .into_vec()
            .into_iter()
            .map(|key| self.entries.row_position(&key).ok_or(ScicatError::UnknownRow(key)))
            .collect::<Result<Vec<_>>>()?;
        let columns = columns
            .into_vec()
            .into_iter()
            .map(|name| {
                self.entries
                    .column_position(&name)
                    .ok_or(ScicatError::UnknownColumn(name))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(rows
            .iter()
            .flat_map(|&r| columns.iter().map(move |&c| (r, c)))
            .collect())
    }

    fn write_entries(&mut self, targets: Vec<(usize, usize)>, entries: Vec<Entry>) -> Result<()> {
        let entries: Vec<Entry> = entries.into_iter().map(|e| normalize(&e)).collect();
        let keys: Vec<String> = entries.iter().filter_map(|e| e.reference.clone()).collect();

        self.commit(|grid| {
            for (&(r, c), entry) in targets.iter().zip(entries) {
                if let Some(cell) = grid.get_at_mut(r, c) {
                    *cell = entry;
                }
            }
            Ok(())
        })?;

        for key in keys {
            self.check_reference(Some(&key));
        }
        Ok(())
    }

    /// Apply a change to the entry grid and persist it, restoring the previous
    /// grid if either step fails.
    fn commit(&mut self, change: impl FnOnce(&mut Grid<Entry>) -> Result<()>) -> Result<()> {
        self.ensure_writable()?;
        let previous = self.entries.clone();
        let result = change(&mut self.entries).and_then(|()| self.persist());
        if result.is_err() {
            self.entries = previous;
        }
        result
    }

    fn persist(&self) -> Result<()> {
        self.layout.write(&self.entries, &self.references)
    }

    fn raise(&mut self, warning: CatalogWarning) {
        warn!(catalog = %self.layout.name(), "{}", warning);
        self.warnings.push(warning);
    }

    fn release_lock(&mut self) -> Result<()> {
        match self.session.take() {
            Some(session) => session.lock.release(),
            None => Ok(()),
        }
    }
}

impl PartialEq for Catalog {
    /// Same rows and columns in any order, matching entries, identical dictionaries.
    ///
    /// Numbers match within tolerance and nulls always match each other.
    fn eq(&self, other: &Self) -> bool {
        let sorted = |keys: &[String]| {
            let mut keys = keys.to_vec();
            keys.sort();
            keys
        };
        if sorted(self.columns()) != sorted(other.columns())
            || sorted(self.rows()) != sorted(other.rows())
        {
            return false;
        }

        self.entries.cells().all(|(row, column, entry)| {
            other
                .get(row, column)
                .is_some_and(|theirs| entries_match(entry, theirs))
        }) && self.references == other.references
    }
}

/// Best-effort removal of a half-created catalog directory.
fn discard_dir(root: &Path) {
    if let Err(e) = std::fs::remove_dir_all(root) {
        warn!(root = %root.display(), error = %e, "could not remove partial catalog");
    }
}

/// Null sentinels for anything non-finite or marked `none`.
fn normalize(entry: &Entry) -> Entry {
    Entry {
        value: if entry.value.is_null() {
            Datum::Null
        } else {
            entry.value.clone()
        },
        err_pos: entry.err_pos.filter(|x| x.is_finite()),
        err_neg: entry.err_neg.filter(|x| x.is_finite()),
        reference: entry
            .reference
            .as_deref()
            .filter(|r| !is_null_text(r))
            .map(|r| r.trim().to_string()),
    }
}

fn entries_match(a: &Entry, b: &Entry) -> bool {
    datums_match(&a.value, &b.value)
        && errors_match(a.err_pos, b.err_pos)
        && errors_match(a.err_neg, b.err_neg)
        && a.reference == b.reference
}

fn datums_match(a: &Datum, b: &Datum) -> bool {
    if a.is_null() && b.is_null() {
        return true;
    }
    match (a, b) {
        (Datum::Number(x), Datum::Number(y)) => is_close(*x, *y),
        (Datum::Text(x), Datum::Text(y)) => x == y,
        _ => false,
    }
}

fn errors_match(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => is_close(x, y),
        _ => false,
    }
}

fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= ABSOLUTE_TOLERANCE + RELATIVE_TOLERANCE * b.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_close() {
        assert!(is_close(1.0, 1.0 + 1e-7));
        assert!(is_close(0.0, 1e-9));
        assert!(!is_close(1.0, 1.001));
    }

    #[test]
    fn test_datums_match_nulls_of_any_kind() {
        assert!(datums_match(&Datum::Null, &Datum::Number(f64::NAN)));
        assert!(datums_match(&Datum::Text("none".to_string()), &Datum::Null));
        assert!(!datums_match(&Datum::Number(1.0), &Datum::Text("1".to_string())));
    }

    #[test]
    fn test_normalize() {
        let entry = Entry {
            value: Datum::Number(f64::INFINITY),
            err_pos: Some(f64::NAN),
            err_neg: Some(0.5),
            reference: Some("None".to_string()),
        };
        let normalized = normalize(&entry);
        assert_eq!(normalized.value, Datum::Null);
        assert_eq!(normalized.err_pos, None);
        assert_eq!(normalized.err_neg, Some(0.5));
        assert_eq!(normalized.reference, None);
    }

    #[test]
    fn test_new_catalog_checks_shape() {
        let new = NewCatalog::new(["a", "b"], ["x"]).with_values(vec![vec![Datum::Number(1.0)]]);
        assert!(matches!(new.build(), Err(ScicatError::Dimension(_))));
    }

    #[test]
    fn test_new_catalog_fills_nulls() {
        let new = NewCatalog::new(["a"], ["x", "y"])
            .with_values(vec![vec![Datum::Number(2.0), Datum::Null]])
            .with_references(vec![vec![Some("k".to_string()), Some("none".to_string())]]);
        let (entries, _) = new.build().unwrap();

        assert_eq!(entries.get("a", "x"), Some(&Entry::new(2.0).with_reference("k")));
        assert_eq!(entries.get("a", "y"), Some(&Entry::null()));
    }
}
