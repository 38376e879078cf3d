//! Persistent catalogs of values with asymmetric errors and references.
//!
//! A catalog lives in a directory of four aligned tables (values, positive
//! errors, negative errors, reference keys) plus a reference dictionary. In
//! memory it is a single grid of [`Entry`](crate::datum::Entry) records; the
//! four tables exist only on disk.
//!
//! Writers take an advisory lock when opening and get a timestamped backup
//! under `archive/`. Every mutation is written through to disk immediately.

mod archive;
#[allow(clippy::module_inception)]
mod catalog;
mod keys;
mod layout;
mod lock;
mod quick;
mod references;
mod warning;

pub use archive::{
    create_snapshot_dir, latest_snapshot, list_snapshots, remove_snapshot, STAMP_FORMAT,
};
pub use catalog::{Catalog, CatalogOptions, NewCatalog, DEFAULT_EDITOR};
pub use keys::Keys;
pub use layout::{CatalogLayout, ARCHIVE_DIR, DICTIONARY_FILE, LOCK_FILE, TABLE_SUFFIX};
pub use lock::{AdvisoryLock, MarkerFileLock, MemoryLock};
pub use quick::quick_lookup;
pub use references::{check_entry, ReferenceDictionary};
pub use warning::CatalogWarning;
