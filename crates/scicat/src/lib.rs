//! Scicat: catalogs of scientific measurements with asymmetric errors and references.
//!
//! Scicat keeps tabular measurements together with their positive and negative
//! uncertainties and the literature they came from, and renders them as
//! publication-ready table bodies.
//!
//! # Components
//!
//! - [`catalog`]: a directory-backed store with advisory locking and automatic backups
//! - [`format`]: typeset `value ± error` formatting driven by the errors' significant figures
//! - [`export`]: AASTeX table bodies with footnotes and citations
//!
//! # Example
//!
//! ```no_run
//! use scicat::{Catalog, CatalogOptions, Datum, Entry, ExportTable, Exporter, NewCatalog};
//!
//! let mut stars = Catalog::create(
//!     "stars",
//!     NewCatalog::new(["GJ 876"], ["Teff"]),
//!     CatalogOptions::default().with_editor("parke"),
//! )?;
//! stars.add_reference("vb14", "von Braun et al. 2014")?;
//! stars.set("GJ 876", "Teff", Entry::new(3129.0).with_error(19.0).with_reference("vb14"))?;
//!
//! let values = vec![vec![Datum::Number(3129.0)]];
//! let errors = vec![vec![Some(19.0)]];
//! let lines = Exporter::new().render(&ExportTable::new(&values).with_errors(&errors))?;
//! assert_eq!(lines[1], r"$ 3129 \pm 19 $\\");
//!
//! stars.close()?;
//! # Ok::<(), scicat::ScicatError>(())
//! ```

pub mod catalog;
pub mod datum;
pub mod error;
pub mod export;
pub mod format;
pub mod storage;

pub use catalog::{
    quick_lookup, AdvisoryLock, Catalog, CatalogOptions, CatalogWarning, MarkerFileLock,
    MemoryLock, NewCatalog, ReferenceDictionary,
};
pub use datum::{Datum, Entry, Field};
pub use error::{Result, ScicatError};
pub use export::{ExportConfig, ExportTable, Exporter};
pub use format::{Formatter, FormatterConfig, NumberFormat};
