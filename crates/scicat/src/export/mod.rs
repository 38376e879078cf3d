//! Publication table export.
//!
//! Values are rendered through [`Formatter`](crate::format::Formatter); notes
//! become `\tablenotemark` footnotes and reference keys become either inline
//! `\citet` citations or numbers listed in a `\tablerefs` legend.

mod exporter;
mod notes;

pub use exporter::{ErrorTables, ExportConfig, ExportTable, Exporter};
pub use notes::{note_mark, split_keys, NoteMarks, ReferenceNumbers};
