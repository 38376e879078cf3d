//! Soft validation findings reported while editing a catalog.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A non-fatal problem noticed during a catalog operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CatalogWarning {
    /// A reference key is used but has no dictionary entry.
    UndefinedReference { key: String },
    /// A dictionary entry was replaced with a different definition.
    ReferenceRedefined {
        key: String,
        previous: String,
        definition: String,
    },
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogWarning::UndefinedReference { key } => write!(
                f,
                "reference key '{}' is not in the reference dictionary; add it with add_reference",
                key
            ),
            CatalogWarning::ReferenceRedefined {
                key,
                previous,
                definition,
            } => write!(
                f,
                "reference '{}' was '{}', replaced with '{}'",
                key, previous, definition
            ),
        }
    }
}
