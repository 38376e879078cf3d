//! Error types for the scicat library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scicat operations.
#[derive(Debug, Error)]
pub enum ScicatError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing rendered output to a caller-supplied writer.
    #[error("Failed to write output: {0}")]
    Write(#[source] std::io::Error),

    /// Malformed table or dictionary content.
    #[error("Parse error in '{path}' at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid settings, or input that cannot be stored and read back unchanged.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unrecognized format token.
    #[error("Format error: {0}")]
    Format(String),

    /// Inputs that must share a shape do not.
    #[error("Dimension mismatch: {0}")]
    Dimension(String),

    /// A catalog already exists where one was to be created.
    #[error("A catalog already exists at '{path}'; choose another location or delete it first")]
    Conflict { path: PathBuf },

    /// No catalog exists at the given location.
    #[error("No catalog found at '{path}'")]
    NotFound { path: PathBuf },

    /// Another editor holds the catalog lock.
    #[error(
        "Catalog is currently in use by {holder}. If {holder} is no longer editing it, \
         remove the lock marker to regain access."
    )]
    Locked { holder: String },

    /// Row key not present in the catalog schema.
    #[error("'{0}' is not a row in the catalog; add it with add_row first")]
    UnknownRow(String),

    /// Column key not present in the catalog schema.
    #[error("'{0}' is not a column in the catalog; add it with add_column first")]
    UnknownColumn(String),

    /// A row or column key that already exists.
    #[error("'{0}' already exists in the catalog")]
    DuplicateKey(String),

    /// Both rows and columns were given as sequences.
    #[error("Only one of rows and columns may hold multiple keys")]
    AmbiguousBroadcast,

    /// A mutating operation on a catalog opened read-only.
    #[error("Catalog '{path}' was opened read-only")]
    ReadOnly { path: PathBuf },
}

impl ScicatError {
    /// Wrap an IO error with the path it concerns.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScicatError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for scicat operations.
pub type Result<T> = std::result::Result<T, ScicatError>;
