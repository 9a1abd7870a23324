//! Error types for the unitsheet library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for unitsheet operations.
#[derive(Debug, Error)]
pub enum UnitSheetError {
    /// Cell reference without a row number (e.g. "AB").
    #[error("Malformed cell reference '{0}': no row number found")]
    MalformedCellReference(String),

    /// A sheet, column, row or cell addressed by a mutation does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A part index outside the parts of a compound unit.
    #[error("Part index {index} out of range (cell has {len} part(s))")]
    IndexOutOfRange { index: usize, len: usize },

    /// Precision or recall computed over a zero denominator.
    #[error("Undefined metric: {0}")]
    UndefinedMetric(String),

    /// A unit that does not resolve to a known quantity kind.
    #[error("Unresolved unit: {0}")]
    UnresolvedUnit(String),

    /// A dimension abbreviation that cannot be parsed.
    #[error("Invalid dimension '{0}'")]
    InvalidDimension(String),

    /// An annotation record that violates the single-compound-unit shape.
    #[error("Invalid annotation record: {0}")]
    InvalidRecord(String),

    /// Failure reported by the external unit parser.
    #[error("Unit parser error: {0}")]
    Parser(String),

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error saving or loading an annotation record.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl UnitSheetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        UnitSheetError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for unitsheet operations.
pub type Result<T> = std::result::Result<T, UnitSheetError>;
