//! Error types for the Mivisor library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Mivisor operations.
#[derive(Debug, Error)]
pub enum MivisorError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The project directory has no `config.yml`.
    #[error("Project configuration not found: {path}")]
    MissingConfig { path: PathBuf },

    /// A required persisted document is absent.
    #[error("Document not found: {path}")]
    NotFound { path: PathBuf },

    /// A persisted document could not be parsed.
    #[error("Parse error in '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    /// A derived column name collides with an existing column.
    #[error("Column '{0}' already exists")]
    DuplicateColumn(String),

    /// The named column does not exist in the dataset.
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// A role cannot be assigned to a column.
    #[error("Cannot mark column '{column}' as {role}: {reason}")]
    InvalidRoleAssignment {
        column: String,
        role: String,
        reason: String,
    },

    /// Data-entry validation failed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The workbook could not be opened.
    #[error("Cannot open workbook '{path}': {message}")]
    WorkbookOpen { path: PathBuf, message: String },

    /// A worksheet could not be read.
    #[error("Cannot read sheet '{sheet}': {message}")]
    SheetRead { sheet: String, message: String },

    /// An import is already running.
    #[error("An import is already in progress")]
    ImportInProgress,

    /// The import worker stopped without producing a result.
    #[error("Import failed: {0}")]
    ImportFailed(String),

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl MivisorError {
    /// Whether the error ends the session that raised it.
    ///
    /// Only a missing project configuration is terminal; everything else is
    /// reported and the user may retry.
    pub fn is_fatal(&self) -> bool {
        matches!(self, MivisorError::MissingConfig { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MivisorError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        MivisorError::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for Mivisor operations.
pub type Result<T> = std::result::Result<T, MivisorError>;
