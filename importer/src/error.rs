//! Error types for the import pipeline.
//!
//! - [`InputError`] - reading and decoding the source file
//! - [`AliasError`] - loading an operator-supplied alias table
//! - [`StoreError`] - provisioning and loading the SQLite store
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Value-level problems (bad quantities, unusable keys) are not errors:
//! the normalizer defaults or drops them and counts them in the report.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Input Errors
// =============================================================================

/// Errors while reading the source table. Always fatal, always raised
/// before the destination store is touched.
#[derive(Debug, Error)]
pub enum InputError {
    /// The input path does not exist.
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Content could not be decoded to text.
    #[error("Failed to decode input: {0}")]
    Encoding(String),

    /// The delimiter must be a single ASCII character.
    #[error("Delimiter {0:?} is not a single-byte ASCII character")]
    InvalidDelimiter(char),

    /// Malformed delimited text.
    #[error("Invalid CSV format: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook could not be opened or read.
    #[error("Invalid spreadsheet: {0}")]
    Spreadsheet(String),

    /// Empty file.
    #[error("Input file is empty")]
    EmptyFile,

    /// No header row.
    #[error("No header row found in input")]
    NoHeaders,
}

impl From<calamine::Error> for InputError {
    fn from(err: calamine::Error) -> Self {
        InputError::Spreadsheet(err.to_string())
    }
}

// =============================================================================
// Alias Table Errors
// =============================================================================

/// Errors from loading or validating an alias table.
#[derive(Debug, Error)]
pub enum AliasError {
    /// Failed to read the alias file.
    #[error("Failed to read alias file: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid JSON, or an unknown field name.
    #[error("Invalid alias table JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The same canonical field is listed twice.
    #[error("Field '{0}' appears more than once in the alias table")]
    DuplicateField(String),

    /// A field entry has no aliases, or an empty alias string.
    #[error("Field '{0}' has an empty alias list or an empty alias")]
    EmptyAlias(String),
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors from the destination store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Generic SQLite failure (open, provision, count queries).
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Insert failed; the whole batch was rolled back.
    #[error("Load aborted at record {row} (key '{natural_key}'), nothing committed: {source}")]
    LoadAborted {
        row: usize,
        natural_key: String,
        #[source]
        source: rusqlite::Error,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline error returned by [`crate::transform::import_file`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input error.
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Alias table error.
    #[error("Alias table error: {0}")]
    Alias(#[from] AliasError),

    /// Store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<rusqlite::Error> for PipelineError {
    fn from(err: rusqlite::Error) -> Self {
        PipelineError::Store(StoreError::Sqlite(err))
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for input operations.
pub type InputResult<T> = Result<T, InputError>;

/// Result type for alias table operations.
pub type AliasResult<T> = Result<T, AliasError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let input_err = InputError::EmptyFile;
        let pipeline_err: PipelineError = input_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        let alias_err = AliasError::DuplicateField("quantity".into());
        let pipeline_err: PipelineError = alias_err.into();
        assert!(pipeline_err.to_string().contains("quantity"));
    }

    #[test]
    fn test_not_found_names_path() {
        let err = InputError::NotFound(PathBuf::from("/tmp/missing.csv"));
        assert!(err.to_string().contains("/tmp/missing.csv"));
    }

    #[test]
    fn test_load_aborted_format() {
        let err = StoreError::LoadAborted {
            row: 3,
            natural_key: "123".into(),
            source: rusqlite::Error::QueryReturnedNoRows,
        };
        let msg = err.to_string();
        assert!(msg.contains("record 3"));
        assert!(msg.contains("'123'"));
        assert!(msg.contains("nothing committed"));
    }
}
