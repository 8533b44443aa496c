//! # Stockload - inventory spreadsheet import into SQLite
//!
//! Stockload reads inventory exports (CSV or workbook, any common encoding),
//! maps their loosely named columns onto a fixed product schema, cleans the
//! values and replaces the contents of a SQLite database with the result.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌─────────────┐   ┌─────────────┐   ┌─────────────┐
//! │  CSV / XLSX │──▶│   Parser    │──▶│  Transform  │──▶│    Store    │──▶│   Report    │
//! │ (ISO/UTF8)  │   │ (auto-enc)  │   │ (map+clean) │   │  (SQLite)   │   │ (text/JSON) │
//! └─────────────┘   └─────────────┘   └─────────────┘   └─────────────┘   └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stockload::{import_file, ImportOptions};
//! use std::path::Path;
//!
//! fn main() {
//!     let report = import_file(Path::new("inventario.csv"), &ImportOptions::default()).unwrap();
//!     println!("Loaded {} products", report.rows_loaded);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (RawTable, CanonicalField, CanonicalRecord)
//! - [`parser`] - CSV and workbook reading with auto-detection
//! - [`transform`] - Aliases, reconciliation, normalization, dedupe and pipeline
//! - [`store`] - SQLite provisioning and loading
//! - [`report`] - Import summary
//! - [`logs`] - Tracing setup and progress helpers

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Destination
pub mod store;

// Output
pub mod logs;
pub mod report;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    AliasError,
    InputError,
    PipelineError,
    StoreError,
    PipelineResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    CanonicalField,
    CanonicalRecord,
    RawTable,
    SourceFormat,
    SourceInfo,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    read_table,
    parse_bytes_auto,
    detect_encoding,
    detect_delimiter,
    decode_content,
};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    AliasTable,
    reconcile,
    normalize,
    dedupe,
    SkipReason,
};

// =============================================================================
// Re-exports - Store
// =============================================================================

pub use store::{store_path, Store};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    import_file,
    import_table,
    prepare,
    ImportOptions,
    PreparedImport,
};

pub use report::ImportReport;
