//! High-level import API: file in, populated store and report out.
//!
//! ```text
//! read_table → reconcile → normalize → dedupe → provision → load → report
//! └──────────── pure, in memory ────────────┘ └──── store side effects ───┘
//! ```
//!
//! Input and alias-table errors surface before the store is opened, so a
//! bad file never wipes an existing destination.
//!
//! # Example
//!
//! ```rust,ignore
//! use stockload::{import_file, ImportOptions};
//! use std::path::Path;
//!
//! let report = import_file(Path::new("inventario.csv"), &ImportOptions::default())?;
//! println!("{}", report.render());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::aliases::AliasTable;
use super::dedupe::{dedupe, DedupeResult};
use super::normalize::{normalize, NormalizeSummary};
use super::reconcile::{reconcile, Binding, UnmappedReport};
use crate::error::PipelineResult;
use crate::logs::{log_debug, log_info, log_success, log_warning};
use crate::models::{CanonicalRecord, RawTable, SourceFormat};
use crate::parser::read_table;
use crate::report::ImportReport;
use crate::store::loader::load;
use crate::store::schema::provision;
use crate::store::{store_path, Store, DEFAULT_STORE_PATH};

/// Records shown in the debug preview before loading.
const PREVIEW_RECORDS: usize = 5;

/// Options for an import run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Destination store; `.db` is appended when missing.
    pub store_path: PathBuf,

    /// JSON alias table replacing the built-in one.
    #[serde(default)]
    pub alias_path: Option<PathBuf>,

    /// Delimiter for text input; auto-detected when `None`.
    #[serde(default)]
    pub delimiter: Option<char>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            alias_path: None,
            delimiter: None,
        }
    }
}

/// Output of the in-memory stages, ready to load.
#[derive(Debug, Clone)]
pub struct PreparedImport {
    pub bindings: Vec<Binding>,
    pub unmapped: UnmappedReport,
    pub summary: NormalizeSummary,
    pub unique: DedupeResult,
}

/// Import a file into the store described by `options`.
///
/// **Destructive**: the destination tables are dropped and rebuilt. Runs
/// against the same store must not overlap.
pub fn import_file(input: &Path, options: &ImportOptions) -> PipelineResult<ImportReport> {
    let started_at = Utc::now();

    let aliases = match options.alias_path {
        Some(ref path) => {
            log_info(format!("Using alias table: {}", path.display()));
            AliasTable::from_file(path)?
        }
        None => AliasTable::default(),
    };

    log_info(format!("Reading input file: {}", input.display()));
    let table = read_table(input, options.delimiter)?;

    let path = store_path(&options.store_path);
    log_info(format!("Opening database: {}", path.display()));
    let mut store = Store::open(&path)?;

    let mut report = run(&table, &mut store, &aliases, started_at)?;
    report.input = Some(input.to_path_buf());
    Ok(report)
}

/// Import an in-memory table into an open store.
pub fn import_table(
    table: &RawTable,
    store: &mut Store,
    aliases: &AliasTable,
) -> PipelineResult<ImportReport> {
    run(table, store, aliases, Utc::now())
}

/// Reconcile, normalize and deduplicate. No side effects.
pub fn prepare(table: &RawTable, aliases: &AliasTable) -> PreparedImport {
    print_source(table);

    let (mapped, unmapped) = reconcile(table, aliases);
    print_mapping(&mapped.bindings, &unmapped);

    let normalized = normalize(&mapped);
    print_normalize_summary(&normalized.summary);

    let unique = dedupe(normalized.records);
    if unique.removed > 0 {
        log_warning(format!(
            "{} duplicate natural keys removed (first occurrence kept)",
            unique.removed
        ));
    }
    log_success(format!("{} unique records ready", unique.records.len()));
    print_preview(&unique.records);

    PreparedImport {
        bindings: mapped.bindings,
        unmapped,
        summary: normalized.summary,
        unique,
    }
}

fn run(
    table: &RawTable,
    store: &mut Store,
    aliases: &AliasTable,
    started_at: DateTime<Utc>,
) -> PipelineResult<ImportReport> {
    let prepared = prepare(table, aliases);

    provision(store)?;
    let loaded = load(store, &prepared.unique.records)?;

    Ok(ImportReport {
        input: None,
        store: store.path().map(Path::to_path_buf),
        source: table.source.clone(),
        bindings: prepared.bindings,
        unbound_fields: prepared.unmapped.unbound_fields,
        ignored_columns: prepared.unmapped.ignored_columns,
        rows_read: prepared.summary.rows_read,
        rows_kept: prepared.summary.rows_kept,
        rows_dropped: prepared.summary.rows_dropped,
        skipped: prepared.summary.skipped,
        synthesized_keys: prepared.summary.synthesized_keys,
        duplicates_removed: prepared.unique.removed,
        rows_loaded: loaded.row_count,
        partitions: loaded.partitions,
        started_at,
        finished_at: Utc::now(),
    })
}

fn print_source(table: &RawTable) {
    match table.source.format {
        SourceFormat::Delimited => {
            log_success(format!("Detected encoding: {}", table.source.encoding));
            if let Some(d) = table.source.delimiter {
                log_success(format!("Detected separator: '{}'", format_delimiter(d)));
            }
        }
        SourceFormat::Spreadsheet => {
            log_success(format!("Reading sheet: '{}'", table.source.encoding));
        }
    }
    log_success(format!("Read {} rows", table.row_count()));

    log_info(format!("Input has {} columns:", table.headers.len()));
    for (i, col) in table.headers.iter().enumerate() {
        log_info(format!("[{:2}] {}", i + 1, col));
    }
}

fn print_mapping(bindings: &[Binding], unmapped: &UnmappedReport) {
    for binding in bindings {
        log_info(format!("{} → {}", binding.source, binding.field));
    }
    for field in &unmapped.unbound_fields {
        log_info(format!("(default) → {}", field));
    }
    if !unmapped.ignored_columns.is_empty() {
        log_info(format!(
            "Ignored columns: {}",
            unmapped.ignored_columns.join(", ")
        ));
    }
}

fn print_normalize_summary(summary: &NormalizeSummary) {
    log_success(format!("Processed {} records", summary.rows_kept));
    if summary.rows_dropped > 0 {
        log_warning(format!(
            "{} rows were removed due to missing or invalid data",
            summary.rows_dropped
        ));
    }
    if summary.synthesized_keys {
        log_warning("No usable natural key column, generating sequential keys");
    }
}

fn print_preview(records: &[CanonicalRecord]) {
    if records.is_empty() {
        return;
    }
    log_debug(format!("First {} records:", records.len().min(PREVIEW_RECORDS)));
    for line in preview_lines(records) {
        log_debug(line);
    }
}

/// `codigo_barras | nombre` for the first few records.
fn preview_lines(records: &[CanonicalRecord]) -> Vec<String> {
    records
        .iter()
        .take(PREVIEW_RECORDS)
        .map(|r| format!("{} | {}", r.natural_key, r.display_name))
        .collect()
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}
