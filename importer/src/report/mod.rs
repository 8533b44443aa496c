//! Import report: what was read, kept, dropped and committed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::PathBuf;

use crate::models::{CanonicalField, SourceInfo};
use crate::store::loader::PartitionCount;
use crate::transform::normalize::{SkipReason, SkippedRow};
use crate::transform::reconcile::Binding;

/// Row numbers shown per skip reason before eliding.
const SAMPLE_ROWS: usize = 5;

/// Outcome of one import run.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub input: Option<PathBuf>,
    pub store: Option<PathBuf>,
    pub source: SourceInfo,

    pub bindings: Vec<Binding>,
    pub unbound_fields: Vec<CanonicalField>,
    pub ignored_columns: Vec<String>,

    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_dropped: usize,
    pub skipped: Vec<SkippedRow>,
    pub synthesized_keys: bool,
    pub duplicates_removed: usize,

    pub rows_loaded: usize,
    pub partitions: Vec<PartitionCount>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ImportReport {
    /// Dropped source rows grouped by reason.
    pub fn skipped_by_reason(&self) -> BTreeMap<SkipReason, Vec<usize>> {
        let mut reasons: BTreeMap<SkipReason, Vec<usize>> = BTreeMap::new();
        for skip in &self.skipped {
            reasons.entry(skip.reason).or_default().push(skip.row);
        }
        reasons
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable summary for the terminal.
    pub fn render(&self) -> String {
        let mut out = String::new();

        if let Some(ref store) = self.store {
            let _ = writeln!(out, "Database: {}", store.display());
        }
        let _ = writeln!(
            out,
            "Rows read: {}  kept: {}  dropped: {}  duplicates removed: {}",
            self.rows_read, self.rows_kept, self.rows_dropped, self.duplicates_removed
        );

        for (reason, rows) in self.skipped_by_reason() {
            let sample: Vec<String> = rows.iter().take(SAMPLE_ROWS).map(|r| r.to_string()).collect();
            let more = if rows.len() > SAMPLE_ROWS {
                format!(" ... +{}", rows.len() - SAMPLE_ROWS)
            } else {
                String::new()
            };
            let _ = writeln!(
                out,
                "  - {}: {} (rows: {}{})",
                reason.describe(),
                rows.len(),
                sample.join(", "),
                more
            );
        }

        if !self.unbound_fields.is_empty() {
            let fields: Vec<&str> = self.unbound_fields.iter().map(|f| f.as_str()).collect();
            let _ = writeln!(out, "Defaulted fields (no source column): {}", fields.join(", "));
        }
        if !self.ignored_columns.is_empty() {
            let _ = writeln!(out, "Ignored columns: {}", self.ignored_columns.join(", "));
        }
        if self.synthesized_keys {
            let _ = writeln!(out, "No usable natural key column: keys were generated");
        }

        let _ = writeln!(out, "Total products: {}", self.rows_loaded);
        if !self.partitions.is_empty() {
            let _ = writeln!(out, "Product count by partition:");
            for p in &self.partitions {
                let _ = writeln!(out, "- {}: {}", p.partition, p.count);
            }
        }
        out
    }
}
