//! Record normalization: mapped rows to canonical records.
//!
//! Cleaning is lenient. A bad quantity becomes `0` and an unusable key drops
//! the row; nothing here returns an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::reconcile::{MappedRow, MappedTable};
use crate::models::{
    CanonicalField, CanonicalRecord, DEFAULT_PARTITION, PLACEHOLDER_NAME, SYNTHETIC_KEY_PREFIX,
    SYNTHETIC_KEY_WIDTH,
};

/// Trailing `.0`, `.00`, ... left behind by numeric spreadsheet cells.
static DECIMAL_ARTIFACT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.0+$").expect("valid regex"));

/// Why a row did not make it into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Every cell in the source row was blank.
    BlankRow,
    /// Natural key empty after cleaning.
    EmptyKey,
    /// Natural key was the literal `nan`.
    NanKey,
}

impl SkipReason {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::BlankRow => "blank row",
            Self::EmptyKey => "empty natural key",
            Self::NanKey => "natural key is 'nan'",
        }
    }
}

/// A dropped row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    /// 1-based source row.
    pub row: usize,
    pub reason: SkipReason,
}

/// Counts for the report. `rows_kept + rows_dropped == rows_read`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeSummary {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_dropped: usize,
    pub synthesized_keys: bool,
    pub skipped: Vec<SkippedRow>,
}

/// Records plus the summary of what was dropped.
#[derive(Debug, Clone)]
pub struct NormalizeResult {
    pub records: Vec<CanonicalRecord>,
    pub summary: NormalizeSummary,
}

/// Clean a natural key: trim, then strip decimal artifacts (and the
/// whitespace they uncover) until none is left.
///
/// Returns the reason when the key is unusable.
pub fn clean_key(raw: &str) -> Result<String, SkipReason> {
    let mut key = raw.trim();
    while let Some(artifact) = DECIMAL_ARTIFACT.find(key) {
        key = key[..artifact.start()].trim_end();
    }

    if key.is_empty() {
        Err(SkipReason::EmptyKey)
    } else if key.eq_ignore_ascii_case("nan") {
        Err(SkipReason::NanKey)
    } else {
        Ok(key.to_string())
    }
}

/// Coerce a quantity cell to a non-negative integer.
///
/// Integers parse directly; decimals truncate toward zero; negatives clamp
/// to `0`; values past `u32::MAX` saturate; anything else is `0`.
pub fn coerce_quantity(raw: &str) -> u32 {
    let text = raw.trim();

    if let Ok(n) = text.parse::<i64>() {
        return n.clamp(0, i64::from(u32::MAX)) as u32;
    }

    match text.parse::<f64>() {
        // `as` saturates for floats and maps NaN to 0
        Ok(f) if f.is_finite() => f.trunc().max(0.0) as u32,
        _ => 0,
    }
}

/// Synthesized key for the n-th kept row (1-based).
pub fn synthetic_key(ordinal: usize) -> String {
    format!(
        "{}{:0width$}",
        SYNTHETIC_KEY_PREFIX,
        ordinal,
        width = SYNTHETIC_KEY_WIDTH
    )
}

/// Normalize every mapped row into a canonical record.
pub fn normalize(mapped: &MappedTable) -> NormalizeResult {
    let mut summary = NormalizeSummary {
        rows_read: mapped.rows.len(),
        ..Default::default()
    };

    let (content, blank): (Vec<&MappedRow>, Vec<&MappedRow>) =
        mapped.rows.iter().partition(|r| !r.blank);
    for row in blank {
        summary.skipped.push(SkippedRow {
            row: row.ordinal,
            reason: SkipReason::BlankRow,
        });
    }

    let keys: Vec<Result<String, SkipReason>> = content
        .iter()
        .map(|row| match mapped.cell(row, CanonicalField::NaturalKey) {
            Some(raw) => clean_key(raw),
            None => Err(SkipReason::EmptyKey),
        })
        .collect();

    summary.synthesized_keys = !keys.is_empty() && keys.iter().all(Result::is_err);

    let mut records = Vec::with_capacity(content.len());
    for (row, key) in content.into_iter().zip(keys) {
        let natural_key = if summary.synthesized_keys {
            synthetic_key(records.len() + 1)
        } else {
            match key {
                Ok(key) => key,
                Err(reason) => {
                    summary.skipped.push(SkippedRow {
                        row: row.ordinal,
                        reason,
                    });
                    continue;
                }
            }
        };
        records.push(build_record(mapped, row, natural_key));
    }

    summary.skipped.sort_by_key(|s| s.row);
    summary.rows_kept = records.len();
    summary.rows_dropped = summary.skipped.len();

    NormalizeResult { records, summary }
}

fn build_record(mapped: &MappedTable, row: &MappedRow, natural_key: String) -> CanonicalRecord {
    let text = |field| {
        mapped
            .cell(row, field)
            .map(str::trim)
            .unwrap_or("")
            .to_string()
    };
    let or_default = |value: String, default: &str| {
        if value.is_empty() {
            default.to_string()
        } else {
            value
        }
    };

    CanonicalRecord {
        natural_key,
        display_name: or_default(text(CanonicalField::DisplayName), PLACEHOLDER_NAME),
        description: text(CanonicalField::Description),
        package_description: text(CanonicalField::PackageDescription),
        color: text(CanonicalField::Color),
        quantity: mapped
            .cell(row, CanonicalField::Quantity)
            .map(coerce_quantity)
            .unwrap_or(0),
        partition: or_default(text(CanonicalField::Partition), DEFAULT_PARTITION),
        asset_path: text(CanonicalField::AssetPath),
    }
}
