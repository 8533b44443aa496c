//! Collapse records sharing a natural key.
//!
//! ```text
//! Normalized records                 Unique records
//! ┌──────────────────────────┐      ┌──────────────────────────┐
//! │ 123, Widget, Almacen A   │      │ 123, Widget, Almacen A   │
//! │ 123, Widget, Almacen B   │  →   │ 456, Gadget, Almacen A   │
//! │ 456, Gadget, Almacen A   │      └──────────────────────────┘
//! └──────────────────────────┘
//! ```
//!
//! Grouping is by natural key alone, coarser than the store's
//! `(natural_key, partition)` constraint. The store still enforces its own
//! constraint at load time.

use std::collections::HashSet;

use crate::models::CanonicalRecord;

/// Unique records and how many duplicates were discarded.
#[derive(Debug, Clone)]
pub struct DedupeResult {
    pub records: Vec<CanonicalRecord>,
    pub removed: usize,
}

/// Keep the first record seen for each natural key, preserving input order.
pub fn dedupe(records: Vec<CanonicalRecord>) -> DedupeResult {
    let total = records.len();
    let mut seen = HashSet::with_capacity(total);

    let records: Vec<CanonicalRecord> = records
        .into_iter()
        .filter(|r| seen.insert(r.natural_key.clone()))
        .collect();

    DedupeResult {
        removed: total - records.len(),
        records,
    }
}
