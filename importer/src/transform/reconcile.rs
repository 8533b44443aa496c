//! Column reconciliation: bind source headers to canonical fields.
//!
//! ```text
//! Source headers                 Alias table                  Bindings
//! ┌───────────────────┐    ┌──────────────────────────┐    ┌──────────────────────┐
//! │ Código            │    │ natural_key: [Codigo de  │    │ natural_key ← Código │
//! │ Articulo          │ →  │   Barras, ..., Código]   │ →  │ display_name ← Artic.│
//! │ Cantidad          │    │ display_name: [Articulo] │    │ quantity ← Cantidad  │
//! │ Notas             │    │ quantity: [Cantidad]     │    │ (ignored: Notas)     │
//! └───────────────────┘    └──────────────────────────┘    └──────────────────────┘
//! ```
//!
//! Matching is exact. The result depends only on the header set and the
//! alias table, never on column order beyond picking the leftmost duplicate.

use serde::Serialize;

use super::aliases::AliasTable;
use crate::models::{CanonicalField, RawTable};

/// One canonical field bound to a source column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub field: CanonicalField,
    /// Source header that matched.
    pub source: String,
}

/// A source row projected onto the bound columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedRow {
    /// 1-based position in the source table.
    pub ordinal: usize,
    /// Cells in binding order.
    pub cells: Vec<String>,
    /// Every raw cell, bound or not, was blank.
    pub blank: bool,
}

/// Rows restricted to bound columns.
#[derive(Debug, Clone)]
pub struct MappedTable {
    pub bindings: Vec<Binding>,
    pub rows: Vec<MappedRow>,
}

impl MappedTable {
    pub fn is_bound(&self, field: CanonicalField) -> bool {
        self.position(field).is_some()
    }

    /// The cell for `field` in `row`, `None` when the field is unbound.
    pub fn cell<'a>(&self, row: &'a MappedRow, field: CanonicalField) -> Option<&'a str> {
        self.position(field)
            .and_then(|idx| row.cells.get(idx))
            .map(String::as_str)
    }

    fn position(&self, field: CanonicalField) -> Option<usize> {
        self.bindings.iter().position(|b| b.field == field)
    }
}

/// What reconciliation could not use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnmappedReport {
    /// Canonical fields with no matching source column.
    pub unbound_fields: Vec<CanonicalField>,
    /// Source columns no binding refers to, in source order.
    pub ignored_columns: Vec<String>,
}

/// Bind source columns to canonical fields and project the rows.
pub fn reconcile(raw: &RawTable, aliases: &AliasTable) -> (MappedTable, UnmappedReport) {
    let mut bindings = Vec::new();
    let mut indices = Vec::new();
    let mut report = UnmappedReport::default();

    for field in CanonicalField::ALL {
        let found = aliases.aliases_for(field).iter().find_map(|alias| {
            raw.headers
                .iter()
                .position(|h| h == alias)
                .map(|idx| (alias.clone(), idx))
        });

        match found {
            Some((source, idx)) => {
                bindings.push(Binding { field, source });
                indices.push(idx);
            }
            None => report.unbound_fields.push(field),
        }
    }

    report.ignored_columns = raw
        .headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| !indices.contains(idx))
        .map(|(_, h)| h.clone())
        .collect();

    let rows = raw
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| MappedRow {
            ordinal: i + 1,
            cells: indices
                .iter()
                .map(|&idx| row.get(idx).cloned().unwrap_or_default())
                .collect(),
            blank: row.iter().all(|c| c.trim().is_empty()),
        })
        .collect();

    (MappedTable { bindings, rows }, report)
}
