//! Transformation module.
//!
//! This module turns a raw table into loadable records:
//! - Aliases: header spellings per canonical field
//! - Reconcile: bind source columns to canonical fields
//! - Normalize: clean keys, coerce quantities, apply defaults
//! - Dedupe: one record per natural key
//! - Pipeline: end-to-end import into the store

pub mod aliases;
pub mod dedupe;
pub mod normalize;
pub mod pipeline;
pub mod reconcile;

pub use aliases::{AliasEntry, AliasTable};
pub use dedupe::{dedupe, DedupeResult};
pub use normalize::{normalize, NormalizeResult, NormalizeSummary, SkipReason, SkippedRow};
pub use pipeline::*;
pub use reconcile::{reconcile, Binding, MappedRow, MappedTable, UnmappedReport};
