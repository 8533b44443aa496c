//! Domain models for the import pipeline.
//!
//! - [`RawTable`] - the source file as read: headers plus string cells
//! - [`CanonicalField`] - the fixed set of destination fields
//! - [`CanonicalRecord`] - one cleaned inventory row, ready to load

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Defaults shared by the normalizer and the schema seeds
// =============================================================================

/// Partition every record falls back to. Seeded into `almacenes`.
pub const DEFAULT_PARTITION: &str = "Almacen Principal";

/// Address stored alongside the default partition.
pub const DEFAULT_PARTITION_ADDRESS: &str = "Ubicación principal";

/// Display name used when the source has none.
pub const PLACEHOLDER_NAME: &str = "Producto sin nombre";

/// Prefix of synthesized natural keys (`COD00001`, `COD00002`, ...).
pub const SYNTHETIC_KEY_PREFIX: &str = "COD";

/// Zero-padded width of the ordinal in a synthesized key.
///
/// This is a minimum. Past 99,999 kept rows the ordinal takes more digits
/// (`COD100000`), so keys stay unique but are no longer fixed-width.
pub const SYNTHETIC_KEY_WIDTH: usize = 5;

// =============================================================================
// Raw input
// =============================================================================

/// Kind of file the table was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Delimited,
    Spreadsheet,
}

/// How the source was decoded.
#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub format: SourceFormat,
    /// Text encoding (delimited) or worksheet name (spreadsheet).
    pub encoding: String,
    pub delimiter: Option<char>,
}

/// A source table read fully into memory.
///
/// Headers are kept exactly as found (case and whitespace included).
/// Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub source: SourceInfo,
}

impl RawTable {
    /// Build a table from string literals, padding or truncating rows to
    /// the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>, source: SourceInfo) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows, source }
    }

    /// Convenience constructor for in-memory tables.
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
            SourceInfo {
                format: SourceFormat::Delimited,
                encoding: "utf-8".to_string(),
                delimiter: Some(','),
            },
        )
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

// =============================================================================
// Canonical fields
// =============================================================================

/// Destination fields, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    NaturalKey,
    DisplayName,
    Description,
    PackageDescription,
    Color,
    Quantity,
    Partition,
    AssetPath,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 8] = [
        CanonicalField::NaturalKey,
        CanonicalField::DisplayName,
        CanonicalField::Description,
        CanonicalField::PackageDescription,
        CanonicalField::Color,
        CanonicalField::Quantity,
        CanonicalField::Partition,
        CanonicalField::AssetPath,
    ];

    /// Name used in alias files and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NaturalKey => "natural_key",
            Self::DisplayName => "display_name",
            Self::Description => "description",
            Self::PackageDescription => "package_description",
            Self::Color => "color",
            Self::Quantity => "quantity",
            Self::Partition => "partition",
            Self::AssetPath => "asset_path",
        }
    }

    /// Column in the `productos` table.
    pub fn column(&self) -> &'static str {
        match self {
            Self::NaturalKey => "codigo_barras",
            Self::DisplayName => "nombre",
            Self::Description => "descripcion",
            Self::PackageDescription => "descripcion_empaque",
            Self::Color => "color",
            Self::Quantity => "cantidad",
            Self::Partition => "almacen",
            Self::AssetPath => "image_path",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Canonical record
// =============================================================================

/// A cleaned inventory row.
///
/// `natural_key` is never empty and carries no trailing `.0` artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalRecord {
    pub natural_key: String,
    pub display_name: String,
    pub description: String,
    pub package_description: String,
    pub color: String,
    pub quantity: u32,
    pub partition: String,
    pub asset_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip_through_serde() {
        for field in CanonicalField::ALL {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.as_str()));
        }
    }

    #[test]
    fn test_columns_are_distinct() {
        let mut columns: Vec<_> = CanonicalField::ALL.iter().map(|f| f.column()).collect();
        columns.sort_unstable();
        columns.dedup();
        assert_eq!(columns.len(), CanonicalField::ALL.len());
    }

    #[test]
    fn test_raw_table_pads_short_rows() {
        let table = RawTable::from_rows(&["a", "b", "c"], &[&["1"], &["1", "2", "3", "4"]]);
        assert_eq!(table.rows[0], vec!["1", "", ""]);
        assert_eq!(table.rows[1], vec!["1", "2", "3"]);
    }
}
