//! Alias table: which source column spellings feed which canonical field.
//!
//! The table is an ordered list of `(field, [aliases...])` entries. Within an
//! entry, earlier aliases win. A table can be replaced at runtime with a JSON
//! file of the same shape:
//!
//! ```json
//! [
//!   { "field": "natural_key", "aliases": ["Codigo de Barras", "SKU"] },
//!   { "field": "quantity", "aliases": ["Cantidad", "Qty"] }
//! ]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{AliasError, AliasResult};
use crate::models::CanonicalField;

/// Accepted source spellings for one canonical field, in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub field: CanonicalField,
    pub aliases: Vec<String>,
}

impl AliasEntry {
    pub fn new(field: CanonicalField, aliases: &[&str]) -> Self {
        Self {
            field,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Validated, ordered alias table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
}

impl AliasTable {
    /// Build a table, rejecting duplicate fields and empty aliases.
    pub fn new(entries: Vec<AliasEntry>) -> AliasResult<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.field) {
                return Err(AliasError::DuplicateField(entry.field.to_string()));
            }
            if entry.aliases.is_empty() || entry.aliases.iter().any(|a| a.trim().is_empty()) {
                return Err(AliasError::EmptyAlias(entry.field.to_string()));
            }
        }
        Ok(Self { entries })
    }

    /// Parse and validate a table from JSON.
    pub fn from_json(json: &str) -> AliasResult<Self> {
        let entries: Vec<AliasEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    /// Load a table from a JSON file.
    pub fn from_file(path: &Path) -> AliasResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn entries(&self) -> &[AliasEntry] {
        &self.entries
    }

    /// Aliases for a field, empty if the table does not mention it.
    pub fn aliases_for(&self, field: CanonicalField) -> &[String] {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.aliases.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for AliasTable {
    /// Spellings seen in the inventory exports this tool was built for.
    fn default() -> Self {
        Self {
            entries: vec![
                AliasEntry::new(
                    CanonicalField::NaturalKey,
                    &["Codigo de Barras", "Código de Barras", "Código"],
                ),
                AliasEntry::new(CanonicalField::DisplayName, &["Articulo", "Producto"]),
                AliasEntry::new(CanonicalField::Description, &["Descripcion"]),
                AliasEntry::new(CanonicalField::PackageDescription, &["Empaque"]),
                AliasEntry::new(CanonicalField::Color, &["Color"]),
                AliasEntry::new(CanonicalField::Quantity, &["Cantidad", "Cant."]),
                AliasEntry::new(CanonicalField::Partition, &["Almacen"]),
                AliasEntry::new(CanonicalField::AssetPath, &["Imagen"]),
            ],
        }
    }
}
