//! Catalog types and loading.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, UnitSheetError};

/// A prefix symbol's definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixDefinition {
    /// Canonical URI, e.g. `...#Kilo`.
    pub uri: String,
}

/// One candidate definition of a unit symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDefinition {
    /// Lower values win when a symbol is ambiguous.
    #[serde(default)]
    pub priority: u32,

    /// Canonical URI, e.g. `...#Meter`.
    pub uri: String,

    /// Quantity kind URI, e.g. `...#Length`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_kind: Option<String>,
}

/// Prefix and unit symbol maps plus the quantity-kind dimension table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolCatalog {
    /// Prefix symbol to definition.
    #[serde(default)]
    pub prefixes: IndexMap<String, PrefixDefinition>,

    /// Unit symbol to its definitions, in priority order.
    #[serde(default)]
    pub units: IndexMap<String, Vec<UnitDefinition>>,

    /// Quantity-kind local name to base-dimension exponents.
    #[serde(default)]
    pub dimensions: IndexMap<String, IndexMap<String, f64>>,
}

impl SymbolCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| UnitSheetError::io(path, e))?;
        let catalog: SymbolCatalog =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| {
                UnitSheetError::Config(format!(
                    "Failed to parse symbol catalog '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        Ok(catalog.normalized())
    }

    /// Parse a catalog from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalog: SymbolCatalog = serde_json::from_str(json)?;
        Ok(catalog.normalized())
    }

    /// Sort every unit's definitions by priority (stable).
    fn normalized(mut self) -> Self {
        for definitions in self.units.values_mut() {
            definitions.sort_by_key(|d| d.priority);
        }
        self
    }

    /// Add a prefix symbol.
    pub fn with_prefix(mut self, symbol: impl Into<String>, uri: impl Into<String>) -> Self {
        self.prefixes
            .insert(symbol.into(), PrefixDefinition { uri: uri.into() });
        self
    }

    /// Add a unit definition for a symbol, keeping priority order.
    pub fn with_unit(
        mut self,
        symbol: impl Into<String>,
        priority: u32,
        uri: impl Into<String>,
        quantity_kind: Option<&str>,
    ) -> Self {
        let definitions = self.units.entry(symbol.into()).or_default();
        definitions.push(UnitDefinition {
            priority,
            uri: uri.into(),
            quantity_kind: quantity_kind.map(str::to_string),
        });
        definitions.sort_by_key(|d| d.priority);
        self
    }

    /// Add a quantity kind's base-dimension exponents.
    pub fn with_dimension(mut self, quantity_kind: impl Into<String>, exponents: &[(&str, f64)]) -> Self {
        self.dimensions.insert(
            quantity_kind.into(),
            exponents.iter().map(|(s, e)| (s.to_string(), *e)).collect(),
        );
        self
    }

    /// Definition of a prefix symbol.
    pub fn prefix(&self, symbol: &str) -> Option<&PrefixDefinition> {
        self.prefixes.get(symbol)
    }

    /// Definitions of a unit symbol, highest priority first.
    pub fn unit_definitions(&self, symbol: &str) -> &[UnitDefinition] {
        self.units.get(symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Base-dimension exponents of a quantity kind (by local name).
    pub fn quantity_kind_dimension(&self, quantity_kind: &str) -> Option<&IndexMap<String, f64>> {
        self.dimensions.get(quantity_kind)
    }

    /// True when the catalog holds no symbols.
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty() && self.units.is_empty()
    }
}
