//! Unit dimension lookup through the suggestion index and the catalog.

use crate::annotation::DimensionResolver;
use crate::catalog::{SymbolCatalog, local_name};
use crate::dimension::DimensionVector;
use crate::error::{Result, UnitSheetError};

use super::index::SuggestionIndex;

/// Resolves unit URIs via unit → quantity kind (index) → dimension (catalog).
pub struct UnitResolver<'a> {
    index: &'a SuggestionIndex,
    catalog: &'a SymbolCatalog,
}

impl<'a> UnitResolver<'a> {
    pub fn new(index: &'a SuggestionIndex, catalog: &'a SymbolCatalog) -> Self {
        Self { index, catalog }
    }
}

impl DimensionResolver for UnitResolver<'_> {
    fn unit_dimension(&self, unit_uri: &str) -> Result<DimensionVector> {
        let unit = local_name(unit_uri);
        let kind = self
            .index
            .quantity_kind_of(unit)
            .ok_or_else(|| UnitSheetError::UnresolvedUnit(unit_uri.to_string()))?;
        let spec = self.catalog.quantity_kind_dimension(kind).ok_or_else(|| {
            UnitSheetError::UnresolvedUnit(format!("{} (quantity kind '{}')", unit_uri, kind))
        })?;
        Ok(DimensionVector::from_quantity_kind(spec))
    }
}
