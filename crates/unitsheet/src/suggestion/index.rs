//! Flat, de-duplicated auto-complete lists for interactive editing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::annotation::AnnotationTree;
use crate::catalog::{SymbolCatalog, URI_SEPARATOR, local_name};

use super::similarity::similarity;

/// Which list a suggestion query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    /// Sheet names of the active tree.
    Sheet,
    /// Unit prefix local names.
    Prefix,
    /// Unit local names.
    Unit,
}

impl SuggestionKind {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            SuggestionKind::Sheet => "Sheet",
            SuggestionKind::Prefix => "Prefix",
            SuggestionKind::Unit => "Unit",
        }
    }
}

impl std::str::FromStr for SuggestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sheet" | "sheets" => Ok(SuggestionKind::Sheet),
            "prefix" | "prefixes" => Ok(SuggestionKind::Prefix),
            "unit" | "units" => Ok(SuggestionKind::Unit),
            _ => Err(format!("Unknown suggestion kind: {}. Use sheet, prefix, or unit.", s)),
        }
    }
}

/// One ranked auto-complete entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredSuggestion {
    /// The suggested entry.
    pub value: String,
    /// Similarity score, 0..=100.
    pub score: u32,
}

/// Known sheet names, prefixes and units, plus the unit → quantity-kind map.
///
/// Prefix and unit lists are filled once and never evicted; sheet names
/// accumulate across [`SuggestionIndex::build`] calls.
#[derive(Debug, Clone, Default)]
pub struct SuggestionIndex {
    sheets: Vec<String>,
    prefixes: Vec<String>,
    units: Vec<String>,
    quantity_kinds: HashMap<String, String>,
}

impl SuggestionIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the index from the active tree and the symbol catalog.
    ///
    /// Idempotent: prefix and unit lists are only built while empty.
    pub fn build(&mut self, tree: &AnnotationTree, catalog: &SymbolCatalog) {
        for sheet in tree.sheet_names() {
            if !self.sheets.iter().any(|s| s == sheet) {
                self.sheets.push(sheet.to_string());
            }
        }

        if self.prefixes.is_empty() {
            for definition in catalog.prefixes.values() {
                if !definition.uri.contains(URI_SEPARATOR) {
                    continue;
                }
                let name = local_name(&definition.uri);
                if !self.prefixes.iter().any(|p| p == name) {
                    self.prefixes.push(name.to_string());
                }
            }
        }

        if self.units.is_empty() {
            for definitions in catalog.units.values() {
                for definition in definitions {
                    if !definition.uri.contains(URI_SEPARATOR) {
                        continue;
                    }
                    let name = local_name(&definition.uri);
                    if self.units.iter().any(|u| u == name) {
                        continue;
                    }
                    self.units.push(name.to_string());
                    if let Some(ref kind) = definition.quantity_kind {
                        self.quantity_kinds
                            .entry(name.to_string())
                            .or_insert_with(|| local_name(kind).to_string());
                    }
                }
            }
        }
    }

    /// Entries of one list, in insertion order.
    pub fn entries(&self, kind: SuggestionKind) -> &[String] {
        match kind {
            SuggestionKind::Sheet => &self.sheets,
            SuggestionKind::Prefix => &self.prefixes,
            SuggestionKind::Unit => &self.units,
        }
    }

    /// Up to `limit` entries ranked by similarity to `query`, best first;
    /// ties keep list order.
    pub fn suggest(&self, kind: SuggestionKind, query: &str, limit: usize) -> Vec<ScoredSuggestion> {
        let mut scored: Vec<ScoredSuggestion> = self
            .entries(kind)
            .iter()
            .map(|value| ScoredSuggestion {
                value: value.clone(),
                score: similarity(query, value),
            })
            .collect();

        // stable sort keeps catalog order among equal scores
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(limit);
        scored
    }

    /// Quantity-kind local name of a unit local name.
    pub fn quantity_kind_of(&self, unit: &str) -> Option<&str> {
        self.quantity_kinds.get(unit).map(String::as_str)
    }

    /// True when nothing has been indexed.
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty() && self.prefixes.is_empty() && self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{AtomicUnitPart, CompoundUnit};

    fn catalog() -> SymbolCatalog {
        SymbolCatalog::new()
            .with_prefix("k", "http://u#Kilo")
            .with_prefix("K", "http://u#Kilo")
            .with_prefix("M", "http://u#Mega")
            .with_prefix("bad", "no-separator")
            .with_unit("g", 0, "http://u#Gram", Some("http://q#Mass"))
            .with_unit("m", 0, "http://u#Meter", Some("http://q#Length"))
            .with_unit("m", 1, "http://u#Minute", Some("http://q#Time"))
            .with_unit("min", 0, "http://u#Minute", Some("http://q#Duration"))
            .with_unit("kg", 0, "http://u#Kilogram", Some("http://q#Mass"))
    }

    fn tree(sheets: &[&str]) -> AnnotationTree {
        let mut tree = AnnotationTree::new();
        for sheet in sheets {
            tree.insert_compound_unit(sheet, "A", "1", CompoundUnit::single(AtomicUnitPart::new("kg")));
        }
        tree
    }

    #[test]
    fn test_build_deduplicates() {
        let mut index = SuggestionIndex::new();
        index.build(&tree(&["Data", "Notes"]), &catalog());

        assert_eq!(index.entries(SuggestionKind::Sheet), ["Data", "Notes"]);
        assert_eq!(index.entries(SuggestionKind::Prefix), ["Kilo", "Mega"]);
        assert_eq!(index.entries(SuggestionKind::Unit), ["Gram", "Meter", "Minute", "Kilogram"]);
    }

    #[test]
    fn test_first_quantity_kind_wins() {
        let mut index = SuggestionIndex::new();
        index.build(&AnnotationTree::new(), &catalog());
        assert_eq!(index.quantity_kind_of("Minute"), Some("Time"));
        assert_eq!(index.quantity_kind_of("Gram"), Some("Mass"));
        assert_eq!(index.quantity_kind_of("Parsec"), None);
    }

    #[test]
    fn test_rebuild_is_idempotent_and_never_evicts() {
        let mut index = SuggestionIndex::new();
        index.build(&tree(&["Data"]), &catalog());
        index.build(&tree(&["Data", "Extra"]), &SymbolCatalog::new());

        assert_eq!(index.entries(SuggestionKind::Sheet), ["Data", "Extra"]);
        assert_eq!(index.entries(SuggestionKind::Unit).len(), 4);
    }

    #[test]
    fn test_suggest_ranks_and_limits() {
        let mut index = SuggestionIndex::new();
        index.build(&AnnotationTree::new(), &catalog());

        let results = index.suggest(SuggestionKind::Unit, "gram", 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].value, "Gram");
        assert_eq!(results[0].score, 100);
        assert_eq!(results[1].value, "Kilogram");
    }

    #[test]
    fn test_suggest_ties_keep_catalog_order() {
        let mut index = SuggestionIndex::new();
        index.build(&tree(&["Alpha", "Beta", "Gamma"]), &SymbolCatalog::new());

        let results = index.suggest(SuggestionKind::Sheet, "zzzzzzzz", 3);
        assert!(results.iter().all(|r| r.score == 0));
        let values: Vec<_> = results.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, ["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("unit".parse::<SuggestionKind>().unwrap(), SuggestionKind::Unit);
        assert_eq!("Prefixes".parse::<SuggestionKind>().unwrap(), SuggestionKind::Prefix);
        assert!("other".parse::<SuggestionKind>().is_err());
    }
}
