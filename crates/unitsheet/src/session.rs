//! Editing session: one active tree with its catalog and suggestion index.

use std::path::{Path, PathBuf};

use crate::annotation::{AnnotationTree, AtomicUnitPart, CellKey, LoadPolicy, RemovalOutcome};
use crate::catalog::{SymbolCatalog, qualify};
use crate::error::{Result, UnitSheetError};
use crate::suggestion::{ScoredSuggestion, SuggestionIndex, SuggestionKind, UnitResolver};

/// Session settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Maximum suggestions per query.
    pub suggestion_limit: usize,
    /// How the active tree is loaded from disk.
    pub load_policy: LoadPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            suggestion_limit: 5,
            load_policy: LoadPolicy::default(),
        }
    }
}

impl SessionConfig {
    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    pub fn with_load_policy(mut self, policy: LoadPolicy) -> Self {
        self.load_policy = policy;
        self
    }
}

/// Result of adding a part through the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedAnnotation {
    pub cell: CellKey,
    /// Recomputed dimension abbreviation of the cell.
    pub dimension: String,
}

/// Owns the active annotation tree, the symbol catalog and the
/// suggestion index built from both.
///
/// ```no_run
/// use unitsheet::{Session, SymbolCatalog};
///
/// let catalog = SymbolCatalog::load("catalog.json").unwrap();
/// let mut session = Session::open("data/run1.ccut.json", catalog).unwrap();
/// session.add_annotation("Sheet1", "B3", "Meter", None, None, Some("-1")).unwrap();
/// session.save().unwrap();
/// ```
pub struct Session {
    config: SessionConfig,
    catalog: SymbolCatalog,
    index: SuggestionIndex,
    tree: AnnotationTree,
    path: Option<PathBuf>,
}

impl Session {
    /// Session over an empty tree.
    pub fn new(catalog: SymbolCatalog) -> Self {
        Self::with_tree(AnnotationTree::new(), catalog, SessionConfig::default())
    }

    /// Session over an in-memory tree.
    pub fn with_tree(tree: AnnotationTree, catalog: SymbolCatalog, config: SessionConfig) -> Self {
        let mut index = SuggestionIndex::new();
        index.build(&tree, &catalog);
        Self {
            config,
            catalog,
            index,
            tree,
            path: None,
        }
    }

    /// Load the tree at `path` with default configuration.
    pub fn open(path: impl AsRef<Path>, catalog: SymbolCatalog) -> Result<Self> {
        Self::open_with_config(path, catalog, SessionConfig::default())
    }

    /// Load the tree at `path`. Saving writes back to the same file.
    pub fn open_with_config(path: impl AsRef<Path>, catalog: SymbolCatalog, config: SessionConfig) -> Result<Self> {
        let path = path.as_ref();
        let tree = AnnotationTree::load_with_policy(path, config.load_policy)?;
        let mut session = Self::with_tree(tree, catalog, config);
        session.path = Some(path.to_path_buf());
        Ok(session)
    }

    pub fn tree(&self) -> &AnnotationTree {
        &self.tree
    }

    pub fn into_tree(self) -> AnnotationTree {
        self.tree
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    pub fn index(&self) -> &SuggestionIndex {
        &self.index
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Dimension resolver over this session's index and catalog.
    pub fn resolver(&self) -> UnitResolver<'_> {
        UnitResolver::new(&self.index, &self.catalog)
    }

    /// Add a part to a cell and recompute the cell's dimension.
    ///
    /// `unit` and `prefix` may be local names; they are expanded into the
    /// QUDT unit namespace. Empty optional values count as absent.
    pub fn add_annotation(
        &mut self,
        sheet: &str,
        cell_reference: &str,
        unit: &str,
        prefix: Option<&str>,
        multiplier: Option<&str>,
        exponent: Option<&str>,
    ) -> Result<AddedAnnotation> {
        let prefix = prefix.filter(|p| !p.is_empty()).map(qualify).unwrap_or_default();
        let part = AtomicUnitPart::from_fields(
            &qualify(unit),
            &prefix,
            multiplier.unwrap_or_default(),
            exponent.unwrap_or_default(),
        );

        let cell = self.tree.add_atomic_part(sheet, cell_reference, part)?;
        let resolver = UnitResolver::new(&self.index, &self.catalog);
        let dimension = self.tree.recompute_dimension(sheet, cell_reference, &resolver)?;
        self.index.build(&self.tree, &self.catalog);

        Ok(AddedAnnotation { cell, dimension })
    }

    /// Remove the 1-based `part_index`-th part of a cell.
    pub fn remove_annotation(
        &mut self,
        sheet: &str,
        column: &str,
        row: &str,
        part_index: usize,
    ) -> Result<RemovalOutcome> {
        let resolver = UnitResolver::new(&self.index, &self.catalog);
        self.tree.remove_atomic_part(sheet, column, row, part_index, &resolver)
    }

    /// Recompute one cell's dimension.
    pub fn recompute(&mut self, sheet: &str, cell_reference: &str) -> Result<String> {
        let resolver = UnitResolver::new(&self.index, &self.catalog);
        self.tree.recompute_dimension(sheet, cell_reference, &resolver)
    }

    /// Ranked suggestions, at most `suggestion_limit`.
    pub fn suggest(&self, kind: SuggestionKind, query: &str) -> Vec<ScoredSuggestion> {
        self.index.suggest(kind, query, self.config.suggestion_limit)
    }

    /// Save to the file the session was opened from.
    pub fn save(&self) -> Result<()> {
        let path = self.path.as_deref().ok_or_else(|| {
            UnitSheetError::Persistence("session has no file; use save_as".to_string())
        })?;
        self.tree.save(path)
    }

    /// Save to `path` and remember it for later saves.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.tree.save(path)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::QUDT_NAMESPACE;

    fn catalog() -> SymbolCatalog {
        SymbolCatalog::new()
            .with_prefix("k", format!("{}Kilo", QUDT_NAMESPACE))
            .with_unit("m", 0, format!("{}Meter", QUDT_NAMESPACE), Some("q#Length"))
            .with_unit("s", 0, format!("{}Second", QUDT_NAMESPACE), Some("q#Time"))
            .with_unit("A", 0, format!("{}Ampere", QUDT_NAMESPACE), Some("q#ElectricCurrent"))
            .with_dimension("Length", &[("L", 1.0)])
            .with_dimension("Time", &[("T", 1.0)])
            .with_dimension("ElectricCurrent", &[("I", 1.0)])
    }

    #[test]
    fn test_add_annotation_qualifies_and_recomputes() {
        let mut session = Session::new(catalog());
        let added = session
            .add_annotation("S", "B3", "Meter", None, None, Some("-1"))
            .unwrap();

        assert_eq!(added.cell.column, "B");
        assert_eq!(added.cell.row, "3");
        assert_eq!(added.dimension, "L-1");

        let part = &session.tree().compound_unit("S", "B", "3").unwrap().parts[0];
        assert_eq!(part.unit, format!("{}Meter", QUDT_NAMESPACE));
        assert_eq!(part.exponent, Some(crate::annotation::Scalar::from("-1")));
        assert_eq!(part.prefix, None);

        let added = session
            .add_annotation("S", "B3", "Ampere", None, None, None)
            .unwrap();
        assert_eq!(added.dimension, "L-1 I");
    }

    #[test]
    fn test_add_annotation_registers_new_sheet() {
        let mut session = Session::new(catalog());
        session
            .add_annotation("Measurements", "A1", "Second", Some("Kilo"), None, None)
            .unwrap();
        let names = session.suggest(SuggestionKind::Sheet, "measure");
        assert_eq!(names[0].value, "Measurements");
    }

    #[test]
    fn test_malformed_reference_leaves_tree_unchanged() {
        let mut session = Session::new(catalog());
        let err = session.add_annotation("S", "AB", "Meter", None, None, None);
        assert!(matches!(err, Err(UnitSheetError::MalformedCellReference(_))));
        assert!(session.tree().is_empty());
    }

    #[test]
    fn test_remove_annotation() {
        let mut session = Session::new(catalog());
        session.add_annotation("S", "B3", "Meter", None, None, None).unwrap();
        session.add_annotation("S", "B3", "Second", None, None, Some("-1")).unwrap();

        assert_eq!(session.remove_annotation("S", "B", "3", 1).unwrap(), RemovalOutcome::PartRemoved);
        assert_eq!(session.tree().compound_unit("S", "B", "3").unwrap().dimension, "T-1");
        assert_eq!(session.remove_annotation("S", "B", "3", 1).unwrap(), RemovalOutcome::SheetRemoved);
        assert!(session.tree().is_empty());
    }

    #[test]
    fn test_suggest_respects_limit() {
        let config = SessionConfig::default().with_suggestion_limit(2);
        let session = Session::with_tree(AnnotationTree::new(), catalog(), config);
        assert_eq!(session.suggest(SuggestionKind::Unit, "meter").len(), 2);
    }

    #[test]
    fn test_save_requires_path() {
        let session = Session::new(catalog());
        assert!(matches!(session.save(), Err(UnitSheetError::Persistence(_))));
    }

    #[test]
    fn test_save_as_and_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("run.ccut.json");

        let mut session = Session::new(catalog());
        session.add_annotation("S", "A1", "Meter", None, None, None).unwrap();
        session.save_as(&path).unwrap();

        let reopened = Session::open(&path, catalog()).unwrap();
        assert_eq!(reopened.tree(), session.tree());
        assert_eq!(reopened.path(), Some(path.as_path()));
    }
}
