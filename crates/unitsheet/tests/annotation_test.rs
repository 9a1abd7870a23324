//! Integration tests for annotation editing and persistence.

use std::collections::HashMap;

use tempfile::TempDir;

use unitsheet::annotation::{DimensionResolver, annotation_path, cell_key_of};
use unitsheet::dimension::{BaseDimension, parse_abbreviation};
use unitsheet::{
    AnnotationTree, AtomicUnitPart, CompoundUnit, DimensionVector, LoadPolicy, RemovalOutcome, Result, Scalar,
    UnitSheetError,
};

/// Resolver over a fixed unit → dimension table.
struct TableResolver(HashMap<&'static str, DimensionVector>);

impl TableResolver {
    fn si() -> Self {
        let mut table = HashMap::new();
        table.insert("m", DimensionVector::of(BaseDimension::Length, 1.0));
        table.insert("s", DimensionVector::of(BaseDimension::Time, 1.0));
        table.insert("kg", DimensionVector::of(BaseDimension::Mass, 1.0));
        table.insert("A", DimensionVector::of(BaseDimension::Current, 1.0));
        Self(table)
    }
}

impl DimensionResolver for TableResolver {
    fn unit_dimension(&self, unit_uri: &str) -> Result<DimensionVector> {
        self.0
            .get(unit_uri)
            .copied()
            .ok_or_else(|| UnitSheetError::UnresolvedUnit(unit_uri.to_string()))
    }
}

// =============================================================================
// Adding Parts
// =============================================================================

#[test]
fn test_add_inverse_meter() {
    let mut tree = AnnotationTree::new();
    let key = tree
        .add_atomic_part("S", "B3", AtomicUnitPart::from_fields("m", "", "", "-1"))
        .unwrap();
    assert_eq!(key.column, "B");
    assert_eq!(key.row, "3");

    let dimension = tree.recompute_dimension("S", "B3", &TableResolver::si()).unwrap();
    assert_eq!(dimension, "L-1");

    let json: serde_json::Value = serde_json::from_str(&tree.to_json_string().unwrap()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "S": { "B": { "3": [ { "parts": [ { "u": "m", "e": "-1" } ], "dimension": "L-1" } ] } }
        })
    );
}

#[test]
fn test_add_appends_to_first_compound_unit() {
    let mut tree = AnnotationTree::new();
    let resolver = TableResolver::si();
    tree.add_atomic_part("S", "c7", AtomicUnitPart::new("kg")).unwrap();
    tree.add_atomic_part("S", "C7", AtomicUnitPart::new("m").with_exponent("2")).unwrap();
    tree.add_atomic_part("S", " c7 ", AtomicUnitPart::new("s").with_exponent("-2")).unwrap();

    assert_eq!(tree.cell("S", "C", "7").unwrap().len(), 1);
    assert_eq!(tree.compound_unit("S", "C", "7").unwrap().parts.len(), 3);
    assert_eq!(tree.recompute_dimension("S", "C7", &resolver).unwrap(), "L2 M T-2");
}

#[test]
fn test_unresolved_unit_contributes_nothing() {
    let mut tree = AnnotationTree::new();
    tree.add_atomic_part("S", "A1", AtomicUnitPart::new("m")).unwrap();
    tree.add_atomic_part("S", "A1", AtomicUnitPart::new("furlong")).unwrap();

    let dimension = tree.recompute_dimension("S", "A1", &TableResolver::si()).unwrap();
    assert_eq!(dimension, "L");
}

#[test]
fn test_malformed_reference_rejected() {
    let mut tree = AnnotationTree::new();
    let err = tree.add_atomic_part("S", "AB", AtomicUnitPart::new("m")).unwrap_err();
    assert!(matches!(err, UnitSheetError::MalformedCellReference(_)));
    assert!(tree.is_empty());
    assert!(cell_key_of("").is_err());
}

#[test]
fn test_recompute_missing_cell() {
    let mut tree = AnnotationTree::new();
    let err = tree.recompute_dimension("S", "A1", &TableResolver::si()).unwrap_err();
    assert!(matches!(err, UnitSheetError::NotFound(_)));
}

// =============================================================================
// Removing Parts
// =============================================================================

#[test]
fn test_removal_cascade_keeps_siblings() {
    let resolver = TableResolver::si();
    let mut tree = AnnotationTree::new();
    tree.add_atomic_part("S", "B3", AtomicUnitPart::new("m")).unwrap();
    tree.add_atomic_part("S", "B4", AtomicUnitPart::new("s")).unwrap();
    tree.add_atomic_part("S", "C1", AtomicUnitPart::new("kg")).unwrap();
    tree.add_atomic_part("T", "A1", AtomicUnitPart::new("A")).unwrap();

    // sibling row keeps the column
    assert_eq!(tree.remove_atomic_part("S", "B", "3", 1, &resolver).unwrap(), RemovalOutcome::RowRemoved);
    assert!(tree.sheet("S").unwrap().contains_key("B"));

    // sibling column keeps the sheet
    assert_eq!(tree.remove_atomic_part("S", "B", "4", 1, &resolver).unwrap(), RemovalOutcome::ColumnRemoved);
    assert!(tree.sheet("S").is_some());
    assert!(!tree.sheet("S").unwrap().contains_key("B"));

    // last column takes the sheet with it
    assert_eq!(tree.remove_atomic_part("S", "C", "1", 1, &resolver).unwrap(), RemovalOutcome::SheetRemoved);
    assert!(tree.sheet("S").is_none());
    assert!(tree.sheet("T").is_some());
}

#[test]
fn test_removal_recomputes_remaining_parts() {
    let resolver = TableResolver::si();
    let mut tree = AnnotationTree::new();
    tree.add_atomic_part("S", "A1", AtomicUnitPart::new("m")).unwrap();
    tree.add_atomic_part("S", "A1", AtomicUnitPart::new("s").with_exponent("-1")).unwrap();
    tree.recompute_dimension("S", "A1", &resolver).unwrap();

    assert_eq!(tree.remove_atomic_part("S", "A", "1", 1, &resolver).unwrap(), RemovalOutcome::PartRemoved);
    let unit = tree.compound_unit("S", "A", "1").unwrap();
    assert_eq!(unit.parts[0].unit, "s");
    assert_eq!(unit.dimension, "T-1");
}

#[test]
fn test_removal_errors_leave_tree_untouched() {
    let resolver = TableResolver::si();
    let mut tree = AnnotationTree::new();
    tree.add_atomic_part("S", "A1", AtomicUnitPart::new("m")).unwrap();
    let before = tree.clone();

    assert!(matches!(
        tree.remove_atomic_part("S", "A", "1", 0, &resolver),
        Err(UnitSheetError::IndexOutOfRange { index: 0, len: 1 })
    ));
    assert!(matches!(
        tree.remove_atomic_part("S", "A", "1", 2, &resolver),
        Err(UnitSheetError::IndexOutOfRange { index: 2, len: 1 })
    ));
    assert!(matches!(
        tree.remove_atomic_part("Missing", "A", "1", 1, &resolver),
        Err(UnitSheetError::NotFound(_))
    ));
    assert!(matches!(
        tree.remove_atomic_part("S", "Z", "1", 1, &resolver),
        Err(UnitSheetError::NotFound(_))
    ));
    assert!(matches!(
        tree.remove_atomic_part("S", "A", "99", 1, &resolver),
        Err(UnitSheetError::NotFound(_))
    ));
    assert_eq!(tree, before);
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = annotation_path(dir.path().join("nested").join("book.csv"));

    let mut tree = AnnotationTree::new();
    tree.insert_compound_unit(
        "Sheet1",
        "A",
        "1",
        CompoundUnit::with_dimension(
            vec![AtomicUnitPart::new("u#Gram").with_prefix("u#Kilo").with_multiplier("1000")],
            "M",
        ),
    );
    tree.save(&path).unwrap();

    assert!(path.ends_with("nested/book.ccut.json"));
    let loaded = AnnotationTree::load(&path).unwrap();
    assert_eq!(loaded, tree);
}

#[test]
fn test_numeric_fields_accepted() {
    let json = r#"{"S": {"A": {"1": [{"parts": [{"u": "m", "e": -1, "m": 1000}], "dimension": "L-1"}]}}}"#;
    let tree = AnnotationTree::from_json_str(json, LoadPolicy::Strict).unwrap();
    let part = &tree.compound_unit("S", "A", "1").unwrap().parts[0];
    assert_eq!(part.exponent, Some(Scalar::from(-1i64)));
    assert_eq!(part.multiplier, Some(Scalar::from(1000i64)));
    assert_eq!(tree.to_json_string().unwrap().matches(r#""e": -1"#).count(), 1);
}

#[test]
fn test_numeric_fields_round_trip_unchanged() {
    let json = r#"{"S": {"A": {"1": [{"parts": [{"u": "m", "e": -1, "m": 1000}, {"u": "s", "e": "-2"}], "dimension": "L-1 T2"}]}}}"#;
    let tree = AnnotationTree::from_json_str(json, LoadPolicy::Strict).unwrap();

    let original: serde_json::Value = serde_json::from_str(json).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&tree.to_json_string().unwrap()).unwrap();
    assert_eq!(saved, original);
}

#[test]
fn test_non_finite_exponent_contributes_nothing() {
    let mut tree = AnnotationTree::new();
    tree.add_atomic_part("S", "A1", AtomicUnitPart::new("kg")).unwrap();
    tree.add_atomic_part("S", "A1", AtomicUnitPart::new("m").with_exponent("NaN")).unwrap();
    tree.add_atomic_part("S", "B1", AtomicUnitPart::new("m").with_exponent("inf")).unwrap();

    assert_eq!(tree.recompute_dimension("S", "A1", &TableResolver::si()).unwrap(), "M");
    assert_eq!(tree.recompute_dimension("S", "B1", &TableResolver::si()).unwrap(), "");
}

#[test]
fn test_multiple_compound_units_per_cell() {
    let json = r#"{"S": {"A": {"1": [
        {"parts": [{"u": "m"}], "dimension": "L"},
        {"parts": [{"u": "s", "e": "-1"}], "dimension": "T-1"}
    ]}}}"#;

    assert!(matches!(
        AnnotationTree::from_json_str(json, LoadPolicy::Strict),
        Err(UnitSheetError::InvalidRecord(_))
    ));

    let tree = AnnotationTree::from_json_str(json, LoadPolicy::Normalize).unwrap();
    let cell = tree.cell("S", "A", "1").unwrap();
    assert_eq!(cell.len(), 1);
    assert_eq!(cell[0].parts.len(), 2);
    assert_eq!(parse_abbreviation(&cell[0].dimension).unwrap().to_abbreviation(), "L T-1");
}
