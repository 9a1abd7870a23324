//! Property-based tests for unitsheet.
//!
//! These tests use proptest to generate random trees and dimension vectors
//! and check the invariants the library relies on:
//! 1. **Round trip**: saved trees load back equal
//! 2. **Determinism**: abbreviations parse back to the same vector
//! 3. **Additivity**: a compound unit's dimension is the sum of its parts
//! 4. **Scoring**: every part is counted exactly once
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p unitsheet --test property_tests
//! PROPTEST_CASES=10000 cargo test -p unitsheet --test property_tests
//! ```

use std::collections::HashMap;

use proptest::prelude::*;

use unitsheet::annotation::{DimensionResolver, compound_dimension};
use unitsheet::dimension::{BaseDimension, parse_abbreviation};
use unitsheet::{
    AnnotationTree, AtomicUnitPart, CompoundUnit, Counts, DimensionVector, LoadPolicy, Result, UnitSheetError,
    compare_trees,
};

// =============================================================================
// Test Strategies
// =============================================================================

const UNITS: &[&str] = &["u#Meter", "u#Second", "u#Gram", "u#Ampere", "u#Kelvin", "u#Mole", "u#Candela"];
const PREFIXES: &[&str] = &["u#Kilo", "u#Milli"];
const MULTIPLIERS: &[i64] = &[10, 1000];
const SHEETS: &[&str] = &["S1", "S2"];
const COLUMNS: &[&str] = &["A", "B", "C"];

fn unit_name() -> impl Strategy<Value = String> {
    prop::sample::select(UNITS).prop_map(str::to_string)
}

fn part() -> impl Strategy<Value = AtomicUnitPart> {
    (
        unit_name(),
        prop::option::of(prop::sample::select(PREFIXES)),
        prop::option::of((-3i64..=3, any::<bool>())),
        prop::option::of(prop::sample::select(MULTIPLIERS)),
    )
        .prop_map(|(unit, prefix, exponent, multiplier)| {
            let mut part = AtomicUnitPart::new(unit);
            if let Some(prefix) = prefix {
                part = part.with_prefix(prefix);
            }
            // Records hold exponents both as JSON numbers and as strings
            match exponent {
                Some((e, true)) => part = part.with_exponent(e),
                Some((e, false)) => part = part.with_exponent(e.to_string()),
                None => {}
            }
            if let Some(multiplier) = multiplier {
                part = part.with_multiplier(multiplier);
            }
            part
        })
}

/// Trees over a small key space so that keys collide between trees.
fn tree() -> impl Strategy<Value = AnnotationTree> {
    prop::collection::vec(
        (
            prop::sample::select(SHEETS),
            prop::sample::select(COLUMNS),
            1u32..=4,
            prop::collection::vec(part(), 1..4),
        ),
        0..12,
    )
    .prop_map(|cells| {
        let mut tree = AnnotationTree::new();
        for (sheet, column, row, parts) in cells {
            let row = row.to_string();
            if tree.cell(sheet, column, &row).is_none() {
                tree.insert_compound_unit(sheet, column, &row, CompoundUnit::with_dimension(parts, ""));
            }
        }
        tree
    })
}

fn dimension_vector() -> impl Strategy<Value = DimensionVector> {
    prop::collection::vec(-4i32..=4, 7).prop_map(|exponents| {
        let mut vector = DimensionVector::zero();
        for (base, exponent) in BaseDimension::ALL.iter().zip(exponents) {
            vector.set(*base, exponent as f64);
        }
        vector
    })
}

struct BaseResolver(HashMap<&'static str, DimensionVector>);

impl BaseResolver {
    fn new() -> Self {
        let mut table = HashMap::new();
        for (unit, base) in UNITS.iter().zip(BaseDimension::ALL) {
            table.insert(*unit, DimensionVector::of(base, 1.0));
        }
        Self(table)
    }
}

impl DimensionResolver for BaseResolver {
    fn unit_dimension(&self, unit_uri: &str) -> Result<DimensionVector> {
        self.0
            .get(unit_uri)
            .copied()
            .ok_or_else(|| UnitSheetError::UnresolvedUnit(unit_uri.to_string()))
    }
}

// =============================================================================
// Persistence
// =============================================================================

proptest! {
    #[test]
    fn round_trip_preserves_tree(tree in tree()) {
        let json = tree.to_json_string().unwrap();
        let loaded = AnnotationTree::from_json_str(&json, LoadPolicy::Strict).unwrap();
        let resaved: serde_json::Value = serde_json::from_str(&loaded.to_json_string().unwrap()).unwrap();
        let saved: serde_json::Value = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(resaved, saved);
        prop_assert_eq!(loaded, tree);
    }
}

// =============================================================================
// Dimension Algebra
// =============================================================================

proptest! {
    #[test]
    fn abbreviation_is_deterministic(vector in dimension_vector()) {
        let abbreviation = vector.to_abbreviation();
        let parsed = parse_abbreviation(&abbreviation).unwrap();
        prop_assert_eq!(parsed, vector);
        prop_assert_eq!(parsed.to_abbreviation(), abbreviation);
    }

    #[test]
    fn compound_dimension_is_additive(parts in prop::collection::vec(part(), 0..6)) {
        let resolver = BaseResolver::new();
        let whole = compound_dimension(&parts, &resolver);
        let piecewise: DimensionVector = parts
            .iter()
            .map(|p| compound_dimension(std::slice::from_ref(p), &resolver))
            .sum();
        prop_assert_eq!(whole, piecewise);
    }

    #[test]
    fn vector_addition_commutes(a in dimension_vector(), b in dimension_vector()) {
        prop_assert_eq!(a + b, b + a);
    }
}

// =============================================================================
// Scoring
// =============================================================================

proptest! {
    #[test]
    fn self_comparison_is_perfect(tree in tree()) {
        let counts = compare_trees(&tree, &tree, None);
        prop_assert_eq!(counts, Counts::new(tree.part_count(), 0, 0));
    }

    #[test]
    fn every_part_counted_once(actual in tree(), expected in tree()) {
        let counts = compare_trees(&actual, &expected, None);
        prop_assert_eq!(counts.true_positives + counts.false_positives, actual.part_count());
        prop_assert_eq!(counts.true_positives + counts.false_negatives, expected.part_count());
    }

    #[test]
    fn swapping_sides_swaps_errors(actual in tree(), expected in tree()) {
        let forward = compare_trees(&actual, &expected, None);
        let backward = compare_trees(&expected, &actual, None);
        prop_assert_eq!(forward.true_positives, backward.true_positives);
        prop_assert_eq!(forward.false_positives, backward.false_negatives);
        prop_assert_eq!(forward.false_negatives, backward.false_positives);
    }
}
