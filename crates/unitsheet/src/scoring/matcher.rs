//! Tree comparison: greedy unit matching at the leaves, counting at the edges.
//!
//! Comparison walks sheets, then columns, then rows. A key present only in
//! the extracted (actual) tree counts every part below it as a false
//! positive and is drained; keys present in both trees recurse. Inside a
//! shared cell, parts are matched greedily by unit URI. Whatever remains
//! afterwards is swept: leftover actual parts are false positives and
//! leftover expected parts are false negatives. Every part of either tree
//! is therefore counted exactly once.

use crate::annotation::{AnnotationTree, Cell, Column, CompoundUnit, Sheet};

use super::counts::{Counts, Outcome};
use super::ledger::DebugLedger;

/// Compare an extracted tree against a reference tree.
///
/// Both inputs are left untouched; the comparison runs on copies.
pub fn compare_trees(
    actual: &AnnotationTree,
    expected: &AnnotationTree,
    ledger: Option<&mut DebugLedger>,
) -> Counts {
    let mut actual = actual.clone();
    let mut expected = expected.clone();
    compare_trees_in_place(&mut actual, &mut expected, ledger)
}

/// Compare two trees, consuming matched parts from both.
///
/// On return `actual` holds only unmatched parts under keys shared with
/// `expected`, and `expected` holds only unmatched parts.
pub fn compare_trees_in_place(
    actual: &mut AnnotationTree,
    expected: &mut AnnotationTree,
    mut ledger: Option<&mut DebugLedger>,
) -> Counts {
    let mut counts = Counts::default();

    if !actual.is_empty() && !expected.is_empty() {
        let expected_sheets = expected.sheets_mut();
        actual.sheets_mut().retain(|name, sheet| match expected_sheets.get_mut(name) {
            Some(expected_sheet) => {
                counts += compare_sheets(sheet, expected_sheet, ledger.as_deref_mut());
                true
            }
            None => {
                log::debug!("sheet '{}' only in extracted tree", name);
                let n = tally_sheet(sheet, Outcome::FalsePositive, ledger.as_deref_mut());
                counts.record(Outcome::FalsePositive, n);
                false
            }
        });
    }

    for sheet in actual.sheets().values() {
        let n = tally_sheet(sheet, Outcome::FalsePositive, ledger.as_deref_mut());
        counts.record(Outcome::FalsePositive, n);
    }
    for sheet in expected.sheets().values() {
        let n = tally_sheet(sheet, Outcome::FalseNegative, ledger.as_deref_mut());
        counts.record(Outcome::FalseNegative, n);
    }

    counts
}

fn compare_sheets(actual: &mut Sheet, expected: &mut Sheet, mut ledger: Option<&mut DebugLedger>) -> Counts {
    let mut counts = Counts::default();
    actual.retain(|name, column| match expected.get_mut(name) {
        Some(expected_column) => {
            counts += compare_columns(column, expected_column, ledger.as_deref_mut());
            true
        }
        None => {
            let n = tally_column(column, Outcome::FalsePositive, ledger.as_deref_mut());
            counts.record(Outcome::FalsePositive, n);
            false
        }
    });
    counts
}

fn compare_columns(actual: &mut Column, expected: &mut Column, mut ledger: Option<&mut DebugLedger>) -> Counts {
    let mut counts = Counts::default();
    actual.retain(|row, cell| match expected.get_mut(row) {
        Some(expected_cell) => {
            let n = match_cells(cell, expected_cell, ledger.as_deref_mut());
            counts.record(Outcome::TruePositive, n);
            true
        }
        None => {
            let n = tally_cell(cell, Outcome::FalsePositive, ledger.as_deref_mut());
            counts.record(Outcome::FalsePositive, n);
            false
        }
    });
    counts
}

/// Greedily match parts of two cells by unit URI.
///
/// The scan visits actual compound units and their parts in order, and for
/// each looks through expected compound units and their parts in order. The
/// first pair with equal units is one true positive; both parts are removed
/// and the scan restarts. Prefix, exponent and multiplier are ignored.
/// Returns the number of true positives.
pub fn match_cells(actual: &mut [CompoundUnit], expected: &mut [CompoundUnit], mut ledger: Option<&mut DebugLedger>) -> usize {
    let mut matched = 0;
    while let Some((ac, ap, ec, ep)) = first_match(actual, expected) {
        let part = actual[ac].parts.remove(ap);
        expected[ec].parts.remove(ep);
        if let Some(ledger) = ledger.as_deref_mut() {
            ledger.record_unit(&part.unit, Outcome::TruePositive);
        }
        matched += 1;
    }
    matched
}

fn first_match(actual: &[CompoundUnit], expected: &[CompoundUnit]) -> Option<(usize, usize, usize, usize)> {
    for (ac, actual_unit) in actual.iter().enumerate() {
        for (ap, actual_part) in actual_unit.parts.iter().enumerate() {
            for (ec, expected_unit) in expected.iter().enumerate() {
                for (ep, expected_part) in expected_unit.parts.iter().enumerate() {
                    if actual_part.unit == expected_part.unit {
                        return Some((ac, ap, ec, ep));
                    }
                }
            }
        }
    }
    None
}

fn tally_sheet(sheet: &Sheet, outcome: Outcome, mut ledger: Option<&mut DebugLedger>) -> usize {
    sheet
        .values()
        .map(|column| tally_column(column, outcome, ledger.as_deref_mut()))
        .sum()
}

fn tally_column(column: &Column, outcome: Outcome, mut ledger: Option<&mut DebugLedger>) -> usize {
    column
        .values()
        .map(|cell| tally_cell(cell, outcome, ledger.as_deref_mut()))
        .sum()
}

fn tally_cell(cell: &Cell, outcome: Outcome, mut ledger: Option<&mut DebugLedger>) -> usize {
    let mut n = 0;
    for part in cell.iter().flat_map(|cu| cu.parts.iter()) {
        if let Some(ledger) = ledger.as_deref_mut() {
            ledger.record_unit(&part.unit, outcome);
        }
        n += 1;
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AtomicUnitPart;

    fn cu(units: &[&str]) -> CompoundUnit {
        CompoundUnit::with_dimension(units.iter().map(|u| AtomicUnitPart::new(*u)).collect(), "")
    }

    fn tree(cells: &[(&str, &str, &str, &[&str])]) -> AnnotationTree {
        let mut tree = AnnotationTree::new();
        for (sheet, column, row, units) in cells {
            tree.insert_compound_unit(sheet, column, row, cu(units));
        }
        tree
    }

    #[test]
    fn test_identical_trees_all_true_positives() {
        let t = tree(&[("S", "A", "1", &["m", "s"]), ("S", "B", "2", &["kg"])]);
        assert_eq!(compare_trees(&t, &t, None), Counts::new(3, 0, 0));
    }

    #[test]
    fn test_partial_cell_match() {
        let actual = tree(&[("S", "A", "1", &["m", "s"])]);
        let expected = tree(&[("S", "A", "1", &["m", "kg"])]);
        assert_eq!(compare_trees(&actual, &expected, None), Counts::new(1, 1, 1));
    }

    #[test]
    fn test_missing_sheet_counts_once() {
        let actual = tree(&[("Extra", "A", "1", &["m"]), ("S", "A", "1", &["s"])]);
        let expected = tree(&[("S", "A", "1", &["s"])]);
        assert_eq!(compare_trees(&actual, &expected, None), Counts::new(1, 1, 0));
    }

    #[test]
    fn test_missing_column_and_row() {
        let actual = tree(&[("S", "A", "1", &["m"]), ("S", "B", "1", &["s"]), ("S", "A", "9", &["kg"])]);
        let expected = tree(&[("S", "A", "1", &["m"]), ("S", "C", "1", &["g"])]);
        assert_eq!(compare_trees(&actual, &expected, None), Counts::new(1, 2, 1));
    }

    #[test]
    fn test_empty_sides() {
        let t = tree(&[("S", "A", "1", &["m", "s"])]);
        assert_eq!(compare_trees(&t, &AnnotationTree::new(), None), Counts::new(0, 2, 0));
        assert_eq!(compare_trees(&AnnotationTree::new(), &t, None), Counts::new(0, 0, 2));
        assert_eq!(
            compare_trees(&AnnotationTree::new(), &AnnotationTree::new(), None),
            Counts::default()
        );
    }

    #[test]
    fn test_in_place_leaves_residue() {
        let mut actual = tree(&[("S", "A", "1", &["m", "s"])]);
        let mut expected = tree(&[("S", "A", "1", &["m", "kg"])]);
        compare_trees_in_place(&mut actual, &mut expected, None);
        assert_eq!(actual.part_count(), 1);
        assert_eq!(expected.part_count(), 1);
        assert_eq!(expected.compound_unit("S", "A", "1").unwrap().parts[0].unit, "kg");
    }

    #[test]
    fn test_duplicate_units_match_pairwise() {
        let mut actual = vec![cu(&["m", "m", "m"])];
        let mut expected = vec![cu(&["m"]), cu(&["m"])];
        assert_eq!(match_cells(&mut actual, &mut expected, None), 2);
        assert_eq!(actual[0].parts.len(), 1);
        assert!(expected.iter().all(|c| c.parts.is_empty()));
    }

    #[test]
    fn test_ledger_records_each_part_once() {
        let actual = tree(&[("S", "A", "1", &["m", "s"]), ("X", "A", "1", &["g"])]);
        let expected = tree(&[("S", "A", "1", &["m", "kg"])]);
        let mut ledger = DebugLedger::new();
        let counts = compare_trees(&actual, &expected, Some(&mut ledger));

        assert_eq!(counts, Counts::new(1, 2, 1));
        let total: Counts = ledger.per_unit().values().copied().sum();
        assert_eq!(total, counts);
        assert_eq!(ledger.per_unit()["m"], Counts::new(1, 0, 0));
        assert_eq!(ledger.per_unit()["kg"], Counts::new(0, 0, 1));
    }
}
