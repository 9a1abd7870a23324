//! Scoring extracted annotations against curated references.
//!
//! [`compare_trees`] walks two annotation trees and classifies every atomic
//! unit part as a true positive, false positive or false negative.
//! [`Statistics`] turns the resulting [`Counts`] into precision, recall and
//! F1, and [`BatchValidator`] runs the comparison over a whole directory.

mod batch;
mod counts;
mod ledger;
mod matcher;

pub use batch::{
    ActualSource, BatchValidator, FileResult, SkipReason, SkippedFile, ValidationConfig, ValidationReport,
    load_ignore_list,
};
pub use counts::{Counts, Outcome, Statistics};
pub use ledger::{DebugLedger, report_paths};
pub use matcher::{compare_trees, compare_trees_in_place, match_cells};
