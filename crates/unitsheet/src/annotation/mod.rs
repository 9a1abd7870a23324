//! Annotation tree: the nested record of unit annotations in a workbook.
//!
//! The tree is keyed sheet → column label → row number, and each cell holds
//! a list of compound units, each made of atomic unit parts:
//!
//! ```text
//! {
//!   "Sheet1": {
//!     "B": {
//!       "3": [ { "parts": [ { "u": "...#Meter", "e": "-1" } ], "dimension": "L-1" } ]
//!     }
//!   }
//! }
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use unitsheet::annotation::{AnnotationTree, AtomicUnitPart};
//!
//! let mut tree = AnnotationTree::load("data/run1.ccut.json").unwrap();
//! tree.add_atomic_part("Sheet1", "B3", AtomicUnitPart::new("http://x.org/unit#Meter")).unwrap();
//! tree.save("data/run1.ccut.json").unwrap();
//! ```

mod cell_ref;
mod mutation;
mod persistence;
mod types;

pub use cell_ref::{CellKey, cell_key_of, column_label, column_number};
pub use mutation::{DimensionResolver, RemovalOutcome, compound_dimension};
pub use persistence::{LoadPolicy, annotation_path, reference_path};
pub use types::{AnnotationTree, AtomicUnitPart, Cell, Column, CompoundUnit, Scalar, Sheet, cell_part_count};
