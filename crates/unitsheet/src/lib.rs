//! unitsheet: physical-unit annotations for spreadsheet cells.
//!
//! Cells of a workbook are annotated with compound units (products of
//! prefixed, exponentiated atomic units). Each compound unit carries its
//! physical dimension, computed from base-dimension exponents. Annotations
//! produced by automatic extraction can be scored against curated reference
//! annotations with precision, recall and F1.
//!
//! # Modules
//!
//! - [`dimension`]: base-dimension vectors and their abbreviations
//! - [`catalog`]: prefix and unit symbols with canonical URIs
//! - [`annotation`]: the annotation tree, its mutations and persistence
//! - [`suggestion`]: fuzzy auto-complete over sheets, prefixes and units
//! - [`extraction`]: turning cell text into annotations via a unit parser
//! - [`scoring`]: tree comparison, statistics and batch validation
//!
//! # Example
//!
//! ```no_run
//! use unitsheet::{AnnotationTree, compare_trees};
//!
//! let actual = AnnotationTree::load("run1.ccut.json").unwrap();
//! let expected = AnnotationTree::load("run1.ccutvld.json").unwrap();
//! let counts = compare_trees(&actual, &expected, None);
//!
//! match counts.statistics() {
//!     Ok(stats) => println!("{}", stats),
//!     Err(e) => println!("{}", e),
//! }
//! ```

pub mod annotation;
pub mod catalog;
pub mod dimension;
pub mod error;
pub mod extraction;
pub mod scoring;
pub mod suggestion;

mod session;

pub use annotation::{AnnotationTree, AtomicUnitPart, CellKey, CompoundUnit, LoadPolicy, RemovalOutcome, Scalar};
pub use catalog::SymbolCatalog;
pub use dimension::{BaseDimension, DimensionVector};
pub use error::{Result, UnitSheetError};
pub use extraction::{CatalogParser, ExtractionConfig, ExtractionDriver, UnitParser, Workbook};
pub use scoring::{BatchValidator, Counts, DebugLedger, Statistics, ValidationConfig, ValidationReport, compare_trees};
pub use session::{AddedAnnotation, Session, SessionConfig};
pub use suggestion::{ScoredSuggestion, SuggestionKind};
