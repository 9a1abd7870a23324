//! Unit extraction from workbook cells.
//!
//! Text is pre-filtered, handed to a [`UnitParser`], and the parser's top
//! candidate becomes the cell's compound unit.

mod driver;
mod filter;
mod lookup;
mod mock;
mod parser;
mod workbook;

pub use driver::{ExtractionConfig, ExtractionDriver, fold_candidate};
pub use filter::prefilter;
pub use lookup::CatalogParser;
pub use mock::MockParser;
pub use parser::{CandidatePart, CandidateUnit, UNKNOWN_TYPE, UnitParser};
pub use workbook::{SheetTable, Workbook, WorkbookSource, is_workbook};
