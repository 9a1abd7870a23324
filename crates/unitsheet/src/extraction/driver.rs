//! Runs a unit parser over every cell of a workbook.

use log::debug;

use crate::annotation::{AnnotationTree, AtomicUnitPart, CompoundUnit, Scalar};

use super::filter::prefilter;
use super::parser::{CandidateUnit, UnitParser};
use super::workbook::{SheetTable, Workbook};

/// Extraction settings.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Cells with more space-separated tokens than this are skipped.
    pub max_words_per_cell: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_words_per_cell: 6,
        }
    }
}

impl ExtractionConfig {
    pub fn with_max_words(mut self, max_words: usize) -> Self {
        self.max_words_per_cell = max_words;
        self
    }
}

/// Builds an annotation tree from parser output.
pub struct ExtractionDriver<'p> {
    parser: &'p dyn UnitParser,
    config: ExtractionConfig,
}

impl<'p> ExtractionDriver<'p> {
    /// Create a driver with default configuration.
    pub fn new(parser: &'p dyn UnitParser) -> Self {
        Self::with_config(parser, ExtractionConfig::default())
    }

    /// Create a driver with custom configuration.
    pub fn with_config(parser: &'p dyn UnitParser, config: ExtractionConfig) -> Self {
        Self { parser, config }
    }

    /// The compound unit for one cell's text, if any.
    ///
    /// Parser failures skip the cell.
    pub fn extract_cell(&self, text: &str) -> Option<CompoundUnit> {
        let cleaned = prefilter(text, self.config.max_words_per_cell)?;
        let candidates = match self.parser.parse(&cleaned) {
            Ok(candidates) => candidates,
            Err(e) => {
                debug!("{} failed on '{}': {}", self.parser.name(), cleaned, e);
                return None;
            }
        };
        candidates.first().and_then(fold_candidate)
    }

    /// Annotate every extractable cell of `sheet` into `tree`.
    ///
    /// Returns the number of cells annotated.
    pub fn extract_sheet(&self, sheet: &SheetTable, tree: &mut AnnotationTree) -> usize {
        let mut annotated = 0;
        for (column, row, text) in sheet.cells() {
            if let Some(unit) = self.extract_cell(text) {
                tree.insert_compound_unit(&sheet.name, &column, &row, unit);
                annotated += 1;
            }
        }
        annotated
    }

    /// Annotation tree for a whole workbook.
    pub fn extract_workbook(&self, workbook: &Workbook) -> AnnotationTree {
        let mut tree = AnnotationTree::new();
        for sheet in &workbook.sheets {
            let annotated = self.extract_sheet(sheet, &mut tree);
            debug!(
                "{}: annotated {} cell(s) in sheet '{}'",
                workbook.source.file, annotated, sheet.name
            );
        }
        tree
    }
}

/// Turn a parser candidate into a compound unit, dropping unknown parts.
///
/// Returns `None` when no part survives.
pub fn fold_candidate(candidate: &CandidateUnit) -> Option<CompoundUnit> {
    let parts: Vec<AtomicUnitPart> = candidate
        .parts
        .iter()
        .filter(|part| !part.is_unknown())
        .map(|part| AtomicUnitPart {
            unit: part.quantity_kind.clone(),
            prefix: part.prefix.clone().map(Scalar::Text),
            exponent: part.exponent.clone().map(Scalar::Text),
            multiplier: part.multiplier.clone().map(Scalar::Text),
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(CompoundUnit::with_dimension(parts, candidate.dimension.clone()))
    }
}
