//! Annotation data model.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A recorded prefix, exponent or multiplier value.
///
/// Records may hold `"-1"` or `-1`; the JSON type is kept so that a loaded
/// record saves back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    /// The value as a finite number. Text that does not parse, `NaN` and
    /// infinities give `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Scalar::Text(text) => text.trim().parse::<f64>().ok(),
            Scalar::Number(number) => number.as_f64(),
        };
        value.filter(|v| v.is_finite())
    }

    /// The text form, when the value was recorded as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(text) => Some(text),
            Scalar::Number(_) => None,
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Scalar::Text(text) if text.is_empty())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(text) => f.write_str(text),
            Scalar::Number(number) => write!(f, "{}", number),
        }
    }
}

impl From<&str> for Scalar {
    fn from(text: &str) -> Self {
        Scalar::Text(text.to_string())
    }
}

impl From<String> for Scalar {
    fn from(text: String) -> Self {
        Scalar::Text(text)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value.into())
    }
}

/// A single unit symbol within a compound unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomicUnitPart {
    /// Canonical unit URI.
    #[serde(rename = "u")]
    pub unit: String,

    /// Canonical prefix URI.
    #[serde(rename = "p", default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<Scalar>,

    /// Numeric exponent, as recorded.
    #[serde(rename = "e", default, skip_serializing_if = "Option::is_none")]
    pub exponent: Option<Scalar>,

    /// Multiplier, e.g. "1000".
    #[serde(rename = "m", default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<Scalar>,
}

impl AtomicUnitPart {
    /// Create a part with only a unit.
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            prefix: None,
            exponent: None,
            multiplier: None,
        }
    }

    /// Create a part from form-style fields, where empty strings mean "absent".
    pub fn from_fields(unit: &str, prefix: &str, multiplier: &str, exponent: &str) -> Self {
        Self::new(unit)
            .with_prefix(prefix)
            .with_multiplier(multiplier)
            .with_exponent(exponent)
    }

    /// Set the prefix (ignored when empty).
    pub fn with_prefix(mut self, prefix: impl Into<Scalar>) -> Self {
        self.prefix = non_empty(prefix.into());
        self
    }

    /// Set the exponent (ignored when empty).
    pub fn with_exponent(mut self, exponent: impl Into<Scalar>) -> Self {
        self.exponent = non_empty(exponent.into());
        self
    }

    /// Set the multiplier (ignored when empty).
    pub fn with_multiplier(mut self, multiplier: impl Into<Scalar>) -> Self {
        self.multiplier = non_empty(multiplier.into());
        self
    }

    /// Numeric exponent; 1 when absent, `None` when it is not a finite number.
    pub fn exponent_value(&self) -> Option<f64> {
        match &self.exponent {
            None => Some(1.0),
            Some(exponent) => exponent.as_f64(),
        }
    }
}

fn non_empty(value: Scalar) -> Option<Scalar> {
    if value.is_empty() { None } else { Some(value) }
}

/// A product of atomic unit parts with a cached dimension abbreviation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundUnit {
    /// Atomic parts, never empty while the compound unit is stored in a tree.
    pub parts: Vec<AtomicUnitPart>,

    /// Canonical dimension abbreviation of `parts`; stale until recomputed.
    #[serde(default)]
    pub dimension: String,
}

impl CompoundUnit {
    /// A compound unit holding one part, with no dimension computed yet.
    pub fn single(part: AtomicUnitPart) -> Self {
        Self {
            parts: vec![part],
            dimension: String::new(),
        }
    }

    /// A compound unit with a known dimension.
    pub fn with_dimension(parts: Vec<AtomicUnitPart>, dimension: impl Into<String>) -> Self {
        Self {
            parts,
            dimension: dimension.into(),
        }
    }
}

/// Compound units annotated on one cell.
pub type Cell = Vec<CompoundUnit>;

/// Row number (as a string) to cell.
pub type Column = IndexMap<String, Cell>;

/// Column label to column.
pub type Sheet = IndexMap<String, Column>;

/// Number of atomic parts in a cell, across all its compound units.
pub fn cell_part_count(cell: &[CompoundUnit]) -> usize {
    cell.iter().map(|cu| cu.parts.len()).sum()
}

/// Sheet name to sheet: the full annotation record of one workbook.
///
/// Equality ignores key order at every level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationTree {
    sheets: IndexMap<String, Sheet>,
}

impl AnnotationTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing sheet map.
    pub fn from_sheets(sheets: IndexMap<String, Sheet>) -> Self {
        Self { sheets }
    }

    /// All sheets.
    pub fn sheets(&self) -> &IndexMap<String, Sheet> {
        &self.sheets
    }

    pub(crate) fn sheets_mut(&mut self) -> &mut IndexMap<String, Sheet> {
        &mut self.sheets
    }

    /// Consume the tree, returning its sheet map.
    pub fn into_sheets(self) -> IndexMap<String, Sheet> {
        self.sheets
    }

    /// Sheet names in display order.
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    /// A sheet by name.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(name)
    }

    /// A cell by sheet, column label and row number.
    pub fn cell(&self, sheet: &str, column: &str, row: &str) -> Option<&Cell> {
        self.sheets.get(sheet)?.get(column)?.get(row)
    }

    /// First compound unit of a cell.
    pub fn compound_unit(&self, sheet: &str, column: &str, row: &str) -> Option<&CompoundUnit> {
        self.cell(sheet, column, row)?.first()
    }

    /// Append a compound unit to a cell, creating the path as needed.
    pub fn insert_compound_unit(
        &mut self,
        sheet: &str,
        column: &str,
        row: &str,
        unit: CompoundUnit,
    ) {
        self.sheets
            .entry(sheet.to_string())
            .or_default()
            .entry(column.to_string())
            .or_default()
            .entry(row.to_string())
            .or_default()
            .push(unit);
    }

    /// Insert a whole sheet, replacing any sheet of the same name.
    pub fn insert_sheet(&mut self, name: impl Into<String>, sheet: Sheet) {
        self.sheets.insert(name.into(), sheet);
    }

    /// True when the tree holds no sheets.
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Number of sheets.
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// Iterate `(sheet, column, row, cell)` in display order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (&str, &str, &str, &Cell)> {
        self.sheets.iter().flat_map(|(sheet, columns)| {
            columns.iter().flat_map(move |(column, rows)| {
                rows.iter().map(move |(row, cell)| {
                    (sheet.as_str(), column.as_str(), row.as_str(), cell)
                })
            })
        })
    }

    /// Number of annotated cells.
    pub fn cell_count(&self) -> usize {
        self.iter_cells().count()
    }

    /// Number of atomic parts in the whole tree.
    pub fn part_count(&self) -> usize {
        self.iter_cells().map(|(_, _, _, cell)| cell_part_count(cell)).sum()
    }
}
