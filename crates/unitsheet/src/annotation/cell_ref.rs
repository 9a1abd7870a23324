//! Spreadsheet cell references ("A15") and column labels.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, UnitSheetError};

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid digit pattern"));

/// Column label and row number of one cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellKey {
    /// Upper-case column label, e.g. "AB".
    pub column: String,
    /// Row number as written, e.g. "15".
    pub row: String,
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

/// Split a cell reference such as `"a15"` into column `"A"` and row `"15"`.
///
/// The row is the first run of digits; the column is whatever precedes it,
/// upper-cased.
pub fn cell_key_of(cell_reference: &str) -> Result<CellKey> {
    let trimmed = cell_reference.trim();
    let digits = DIGIT_RUN
        .find(trimmed)
        .ok_or_else(|| UnitSheetError::MalformedCellReference(cell_reference.to_string()))?;

    Ok(CellKey {
        column: trimmed[..digits.start()].trim().to_uppercase(),
        row: digits.as_str().to_string(),
    })
}

/// Spreadsheet label for a 1-based column number (1 → "A", 27 → "AA").
///
/// Column 0 has no label and yields an empty string.
pub fn column_label(mut number: usize) -> String {
    let mut label = Vec::new();
    while number > 0 {
        let rem = (number - 1) % 26;
        label.push(b'A' + rem as u8);
        number = (number - 1) / 26;
    }
    label.reverse();
    String::from_utf8(label).unwrap_or_default()
}

/// 1-based column number of a label ("A" → 1, "AB" → 28), case-insensitive.
pub fn column_number(label: &str) -> Option<usize> {
    if label.is_empty() {
        return None;
    }
    label.chars().try_fold(0usize, |acc, c| {
        let c = c.to_ascii_uppercase();
        if c.is_ascii_uppercase() {
            acc.checked_mul(26)?
                .checked_add((c as u8 - b'A') as usize + 1)
        } else {
            None
        }
    })
}
