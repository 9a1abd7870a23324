//! Parsing of canonical dimension abbreviations back into vectors.

use crate::error::{Result, UnitSheetError};

use super::vector::{BaseDimension, DimensionVector};

/// Parse an abbreviation such as `L-1 I` or `M L2 T-3`.
///
/// Symbols may appear in any order; a repeated symbol accumulates. The
/// empty string parses to the zero vector.
pub fn parse_abbreviation(abbreviation: &str) -> Result<DimensionVector> {
    let mut vector = DimensionVector::zero();

    for token in abbreviation.split_whitespace() {
        let mut chars = token.chars();
        let symbol = chars
            .next()
            .ok_or_else(|| UnitSheetError::InvalidDimension(abbreviation.to_string()))?;
        let base = BaseDimension::from_symbol(&symbol.to_string())
            .ok_or_else(|| UnitSheetError::InvalidDimension(abbreviation.to_string()))?;

        let rest = chars.as_str();
        let exponent = if rest.is_empty() {
            1.0
        } else {
            rest.parse::<f64>()
                .map_err(|_| UnitSheetError::InvalidDimension(abbreviation.to_string()))?
        };

        vector.set(base, vector.get(base) + exponent);
    }

    Ok(vector)
}
