//! Exact-symbol unit parser backed by a [`SymbolCatalog`].

use log::debug;

use crate::catalog::{PrefixDefinition, SymbolCatalog, UnitDefinition, local_name};
use crate::dimension::{DimensionVector, format_exponent};
use crate::error::Result;

use super::parser::{CandidatePart, CandidateUnit, UnitParser};

/// Parses products and quotients of catalog symbols, e.g. `kg m^2 / s`.
///
/// Tokens are separated by whitespace, `*` or `·`; every token after a `/`
/// has its exponent negated. An exponent is written `^n` or as a trailing
/// integer (`m2`, `s-1`). Each token resolves to a unit symbol, or else to
/// a prefix symbol followed by a unit symbol (longest prefix wins).
/// Anything else becomes an unknown part.
#[derive(Debug, Clone)]
pub struct CatalogParser {
    catalog: SymbolCatalog,
}

impl CatalogParser {
    pub fn new(catalog: SymbolCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    fn resolve(&self, symbol: &str) -> Option<(&UnitDefinition, Option<&PrefixDefinition>)> {
        if let Some(unit) = self.catalog.unit_definitions(symbol).first() {
            return Some((unit, None));
        }

        let mut best: Option<(usize, &UnitDefinition, &PrefixDefinition)> = None;
        for (prefix_symbol, prefix) in &self.catalog.prefixes {
            let Some(rest) = symbol.strip_prefix(prefix_symbol.as_str()) else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            if let Some(unit) = self.catalog.unit_definitions(rest).first() {
                if best.is_none_or(|(len, _, _)| prefix_symbol.len() > len) {
                    best = Some((prefix_symbol.len(), unit, prefix));
                }
            }
        }
        best.map(|(_, unit, prefix)| (unit, Some(prefix)))
    }

    fn unit_dimension(&self, unit: &UnitDefinition) -> DimensionVector {
        unit.quantity_kind
            .as_deref()
            .and_then(|kind| self.catalog.quantity_kind_dimension(local_name(kind)))
            .map(DimensionVector::from_quantity_kind)
            .unwrap_or_default()
    }
}

impl UnitParser for CatalogParser {
    fn parse(&self, text: &str) -> Result<Vec<CandidateUnit>> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut parts = Vec::with_capacity(tokens.len());
        let mut dimension = DimensionVector::zero();
        for (token, denominator) in tokens {
            let (symbol, exponent) = split_exponent(&token);
            let exponent = if denominator { -exponent } else { exponent };

            let Some((unit, prefix)) = self.resolve(symbol) else {
                debug!("No catalog symbol for '{}'", token);
                parts.push(CandidatePart::unknown());
                continue;
            };

            let mut part = CandidatePart::new(unit.uri.clone());
            if let Some(prefix) = prefix {
                part = part.with_prefix(prefix.uri.clone());
            }
            if exponent != 1.0 {
                part = part.with_exponent(format_exponent(exponent));
            }
            dimension += self.unit_dimension(unit).scale(exponent);
            parts.push(part);
        }

        Ok(vec![CandidateUnit::new(parts, dimension.to_abbreviation())])
    }

    fn name(&self) -> &str {
        "catalog"
    }
}

/// Split text into `(token, after_slash)` pairs.
fn tokenize(text: &str) -> Vec<(String, bool)> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut denominator = false;

    for c in text.chars() {
        if c.is_whitespace() || c == '*' || c == '·' || c == '/' {
            if !current.is_empty() {
                tokens.push((std::mem::take(&mut current), denominator));
            }
            if c == '/' {
                denominator = true;
            }
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        tokens.push((current, denominator));
    }
    tokens
}

/// `m^2` → (`m`, 2), `s-1` → (`s`, -1), `kg` → (`kg`, 1).
fn split_exponent(token: &str) -> (&str, f64) {
    if let Some((symbol, exponent)) = token.split_once('^') {
        return match parse_finite(exponent) {
            Some(e) => (symbol, e),
            None => (token, 1.0),
        };
    }

    let digits_start = token
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);
    let Some(mut start) = digits_start else {
        return (token, 1.0);
    };
    if token[..start].ends_with('-') {
        start -= 1;
    }
    if start == 0 {
        return (token, 1.0);
    }
    match parse_finite(&token[start..]) {
        Some(e) => (&token[..start], e),
        None => (token, 1.0),
    }
}

fn parse_finite(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|e| e.is_finite())
}
