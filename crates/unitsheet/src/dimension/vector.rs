//! Exponent vectors over the base physical dimensions.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use indexmap::IndexMap;
use log::debug;

/// Base dimensions in canonical abbreviation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseDimension {
    Length,
    Mass,
    Time,
    Current,
    Temperature,
    Amount,
    LuminousIntensity,
}

impl BaseDimension {
    /// All base dimensions, in the order they appear in abbreviations.
    pub const ALL: [BaseDimension; 7] = [
        BaseDimension::Length,
        BaseDimension::Mass,
        BaseDimension::Time,
        BaseDimension::Current,
        BaseDimension::Temperature,
        BaseDimension::Amount,
        BaseDimension::LuminousIntensity,
    ];

    /// Abbreviation symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            BaseDimension::Length => "L",
            BaseDimension::Mass => "M",
            BaseDimension::Time => "T",
            BaseDimension::Current => "I",
            BaseDimension::Temperature => "Θ",
            BaseDimension::Amount => "N",
            BaseDimension::LuminousIntensity => "J",
        }
    }

    /// Resolve a symbol or long name.
    ///
    /// Single-letter symbols are case-sensitive (`T` is time, not
    /// temperature); long names are matched case-insensitively.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let symbol = symbol.trim();
        let base = match symbol {
            "L" => BaseDimension::Length,
            "M" => BaseDimension::Mass,
            "T" => BaseDimension::Time,
            "I" => BaseDimension::Current,
            "Θ" | "H" | "K" => BaseDimension::Temperature,
            "N" => BaseDimension::Amount,
            "J" => BaseDimension::LuminousIntensity,
            _ => match symbol.to_lowercase().replace([' ', '-'], "_").as_str() {
                "length" => BaseDimension::Length,
                "mass" => BaseDimension::Mass,
                "time" => BaseDimension::Time,
                "current" | "electric_current" => BaseDimension::Current,
                "temperature" | "thermodynamic_temperature" => BaseDimension::Temperature,
                "amount" | "amount_of_substance" => BaseDimension::Amount,
                "luminosity" | "luminous_intensity" => BaseDimension::LuminousIntensity,
                _ => return None,
            },
        };
        Some(base)
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Exponents over the seven base dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DimensionVector {
    exponents: [f64; 7],
}

impl DimensionVector {
    /// The additive identity (dimensionless).
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build a vector from a quantity kind's base-symbol map,
    /// e.g. `{"M": 1}` for Mass or `{"L": 1, "T": -2}` for Acceleration.
    ///
    /// Unknown symbols are skipped.
    pub fn from_quantity_kind(spec: &IndexMap<String, f64>) -> Self {
        let mut vector = Self::zero();
        for (symbol, exponent) in spec {
            match BaseDimension::from_symbol(symbol) {
                Some(base) => vector.exponents[base.index()] += exponent,
                None => debug!("Ignoring unknown base dimension symbol '{}'", symbol),
            }
        }
        vector
    }

    /// Vector with a single base dimension set.
    pub fn of(base: BaseDimension, exponent: f64) -> Self {
        let mut vector = Self::zero();
        vector.exponents[base.index()] = exponent;
        vector
    }

    /// Exponent of one base dimension.
    pub fn get(&self, base: BaseDimension) -> f64 {
        self.exponents[base.index()]
    }

    /// Set the exponent of one base dimension.
    pub fn set(&mut self, base: BaseDimension, exponent: f64) {
        self.exponents[base.index()] = exponent;
    }

    /// Component-wise sum.
    pub fn add(self, other: DimensionVector) -> DimensionVector {
        let mut exponents = self.exponents;
        for (lhs, rhs) in exponents.iter_mut().zip(other.exponents.iter()) {
            *lhs += rhs;
        }
        DimensionVector { exponents }
    }

    /// Multiply every exponent by `exponent` (raising the unit to a power).
    pub fn scale(self, exponent: f64) -> DimensionVector {
        let mut exponents = self.exponents;
        for e in exponents.iter_mut() {
            *e *= exponent;
        }
        DimensionVector { exponents }
    }

    /// True when every exponent is zero.
    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(|e| *e == 0.0)
    }

    /// Canonical abbreviation, e.g. `L-1 I`.
    ///
    /// Symbols appear in [`BaseDimension::ALL`] order, zero exponents are
    /// omitted and an exponent of 1 prints without a suffix.
    pub fn to_abbreviation(&self) -> String {
        BaseDimension::ALL
            .iter()
            .filter_map(|base| {
                let exponent = self.get(*base);
                if exponent == 0.0 {
                    None
                } else if exponent == 1.0 {
                    Some(base.symbol().to_string())
                } else {
                    Some(format!("{}{}", base.symbol(), format_exponent(exponent)))
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Integral exponents print without a decimal point.
pub(crate) fn format_exponent(exponent: f64) -> String {
    if exponent.fract() == 0.0 && exponent.abs() < 1e15 {
        format!("{}", exponent as i64)
    } else {
        format!("{}", exponent)
    }
}

impl Add for DimensionVector {
    type Output = DimensionVector;

    fn add(self, rhs: DimensionVector) -> DimensionVector {
        DimensionVector::add(self, rhs)
    }
}

impl AddAssign for DimensionVector {
    fn add_assign(&mut self, rhs: DimensionVector) {
        *self = DimensionVector::add(*self, rhs);
    }
}

impl Sum for DimensionVector {
    fn sum<I: Iterator<Item = DimensionVector>>(iter: I) -> Self {
        iter.fold(DimensionVector::zero(), |acc, v| acc + v)
    }
}

impl fmt::Display for DimensionVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_abbreviation())
    }
}
