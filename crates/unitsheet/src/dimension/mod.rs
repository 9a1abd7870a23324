//! Dimension algebra for compound units.
//!
//! A physical dimension is an exponent vector over seven base dimensions.
//! Compound units get their dimension by summing the (exponent-scaled)
//! dimensions of their atomic parts, and the result is stored as a short
//! canonical abbreviation such as `L-1 I`.

mod abbreviation;
mod vector;

pub use abbreviation::parse_abbreviation;
pub use vector::{BaseDimension, DimensionVector};
pub(crate) use vector::format_exponent;
