//! Auto-complete suggestions for interactive annotation editing.
//!
//! The index holds flat lists of known sheet names, unit prefixes and
//! units, and answers fuzzy queries against them. It also carries the
//! unit → quantity-kind map used to recompute cell dimensions.

mod index;
mod resolver;
mod similarity;

pub use index::{ScoredSuggestion, SuggestionIndex, SuggestionKind};
pub use resolver::UnitResolver;
pub use similarity::similarity;
