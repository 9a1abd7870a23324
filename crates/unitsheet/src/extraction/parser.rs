//! The unit parser seam.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Quantity-kind marker for parts the parser could not identify.
pub const UNKNOWN_TYPE: &str = "UNKNOWN TYPE";

/// One part of a parsed candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidatePart {
    /// URI stored as the part's unit, or [`UNKNOWN_TYPE`].
    pub quantity_kind: String,
    pub prefix: Option<String>,
    pub exponent: Option<String>,
    pub multiplier: Option<String>,
}

impl CandidatePart {
    /// A part with only a quantity kind.
    pub fn new(quantity_kind: impl Into<String>) -> Self {
        Self {
            quantity_kind: quantity_kind.into(),
            prefix: None,
            exponent: None,
            multiplier: None,
        }
    }

    /// An unidentified part.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_TYPE)
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_exponent(mut self, exponent: impl Into<String>) -> Self {
        self.exponent = Some(exponent.into());
        self
    }

    pub fn with_multiplier(mut self, multiplier: impl Into<String>) -> Self {
        self.multiplier = Some(multiplier.into());
        self
    }

    /// True when the parser could not identify this part.
    pub fn is_unknown(&self) -> bool {
        self.quantity_kind == UNKNOWN_TYPE
    }
}

/// One interpretation of a cell's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateUnit {
    pub parts: Vec<CandidatePart>,
    /// Dimension abbreviation of the whole candidate.
    #[serde(default)]
    pub dimension: String,
}

impl CandidateUnit {
    pub fn new(parts: Vec<CandidatePart>, dimension: impl Into<String>) -> Self {
        Self {
            parts,
            dimension: dimension.into(),
        }
    }
}

/// Turns free cell text into ranked candidate units.
///
/// Implementations must be shareable across the batch validator's worker
/// threads.
pub trait UnitParser: Send + Sync {
    /// Parse one cell's text. Candidates are ranked best first.
    fn parse(&self, text: &str) -> Result<Vec<CandidateUnit>>;

    /// Human-readable name for logs.
    fn name(&self) -> &str {
        "parser"
    }
}
