//! True/false positive/negative counts and derived statistics.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::error::{Result, UnitSheetError};

/// Classification of one atomic unit part during scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Extracted and annotated.
    TruePositive,
    /// Extracted but not annotated.
    FalsePositive,
    /// Annotated but not extracted.
    FalseNegative,
}

/// TP / FP / FN tallies. Combining counts is a plain sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    #[serde(rename = "tp")]
    pub true_positives: usize,
    #[serde(rename = "fp")]
    pub false_positives: usize,
    #[serde(rename = "fn")]
    pub false_negatives: usize,
}

impl Counts {
    /// Create counts.
    pub fn new(true_positives: usize, false_positives: usize, false_negatives: usize) -> Self {
        Self {
            true_positives,
            false_positives,
            false_negatives,
        }
    }

    /// Add `n` to the tally for `outcome`.
    pub fn record(&mut self, outcome: Outcome, n: usize) {
        match outcome {
            Outcome::TruePositive => self.true_positives += n,
            Outcome::FalsePositive => self.false_positives += n,
            Outcome::FalseNegative => self.false_negatives += n,
        }
    }

    /// Precision, recall and F1 for these counts.
    pub fn statistics(&self) -> Result<Statistics> {
        Statistics::from_counts(*self)
    }
}

impl Add for Counts {
    type Output = Counts;

    fn add(self, rhs: Counts) -> Counts {
        Counts {
            true_positives: self.true_positives + rhs.true_positives,
            false_positives: self.false_positives + rhs.false_positives,
            false_negatives: self.false_negatives + rhs.false_negatives,
        }
    }
}

impl AddAssign for Counts {
    fn add_assign(&mut self, rhs: Counts) {
        *self = *self + rhs;
    }
}

impl Sum for Counts {
    fn sum<I: Iterator<Item = Counts>>(iter: I) -> Self {
        iter.fold(Counts::default(), |acc, c| acc + c)
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tp={}, fp={}, fn={}",
            self.true_positives, self.false_positives, self.false_negatives
        )
    }
}

/// Precision, recall and F1 derived from [`Counts`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub counts: Counts,
}

impl Statistics {
    /// Compute statistics; any zero denominator is `UndefinedMetric`.
    pub fn from_counts(counts: Counts) -> Result<Self> {
        let tp = counts.true_positives as f64;
        let predicted = counts.true_positives + counts.false_positives;
        let annotated = counts.true_positives + counts.false_negatives;

        if predicted == 0 {
            return Err(UnitSheetError::UndefinedMetric(format!(
                "precision is undefined with no extracted units ({})",
                counts
            )));
        }
        if annotated == 0 {
            return Err(UnitSheetError::UndefinedMetric(format!(
                "recall is undefined with no annotated units ({})",
                counts
            )));
        }

        let precision = tp / predicted as f64;
        let recall = tp / annotated as f64;
        if precision + recall == 0.0 {
            return Err(UnitSheetError::UndefinedMetric(format!(
                "F1 is undefined when precision and recall are both zero ({})",
                counts
            )));
        }
        let f1 = 2.0 * precision * recall / (precision + recall);

        Ok(Self {
            precision,
            recall,
            f1,
            counts,
        })
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "f1={:.4} | precision={:.4}, recall={:.4} | {}",
            self.f1, self.precision, self.recall, self.counts
        )
    }
}
