//! Per-unit and per-file debug accounting, and its CSV reports.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::local_name;
use crate::error::{Result, UnitSheetError};

use super::counts::{Counts, Outcome};

/// TP / FP / FN tallies keyed by unit URI and by input file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugLedger {
    per_unit: IndexMap<String, Counts>,
    per_file: IndexMap<String, Counts>,
}

impl DebugLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one outcome for a unit URI.
    pub fn record_unit(&mut self, unit_uri: &str, outcome: Outcome) {
        self.per_unit
            .entry(unit_uri.to_string())
            .or_default()
            .record(outcome, 1);
    }

    /// Record the totals for one input file, adding to earlier totals.
    pub fn record_file(&mut self, file: &str, counts: Counts) {
        *self.per_file.entry(file.to_string()).or_default() += counts;
    }

    /// Tallies per unit URI.
    pub fn per_unit(&self) -> &IndexMap<String, Counts> {
        &self.per_unit
    }

    /// Tallies per file.
    pub fn per_file(&self) -> &IndexMap<String, Counts> {
        &self.per_file
    }

    /// Add another ledger's tallies into this one.
    pub fn merge(&mut self, other: DebugLedger) {
        for (unit, counts) in other.per_unit {
            *self.per_unit.entry(unit).or_default() += counts;
        }
        for (file, counts) in other.per_file {
            *self.per_file.entry(file).or_default() += counts;
        }
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.per_unit.is_empty() && self.per_file.is_empty()
    }

    /// Write `<stem>.units.csv` and `<stem>.files.csv` next to `debug_path`.
    ///
    /// Returns the two paths written.
    pub fn write_reports(&self, debug_path: impl AsRef<Path>) -> Result<(PathBuf, PathBuf)> {
        let (units_path, files_path) = report_paths(debug_path.as_ref());

        let mut writer = csv::Writer::from_path(&units_path)?;
        writer.write_record(["unit_uri_or_suffix", "tp", "fp", "fn"])?;
        for (unit, counts) in &self.per_unit {
            write_row(&mut writer, local_name(unit), counts)?;
        }
        writer
            .flush()
            .map_err(|e| UnitSheetError::io(&units_path, e))?;

        let mut writer = csv::Writer::from_path(&files_path)?;
        writer.write_record(["filename", "tp", "fp", "fn"])?;
        for (file, counts) in &self.per_file {
            write_row(&mut writer, file, counts)?;
        }
        writer
            .flush()
            .map_err(|e| UnitSheetError::io(&files_path, e))?;

        Ok((units_path, files_path))
    }
}

fn write_row<W: std::io::Write>(writer: &mut csv::Writer<W>, key: &str, counts: &Counts) -> Result<()> {
    writer.write_record([
        key.to_string(),
        counts.true_positives.to_string(),
        counts.false_positives.to_string(),
        counts.false_negatives.to_string(),
    ])?;
    Ok(())
}

/// `debug.csv` → (`debug.units.csv`, `debug.files.csv`).
pub fn report_paths(debug_path: &Path) -> (PathBuf, PathBuf) {
    (
        debug_path.with_extension("units.csv"),
        debug_path.with_extension("files.csv"),
    )
}
