//! Directory-wide validation of extracted annotations against references.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::annotation::{AnnotationTree, LoadPolicy, reference_path};
use crate::error::{Result, UnitSheetError};
use crate::extraction::{ExtractionConfig, ExtractionDriver, UnitParser, Workbook, is_workbook};

use super::counts::{Counts, Statistics};
use super::ledger::DebugLedger;
use super::matcher::compare_trees_in_place;

const ANNOTATION_SUFFIX: &str = ".ccut.json";
const REFERENCE_SUFFIX: &str = ".ccutvld.json";

/// Batch validation settings.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// File stems to skip.
    pub ignore: HashSet<String>,
    /// Keep per-unit and per-file tallies.
    pub debug: bool,
    /// Log progress every this many files; 0 disables progress logs.
    pub progress_interval: usize,
    pub extraction: ExtractionConfig,
    pub load_policy: LoadPolicy,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            ignore: HashSet::new(),
            debug: false,
            progress_interval: 10,
            extraction: ExtractionConfig::default(),
            load_policy: LoadPolicy::default(),
        }
    }
}

impl ValidationConfig {
    pub fn with_ignore<I, S>(mut self, stems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(stems.into_iter().map(Into::into));
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn with_extraction(mut self, extraction: ExtractionConfig) -> Self {
        self.extraction = extraction;
        self
    }

    pub fn with_load_policy(mut self, policy: LoadPolicy) -> Self {
        self.load_policy = policy;
        self
    }
}

/// Read an ignore list: a JSON array of file stems.
pub fn load_ignore_list(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| UnitSheetError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| {
        UnitSheetError::Config(format!("Invalid ignore list '{}': {}", path.display(), e))
    })
}

/// Where extracted annotations come from.
#[derive(Clone, Copy)]
pub enum ActualSource<'p> {
    /// Read `<stem>.ccut.json` files written by an earlier extraction.
    Precomputed,
    /// Run extraction on each workbook with this parser.
    Extract(&'p dyn UnitParser),
}

/// Result for one scored file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileResult {
    pub file: String,
    /// SHA-256 of the data file.
    pub hash: String,
    pub sheets: usize,
    pub counts: Counts,
}

/// Why a file was not scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    Ignored,
    MissingReference,
    Unreadable(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFile {
    pub file: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub generated_at: DateTime<Utc>,
    pub directory: PathBuf,
    pub counts: Counts,
    /// Data files discovered in the directory.
    pub files_seen: usize,
    /// Files not on the ignore list, scored or not.
    pub files_attempted: usize,
    /// Files compared against a reference record.
    pub files_scored: usize,
    pub sheets_processed: usize,
    pub per_file: Vec<FileResult>,
    pub skipped: Vec<SkippedFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger: Option<DebugLedger>,
}

impl ValidationReport {
    /// Precision, recall and F1 over all scored files.
    pub fn statistics(&self) -> Result<Statistics> {
        self.counts.statistics()
    }

    /// One line of statistics, or a diagnostic when they are undefined.
    pub fn summary_line(&self) -> String {
        match self.statistics() {
            Ok(stats) => stats.to_string(),
            Err(e) => format!("{} | {}", e, self.counts),
        }
    }
}

enum FileOutcome {
    Scored(FileResult, DebugLedger),
    Skipped(SkippedFile),
}

/// Scores every data file in a directory against its reference record.
pub struct BatchValidator<'p> {
    config: ValidationConfig,
    source: ActualSource<'p>,
}

impl<'p> BatchValidator<'p> {
    /// Validate precomputed `<stem>.ccut.json` records.
    pub fn precomputed(config: ValidationConfig) -> Self {
        Self {
            config,
            source: ActualSource::Precomputed,
        }
    }

    /// Validate by extracting each workbook with `parser`.
    pub fn with_parser(parser: &'p dyn UnitParser, config: ValidationConfig) -> Self {
        Self {
            config,
            source: ActualSource::Extract(parser),
        }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Data files in `dir`, sorted by file name.
    pub fn discover(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|e| UnitSheetError::io(dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| UnitSheetError::io(dir, e))?;
            let path = entry.path();
            let wanted = match self.source {
                ActualSource::Precomputed => path.is_file() && file_name(&path).ends_with(ANNOTATION_SUFFIX),
                ActualSource::Extract(_) => is_workbook(&path),
            };
            if wanted {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Score every data file in `dir`.
    ///
    /// Files are scored in parallel; results are merged in file-name order.
    pub fn validate_dir(&self, dir: impl AsRef<Path>) -> Result<ValidationReport> {
        let dir = dir.as_ref();
        let files = self.discover(dir)?;
        let total = files.len();
        info!("Validating {} file(s) in {}", total, dir.display());

        let started = Instant::now();
        let done = AtomicUsize::new(0);
        let running = Mutex::new(Counts::default());

        let outcomes: Vec<FileOutcome> = files
            .par_iter()
            .map(|path| {
                let outcome = self.validate_file(path);
                if let FileOutcome::Scored(ref result, _) = outcome {
                    if let Ok(mut running) = running.lock() {
                        *running += result.counts;
                    }
                }
                let finished = done.fetch_add(1, Ordering::SeqCst) + 1;
                self.report_progress(finished, total, started, &running);
                outcome
            })
            .collect();

        let mut report = ValidationReport {
            generated_at: Utc::now(),
            directory: dir.to_path_buf(),
            counts: Counts::default(),
            files_seen: total,
            files_attempted: 0,
            files_scored: 0,
            sheets_processed: 0,
            per_file: Vec::new(),
            skipped: Vec::new(),
            ledger: None,
        };
        let mut ledger = DebugLedger::new();

        for outcome in outcomes {
            match outcome {
                FileOutcome::Scored(result, file_ledger) => {
                    report.counts += result.counts;
                    report.files_attempted += 1;
                    report.files_scored += 1;
                    report.sheets_processed += result.sheets;
                    if self.config.debug {
                        ledger.merge(file_ledger);
                        ledger.record_file(&result.file, result.counts);
                    }
                    report.per_file.push(result);
                }
                FileOutcome::Skipped(skipped) => {
                    if skipped.reason != SkipReason::Ignored {
                        report.files_attempted += 1;
                    }
                    report.skipped.push(skipped);
                }
            }
        }
        if self.config.debug {
            report.ledger = Some(ledger);
        }

        info!("Validation finished: {}", report.summary_line());
        Ok(report)
    }

    fn validate_file(&self, path: &Path) -> FileOutcome {
        let file = file_name(path);
        let stem = self.stem_of(&file);

        if self.config.ignore.contains(&stem) {
            info!("Ignoring {}", file);
            return skipped(file, SkipReason::Ignored);
        }

        let reference = match self.source {
            ActualSource::Precomputed => path.with_file_name(format!("{}{}", stem, REFERENCE_SUFFIX)),
            ActualSource::Extract(_) => reference_path(path),
        };
        if !reference.is_file() {
            warn!("No reference record for {} (expected {})", file, reference.display());
            return skipped(file, SkipReason::MissingReference);
        }

        match self.score_file(path, &file, &reference) {
            Ok((result, ledger)) => FileOutcome::Scored(result, ledger),
            Err(e) => {
                warn!("Skipping {}: {}", file, e);
                skipped(file, SkipReason::Unreadable(e.to_string()))
            }
        }
    }

    fn score_file(&self, path: &Path, file: &str, reference: &Path) -> Result<(FileResult, DebugLedger)> {
        let (mut actual, hash, sheets) = match self.source {
            ActualSource::Precomputed => {
                let bytes = fs::read(path).map_err(|e| UnitSheetError::io(path, e))?;
                let json = std::str::from_utf8(&bytes).map_err(|e| {
                    UnitSheetError::Persistence(format!("'{}' is not UTF-8: {}", path.display(), e))
                })?;
                let tree = AnnotationTree::from_json_str(json, self.config.load_policy)?;
                let sheets = tree.len();
                (tree, sha256_hex(&bytes), sheets)
            }
            ActualSource::Extract(parser) => {
                let workbook = Workbook::load(path)?;
                let driver = ExtractionDriver::with_config(parser, self.config.extraction.clone());
                let tree = driver.extract_workbook(&workbook);
                let sheets = workbook.sheet_count();
                (tree, workbook.source.hash, sheets)
            }
        };
        let mut expected = AnnotationTree::load_with_policy(reference, self.config.load_policy)?;

        let mut ledger = DebugLedger::new();
        let counts = if self.config.debug {
            compare_trees_in_place(&mut actual, &mut expected, Some(&mut ledger))
        } else {
            compare_trees_in_place(&mut actual, &mut expected, None)
        };

        Ok((
            FileResult {
                file: file.to_string(),
                hash,
                sheets,
                counts,
            },
            ledger,
        ))
    }

    fn stem_of(&self, file: &str) -> String {
        match self.source {
            ActualSource::Precomputed => file.strip_suffix(ANNOTATION_SUFFIX).unwrap_or(file).to_string(),
            ActualSource::Extract(_) => Path::new(file)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.to_string()),
        }
    }

    fn report_progress(&self, finished: usize, total: usize, started: Instant, running: &Mutex<Counts>) {
        let interval = self.config.progress_interval;
        if interval == 0 || finished % interval != 0 {
            return;
        }

        let elapsed = started.elapsed().as_secs_f64();
        let remaining = total.saturating_sub(finished);
        let eta = elapsed / finished as f64 * remaining as f64;
        let percent = 100.0 * finished as f64 / total.max(1) as f64;
        let stats = match running.lock() {
            Ok(counts) => match counts.statistics() {
                Ok(stats) => stats.to_string(),
                Err(e) => format!("{} | {}", e, *counts),
            },
            Err(_) => "statistics unavailable".to_string(),
        };

        info!(
            "{}/{} files ({:.1}%), ETA {:.0}s | {}",
            finished, total, percent, eta, stats
        );
    }
}

fn skipped(file: String, reason: SkipReason) -> FileOutcome {
    FileOutcome::Skipped(SkippedFile { file, reason })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("sha256:{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_of() {
        let precomputed = BatchValidator::precomputed(ValidationConfig::default());
        assert_eq!(precomputed.stem_of("run1.ccut.json"), "run1");

        let parser = crate::extraction::MockParser::new();
        let extracting = BatchValidator::with_parser(&parser, ValidationConfig::default());
        assert_eq!(extracting.stem_of("run1.csv"), "run1");
        assert_eq!(extracting.stem_of("run2"), "run2");
    }

    #[test]
    fn test_config_builders() {
        let config = ValidationConfig::default()
            .with_ignore(["a", "b"])
            .with_debug(true)
            .with_progress_interval(0);
        assert!(config.ignore.contains("a"));
        assert!(config.debug);
        assert_eq!(config.progress_interval, 0);
    }

    #[test]
    fn test_summary_line_reports_undefined_metric() {
        let report = ValidationReport {
            generated_at: Utc::now(),
            directory: PathBuf::from("."),
            counts: Counts::default(),
            files_seen: 0,
            files_attempted: 0,
            files_scored: 0,
            sheets_processed: 0,
            per_file: Vec::new(),
            skipped: Vec::new(),
            ledger: None,
        };
        assert!(report.statistics().is_err());
        assert!(report.summary_line().starts_with("Undefined metric"));
    }
}
