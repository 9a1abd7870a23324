//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use unitsheet::SuggestionKind;

/// unitsheet: physical-unit annotations for spreadsheets
#[derive(Parser)]
#[command(name = "unitsheet")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract unit annotations from a workbook (CSV file or directory of CSVs)
    Extract {
        /// Path to the workbook
        #[arg(value_name = "WORKBOOK")]
        workbook: PathBuf,

        /// Output path (default: <workbook>.ccut.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Symbol catalog JSON
        #[arg(long, value_name = "CATALOG")]
        catalog: PathBuf,

        /// Skip cells with more space-separated words than this
        #[arg(long, default_value = "6")]
        max_words: usize,
    },

    /// Add or remove atomic unit parts in an annotation record
    Annotate {
        #[command(subcommand)]
        action: AnnotateAction,
    },

    /// Suggest sheet names, prefixes or units for a partial entry
    Suggest {
        /// What to suggest: sheet, prefix, or unit
        #[arg(value_name = "KIND")]
        kind: SuggestionKind,

        /// Partial text to match
        #[arg(value_name = "QUERY")]
        query: String,

        /// Annotation record providing sheet names
        #[arg(long)]
        tree: Option<PathBuf>,

        /// Symbol catalog JSON
        #[arg(long, value_name = "CATALOG")]
        catalog: PathBuf,

        /// Maximum number of suggestions
        #[arg(short = 'n', long, default_value = "5")]
        limit: usize,
    },

    /// Score an extracted record against a reference record
    Score {
        /// Extracted annotation record
        #[arg(value_name = "ACTUAL")]
        actual: PathBuf,

        /// Reference annotation record
        #[arg(value_name = "EXPECTED")]
        expected: PathBuf,

        /// Write per-unit and per-file CSV reports next to this path
        #[arg(long, value_name = "FILE")]
        debug_output: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score every workbook in a directory against its reference record
    Validate {
        /// Directory of workbooks and reference records
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Symbol catalog JSON (required unless --precomputed)
        #[arg(long, value_name = "CATALOG", required_unless_present = "precomputed")]
        catalog: Option<PathBuf>,

        /// Score existing <stem>.ccut.json records instead of extracting
        #[arg(long)]
        precomputed: bool,

        /// Write per-unit and per-file CSV reports next to this path
        #[arg(long, value_name = "FILE")]
        debug_output: Option<PathBuf>,

        /// JSON array of file stems to skip
        #[arg(long, value_name = "FILE")]
        ignore_list: Option<PathBuf>,

        /// Skip cells with more space-separated words than this
        #[arg(long, default_value = "6")]
        max_words: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show per-sheet annotation counts
    Status {
        /// Annotation record
        #[arg(value_name = "TREE")]
        tree: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum AnnotateAction {
    /// Add an atomic unit part to a cell and recompute its dimension
    Add {
        /// Annotation record to edit (created if missing)
        #[arg(value_name = "TREE")]
        tree: PathBuf,

        /// Sheet name
        #[arg(long)]
        sheet: String,

        /// Cell reference, e.g. B3
        #[arg(long)]
        cell: String,

        /// Unit local name or URI, e.g. Meter
        #[arg(long)]
        unit: String,

        /// Prefix local name or URI, e.g. Kilo
        #[arg(long)]
        prefix: Option<String>,

        /// Exponent, e.g. -1
        #[arg(long, allow_hyphen_values = true)]
        exponent: Option<String>,

        /// Multiplier, e.g. 1000
        #[arg(long)]
        multiplier: Option<String>,

        /// Symbol catalog JSON
        #[arg(long, value_name = "CATALOG")]
        catalog: PathBuf,
    },

    /// Remove the N-th (1-based) part of a cell
    Remove {
        /// Annotation record to edit
        #[arg(value_name = "TREE")]
        tree: PathBuf,

        /// Sheet name
        #[arg(long)]
        sheet: String,

        /// Column label, e.g. B
        #[arg(long)]
        column: String,

        /// Row number, e.g. 3
        #[arg(long)]
        row: String,

        /// 1-based index of the part to remove
        #[arg(long)]
        index: usize,

        /// Symbol catalog JSON
        #[arg(long, value_name = "CATALOG")]
        catalog: PathBuf,
    },
}
