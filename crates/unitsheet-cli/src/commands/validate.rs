//! Validate command - score a directory of workbooks against references.

use std::path::PathBuf;

use colored::Colorize;
use unitsheet::scoring::{SkipReason, load_ignore_list};
use unitsheet::{BatchValidator, CatalogParser, ExtractionConfig, SymbolCatalog, ValidationConfig};

/// Options for the validate command.
pub struct ValidateArgs {
    pub catalog: Option<PathBuf>,
    pub precomputed: bool,
    pub debug_output: Option<PathBuf>,
    pub ignore_list: Option<PathBuf>,
    pub max_words: usize,
    pub json: bool,
}

pub fn run(dir: PathBuf, args: ValidateArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !dir.is_dir() {
        return Err(format!("Not a directory: {}", dir.display()).into());
    }

    let mut config = ValidationConfig::default()
        .with_debug(args.debug_output.is_some())
        .with_extraction(ExtractionConfig::default().with_max_words(args.max_words));
    if let Some(ref path) = args.ignore_list {
        config = config.with_ignore(load_ignore_list(path)?);
    }

    let parser = match (args.precomputed, args.catalog) {
        (true, _) => None,
        (false, Some(path)) => Some(CatalogParser::new(SymbolCatalog::load(&path)?)),
        (false, None) => return Err("--catalog is required unless --precomputed is given".into()),
    };
    let validator = match parser {
        Some(ref parser) => BatchValidator::with_parser(parser, config),
        None => BatchValidator::precomputed(config),
    };

    let report = validator.validate_dir(&dir)?;

    if let (Some(path), Some(ledger)) = (&args.debug_output, &report.ledger) {
        let (units, files) = ledger.write_reports(path)?;
        log::info!("Wrote {} and {}", units.display(), files.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} {}", "Validation of".cyan().bold(), dir.display().to_string().white());
    println!();
    println!(
        "  Files: {} seen, {} attempted, {} scored, {} sheet(s)",
        report.files_seen,
        report.files_attempted,
        report.files_scored.to_string().green(),
        report.sheets_processed
    );

    let missing = count_skipped(&report.skipped, |r| matches!(r, SkipReason::MissingReference));
    let ignored = count_skipped(&report.skipped, |r| matches!(r, SkipReason::Ignored));
    let unreadable = count_skipped(&report.skipped, |r| matches!(r, SkipReason::Unreadable(_)));
    if missing + ignored + unreadable > 0 {
        println!(
            "  Skipped: {} ignored, {} without reference, {} unreadable",
            ignored,
            missing.to_string().yellow(),
            unreadable.to_string().red()
        );
    }
    println!();

    match report.statistics() {
        Ok(stats) => println!("  {}", stats.to_string().bold()),
        Err(e) => println!("  {} ({})", e.to_string().red(), report.counts),
    }

    Ok(())
}

fn count_skipped(skipped: &[unitsheet::scoring::SkippedFile], pred: impl Fn(&SkipReason) -> bool) -> usize {
    skipped.iter().filter(|s| pred(&s.reason)).count()
}
