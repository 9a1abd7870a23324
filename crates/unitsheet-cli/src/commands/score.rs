//! Score command - compare one extracted record against its reference.

use std::path::PathBuf;

use colored::Colorize;
use unitsheet::{AnnotationTree, DebugLedger, compare_trees};

pub fn run(
    actual_path: PathBuf,
    expected_path: PathBuf,
    debug_output: Option<PathBuf>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let actual = AnnotationTree::load(&actual_path)?;
    let expected = AnnotationTree::load(&expected_path)?;

    let mut ledger = DebugLedger::new();
    let counts = if debug_output.is_some() {
        compare_trees(&actual, &expected, Some(&mut ledger))
    } else {
        compare_trees(&actual, &expected, None)
    };
    let statistics = counts.statistics();

    if let Some(ref path) = debug_output {
        let file = actual_path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        ledger.record_file(&file, counts);
        let (units, files) = ledger.write_reports(path)?;
        log::info!("Wrote {} and {}", units.display(), files.display());
    }

    if json_output {
        let report = serde_json::json!({
            "actual": actual_path,
            "expected": expected_path,
            "counts": counts,
            "statistics": statistics.as_ref().ok(),
            "diagnostic": statistics.as_ref().err().map(|e| e.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {} vs {}",
        "Scoring".cyan().bold(),
        actual_path.display().to_string().white(),
        expected_path.display()
    );
    println!();
    println!("  True positives:  {}", counts.true_positives.to_string().green());
    println!("  False positives: {}", counts.false_positives.to_string().yellow());
    println!("  False negatives: {}", counts.false_negatives.to_string().red());
    println!();

    match statistics {
        Ok(stats) => {
            println!("  Precision: {:.4}", stats.precision);
            println!("  Recall:    {:.4}", stats.recall);
            println!("  F1:        {}", format!("{:.4}", stats.f1).bold());
        }
        Err(e) => println!("  {}", e.to_string().red()),
    }

    Ok(())
}
