//! Extract command - annotate a workbook with the catalog parser.

use std::path::PathBuf;

use colored::Colorize;
use unitsheet::annotation::annotation_path;
use unitsheet::{CatalogParser, ExtractionConfig, ExtractionDriver, SymbolCatalog, Workbook};

pub fn run(
    workbook_path: PathBuf,
    output: Option<PathBuf>,
    catalog_path: PathBuf,
    max_words: usize,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = SymbolCatalog::load(&catalog_path)?;
    if catalog.is_empty() {
        return Err(format!("Symbol catalog {} has no symbols", catalog_path.display()).into());
    }
    let parser = CatalogParser::new(catalog);

    println!("{} {}", "Extracting".cyan().bold(), workbook_path.display().to_string().white());

    let workbook = Workbook::load(&workbook_path)?;
    let driver = ExtractionDriver::with_config(&parser, ExtractionConfig::default().with_max_words(max_words));
    let tree = driver.extract_workbook(&workbook);

    let output_path = output.unwrap_or_else(|| annotation_path(&workbook_path));
    tree.save(&output_path)?;

    if verbose {
        for (name, columns) in tree.sheets() {
            let cells: usize = columns.values().map(|rows| rows.len()).sum();
            println!("  {}: {} annotated cell(s)", name.white(), cells);
        }
    }

    println!(
        "{} {} sheet(s), {} cell(s), {} unit part(s)",
        "Annotated".green().bold(),
        workbook.sheet_count(),
        tree.cell_count(),
        tree.part_count()
    );
    println!("Saved to {}", output_path.display().to_string().cyan());

    Ok(())
}
