//! Annotate command - add or remove atomic unit parts.

use std::path::PathBuf;

use colored::Colorize;
use unitsheet::{RemovalOutcome, Session, SymbolCatalog};

/// Fields of the part to add.
pub struct PartArgs {
    pub sheet: String,
    pub cell: String,
    pub unit: String,
    pub prefix: Option<String>,
    pub exponent: Option<String>,
    pub multiplier: Option<String>,
}

pub fn add(tree_path: PathBuf, part: PartArgs, catalog_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = SymbolCatalog::load(&catalog_path)?;

    let mut session = if tree_path.exists() {
        Session::open(&tree_path, catalog)?
    } else {
        Session::new(catalog)
    };

    let added = session.add_annotation(
        &part.sheet,
        &part.cell,
        &part.unit,
        part.prefix.as_deref(),
        part.multiplier.as_deref(),
        part.exponent.as_deref(),
    )?;
    session.save_as(&tree_path)?;

    let dimension = if added.dimension.is_empty() {
        "dimensionless".dimmed()
    } else {
        added.dimension.yellow()
    };
    println!(
        "{} {} to {}!{} (dimension: {})",
        "Added".green().bold(),
        part.unit.white(),
        part.sheet,
        added.cell,
        dimension
    );

    Ok(())
}

pub fn remove(
    tree_path: PathBuf,
    sheet: String,
    column: String,
    row: String,
    index: usize,
    catalog_path: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = SymbolCatalog::load(&catalog_path)?;
    let mut session = Session::open(&tree_path, catalog)?;

    let outcome = session.remove_annotation(&sheet, &column, &row, index)?;
    session.save()?;

    let detail = match outcome {
        RemovalOutcome::PartRemoved => "cell still annotated".to_string(),
        RemovalOutcome::RowRemoved => format!("cell {}{} cleared", column, row),
        RemovalOutcome::ColumnRemoved => format!("column {} cleared", column),
        RemovalOutcome::SheetRemoved => format!("sheet '{}' cleared", sheet),
    };
    println!(
        "{} part {} from {}!{}{} ({})",
        "Removed".green().bold(),
        index,
        sheet,
        column,
        row,
        detail.dimmed()
    );

    Ok(())
}
