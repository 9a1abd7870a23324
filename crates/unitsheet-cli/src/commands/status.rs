//! Status command - per-sheet summary of an annotation record.

use std::path::PathBuf;

use colored::Colorize;
use unitsheet::AnnotationTree;
use unitsheet::annotation::cell_part_count;

pub fn run(tree_path: PathBuf, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !tree_path.exists() {
        return Err(format!("Annotation record not found: {}", tree_path.display()).into());
    }
    let tree = AnnotationTree::load(&tree_path)?;

    let sheets: Vec<(String, usize, usize, usize)> = tree
        .sheets()
        .iter()
        .map(|(name, columns)| {
            let cells: usize = columns.values().map(|rows| rows.len()).sum();
            let parts: usize = columns
                .values()
                .flat_map(|rows| rows.values())
                .map(|cell| cell_part_count(cell))
                .sum();
            (name.clone(), columns.len(), cells, parts)
        })
        .collect();

    if json_output {
        let status = serde_json::json!({
            "file": tree_path,
            "sheets": sheets.iter().map(|(name, columns, cells, parts)| serde_json::json!({
                "name": name,
                "columns": columns,
                "cells": cells,
                "parts": parts,
            })).collect::<Vec<_>>(),
            "total_cells": tree.cell_count(),
            "total_parts": tree.part_count(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Annotation status for".cyan().bold(),
        tree_path.display().to_string().white()
    );
    println!();

    if sheets.is_empty() {
        println!("{}", "No annotations yet.".yellow());
        return Ok(());
    }

    println!("{}", "Sheets:".yellow().bold());
    for (name, columns, cells, parts) in &sheets {
        println!(
            "  {:<20} {} column(s), {} cell(s), {} part(s)",
            name.white(),
            columns,
            cells.to_string().green(),
            parts
        );
    }
    println!();
    println!(
        "Total: {} cell(s), {} unit part(s)",
        tree.cell_count().to_string().green().bold(),
        tree.part_count()
    );

    Ok(())
}
