//! Suggest command - fuzzy auto-complete for sheets, prefixes and units.

use std::path::PathBuf;

use colored::Colorize;
use unitsheet::{AnnotationTree, Session, SessionConfig, SuggestionKind, SymbolCatalog};

pub fn run(
    kind: SuggestionKind,
    query: String,
    tree_path: Option<PathBuf>,
    catalog_path: PathBuf,
    limit: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = SymbolCatalog::load(&catalog_path)?;
    let config = SessionConfig::default().with_suggestion_limit(limit);
    let session = match tree_path {
        Some(path) => Session::open_with_config(path, catalog, config)?,
        None => Session::with_tree(AnnotationTree::new(), catalog, config),
    };

    let suggestions = session.suggest(kind, &query);
    if suggestions.is_empty() {
        println!("No {} suggestions for '{}'", kind.label().to_lowercase(), query);
        return Ok(());
    }

    println!("{} for '{}':", format!("{} suggestions", kind.label()).cyan().bold(), query);
    for suggestion in suggestions {
        let score = suggestion.score.to_string();
        let score = if suggestion.score >= 80 {
            score.green()
        } else if suggestion.score >= 50 {
            score.yellow()
        } else {
            score.red()
        };
        println!("  {:>3}  {}", score, suggestion.value.white());
    }

    Ok(())
}
