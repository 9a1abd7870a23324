//! unitsheet CLI - unit annotation and validation for spreadsheets.

mod cli;
mod commands;

use clap::Parser;
use cli::{AnnotateAction, Cli, Commands};
use env_logger::Env;

fn main() {
    let cli = Cli::parse();

    // Default level depends on --verbose; RUST_LOG overrides
    let env = if cli.verbose {
        Env::default().default_filter_or("info")
    } else {
        Env::default().default_filter_or("warn")
    };
    env_logger::Builder::from_env(env).init();

    let result = match cli.command {
        Commands::Extract {
            workbook,
            output,
            catalog,
            max_words,
        } => commands::extract::run(workbook, output, catalog, max_words, cli.verbose),

        Commands::Annotate { action } => match action {
            AnnotateAction::Add {
                tree,
                sheet,
                cell,
                unit,
                prefix,
                exponent,
                multiplier,
                catalog,
            } => commands::annotate::add(
                tree,
                commands::annotate::PartArgs {
                    sheet,
                    cell,
                    unit,
                    prefix,
                    exponent,
                    multiplier,
                },
                catalog,
            ),
            AnnotateAction::Remove {
                tree,
                sheet,
                column,
                row,
                index,
                catalog,
            } => commands::annotate::remove(tree, sheet, column, row, index, catalog),
        },

        Commands::Suggest {
            kind,
            query,
            tree,
            catalog,
            limit,
        } => commands::suggest::run(kind, query, tree, catalog, limit),

        Commands::Score {
            actual,
            expected,
            debug_output,
            json,
        } => commands::score::run(actual, expected, debug_output, json),

        Commands::Validate {
            dir,
            catalog,
            precomputed,
            debug_output,
            ignore_list,
            max_words,
            json,
        } => commands::validate::run(
            dir,
            commands::validate::ValidateArgs {
                catalog,
                precomputed,
                debug_output,
                ignore_list,
                max_words,
                json,
            },
        ),

        Commands::Status { tree, json } => commands::status::run(tree, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
