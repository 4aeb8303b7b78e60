use anyhow::{Context, Result};
use clap::Parser;
use reproj_core::{OutputFormatter, VersionResult};
use std::io::{self, IsTerminal};
use std::process;

mod backup;
mod cli;
mod entry;
mod list;
mod rename;
mod solution;
mod workspace;

use cli::{Cli, Commands, OutputFormat};

fn main() {
    let cli = Cli::parse();
    let use_color = !cli.no_color && io::stdout().is_terminal();

    // Handle -C directory flag
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir)
            .with_context(|| format!("Failed to change to directory: {}", dir.display()))
            .unwrap_or_else(|e| {
                eprintln!("Error: {e:#}");
                process::exit(2);
            });
    }

    let solution_path = cli.solution.as_deref();
    let result = match cli.command {
        Commands::List { output } => list::handle_list(solution_path, output, use_color).map(|()| true),

        Commands::Rename {
            old,
            new,
            dry_run,
            backup,
            output,
        } => rename::handle_rename(
            solution_path,
            rename::RenameArgs {
                old,
                new,
                dry_run,
                backup,
                output,
            },
            cli.yes,
            use_color,
        ),

        Commands::RenameEntry { old, new, output } => {
            entry::handle_rename_entry(solution_path, &old, &new, output).map(|()| true)
        },

        Commands::SetPath {
            old_path,
            new_path,
            output,
        } => entry::handle_set_path(solution_path, &old_path, &new_path, output).map(|()| true),

        Commands::Add {
            name,
            path,
            type_tag,
            id,
            output,
        } => entry::handle_add(
            solution_path,
            &name,
            &path,
            type_tag.as_deref(),
            id.as_deref(),
            output,
        )
        .map(|()| true),

        Commands::RenameSolution {
            new_file_name,
            output,
        } => solution::handle_rename_solution(solution_path, &new_file_name, output).map(|()| true),

        Commands::Version { output } => handle_version(output).map(|()| true),
    };

    match result {
        Ok(true) => process::exit(0),
        // The report has already been printed
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(exit_code(&e));
        },
    }
}

/// Conflicts are failed operations; everything else is a usage or setup
/// problem.
fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<reproj_core::Error>() {
        Some(reproj_core::Error::Conflict(_)) => 1,
        _ => 2,
    }
}

fn handle_version(output: OutputFormat) -> Result<()> {
    let version_result = VersionResult {
        name: "reproj".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    println!("{}", version_result.format(output.into()));
    Ok(())
}
