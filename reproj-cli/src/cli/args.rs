use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::types::OutputFormat;

/// Rename projects inside a solution: namespaces, directories, descriptors
/// and manifest entries
#[derive(Parser, Debug)]
#[command(name = "reproj")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Run as if started in <path> instead of the current working directory
    #[arg(short = 'C', global = true, value_name = "PATH")]
    pub directory: Option<PathBuf>,

    /// Solution file to operate on (defaults to the only .sln in the directory)
    #[arg(short = 's', long, global = true, value_name = "FILE")]
    pub solution: Option<PathBuf>,

    /// Assume yes for all prompts
    #[arg(short = 'y', long = "yes", global = true, env = "REPROJ_YES")]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the projects in the solution
    List {
        /// Output format
        #[arg(long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// Rename a project: namespaces, directory, descriptor and manifest entry
    Rename {
        /// Current project name (prompted for when omitted)
        old: Option<String>,

        /// New project name (prompted for when omitted)
        new: Option<String>,

        /// Show what would change without touching anything
        #[arg(long)]
        dry_run: bool,

        /// Copy the project directory to .reproj/backups first
        #[arg(long)]
        backup: bool,

        /// Output format
        #[arg(long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// Rename a manifest entry without touching any files
    RenameEntry {
        old: String,
        new: String,

        /// Output format
        #[arg(long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// Point a manifest entry at a different descriptor path
    SetPath {
        old_path: String,
        new_path: String,

        /// Output format
        #[arg(long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// Add a project entry to the manifest
    Add {
        name: String,
        path: String,

        /// Project type tag (defaults to the C# project type)
        #[arg(long, value_name = "TAG")]
        type_tag: Option<String>,

        /// Project id (generated when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Output format
        #[arg(long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// Rename the solution file itself
    RenameSolution {
        /// New file name; `.sln` is added when there is no extension
        new_file_name: String,

        /// Output format
        #[arg(long, value_enum)]
        output: Option<OutputFormat>,
    },

    /// Show version information
    Version {
        /// Output format
        #[arg(long, value_enum, default_value = "summary")]
        output: OutputFormat,
    },
}
