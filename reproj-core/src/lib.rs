#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod lock;
pub mod logging;
pub mod manifest;
pub mod output;
pub mod pattern;
pub mod scanner;
pub mod symbols;
pub mod transaction;

pub use config::{Config, CONFIG_DIR};
pub use error::{Error, Result};
pub use lock::LockFile;
pub use logging::TransactionLog;
pub use manifest::{find_manifest, new_project_id, renamed_project_path, Manifest, ProjectEntry};
pub use output::{
    render_project_table, EntryEditResult, ListResult, OutputFormat, OutputFormatter, PlanReport,
    RenameReport, SolutionRenameResult, VersionResult,
};
pub use pattern::{extract_namespaces, extract_type_names, NamespaceDecl};
pub use scanner::{is_excluded_dir_name, scan_files, ScanOptions, SourceFiles};
pub use symbols::{RenameOutcome, SymbolRenamer};
pub use transaction::{ProjectRenamer, RenamePlan, TransactionOptions, TransactionResult};
