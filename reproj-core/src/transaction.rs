//! Rename a project across namespaces, directory, descriptor and manifest.
//!
//! Steps run in order and each is recorded in the result before the next
//! one starts. When a step after the directory move fails, the recorded
//! moves are undone in reverse order. Namespace text rewritten by the first
//! step is not restored.

use crate::error::{require_name, Error, Result};
use crate::logging::TransactionLog;
use crate::manifest::{Manifest, ProjectEntry};
use crate::pattern::replace_ignore_case;
use crate::symbols::{RenameOutcome, SymbolRenamer};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct TransactionOptions {
    /// Descriptor extension used when the manifest entry has none
    pub descriptor_extension: String,
    /// Where to append the step log, if anywhere
    pub log_file: Option<PathBuf>,
}

impl Default for TransactionOptions {
    fn default() -> Self {
        Self {
            descriptor_extension: "csproj".to_string(),
            log_file: None,
        }
    }
}

/// Where everything is and where it will go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamePlan {
    pub old_name: String,
    pub new_name: String,
    pub entry: ProjectEntry,
    pub current_directory: PathBuf,
    /// `None` when the directory keeps its name
    pub target_directory: Option<PathBuf>,
    pub old_descriptor_name: String,
    pub new_descriptor_name: String,
}

/// What one `rename_project_with_files` call did.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionResult {
    pub old_name: String,
    pub new_name: String,
    pub success: bool,
    pub directory_renamed: bool,
    pub descriptor_renamed: bool,
    pub manifest_updated: bool,
    pub rolled_back: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_directory: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_directory: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_descriptor: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_descriptor: Option<PathBuf>,
    pub outcome: RenameOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl TransactionResult {
    fn new(old_name: &str, new_name: &str) -> Self {
        Self {
            old_name: old_name.to_string(),
            new_name: new_name.to_string(),
            ..Self::default()
        }
    }

    fn fail(&mut self, error: &Error) {
        self.success = false;
        self.error = Some(error.to_string());
        self.error_kind = Some(error.code().to_string());
    }
}

/// Runs rename transactions against one loaded manifest.
pub struct ProjectRenamer<'a> {
    manifest: &'a Manifest,
    symbols: SymbolRenamer,
    options: TransactionOptions,
}

impl<'a> ProjectRenamer<'a> {
    pub fn new(manifest: &'a Manifest, symbols: SymbolRenamer, options: TransactionOptions) -> Self {
        Self {
            manifest,
            symbols,
            options,
        }
    }

    pub fn with_defaults(manifest: &'a Manifest) -> Self {
        Self::new(manifest, SymbolRenamer::default(), TransactionOptions::default())
    }

    /// Resolve source and target locations without touching anything.
    pub fn plan(&self, old_name: &str, new_name: &str, solution_dir: &Path) -> Result<RenamePlan> {
        require_name("old project name", old_name)?;
        require_name("new project name", new_name)?;
        if old_name.trim() == new_name.trim() {
            return Err(Error::invalid_argument(format!(
                "New project name is the same as the old one: {old_name}"
            )));
        }
        if !solution_dir.is_dir() {
            return Err(Error::invalid_argument(format!(
                "Solution directory does not exist: {}",
                solution_dir.display()
            )));
        }

        let entry = self.manifest.project(old_name)?.ok_or_else(|| {
            Error::invalid_argument(format!("Project '{old_name}' not found in manifest"))
        })?;

        let descriptor_extension = Path::new(entry.file_name())
            .extension()
            .map_or_else(
                || self.options.descriptor_extension.clone(),
                |ext| ext.to_string_lossy().to_string(),
            );

        let (current_directory, target_directory) = match entry.directory() {
            Some(directory) => {
                let renamed = replace_ignore_case(directory, old_name, new_name);
                let current = join_relative(solution_dir, directory);
                let target = (renamed != directory).then(|| join_relative(solution_dir, &renamed));
                (current, target)
            },
            // Projects at the solution root have no directory of their own
            None => (solution_dir.to_path_buf(), None),
        };

        Ok(RenamePlan {
            old_name: old_name.to_string(),
            new_name: new_name.to_string(),
            old_descriptor_name: format!("{old_name}.{descriptor_extension}"),
            new_descriptor_name: format!("{new_name}.{descriptor_extension}"),
            entry,
            current_directory,
            target_directory,
        })
    }

    /// Rename the project's namespaces, directory, descriptor file and
    /// manifest entry.
    ///
    /// Argument and lookup problems are returned as `Err` before anything is
    /// touched. Failures of the steps themselves come back as a result with
    /// `success == false`. An existing target directory or descriptor is a
    /// conflict found before any file is edited.
    pub fn rename_project_with_files(
        &self,
        old_name: &str,
        new_name: &str,
        solution_dir: &Path,
    ) -> Result<TransactionResult> {
        let plan = self.plan(old_name, new_name, solution_dir)?;
        let mut log = TransactionLog::open(self.options.log_file.as_deref());
        let mut result = TransactionResult::new(old_name, new_name);

        log.log(&format!(
            "Starting rename {} -> {} in {}",
            old_name,
            new_name,
            plan.current_directory.display()
        ));

        if let Err(err) = check_targets(&plan) {
            log.log(&format!("Rename refused: {err}"));
            result.fail(&err);
            return Ok(result);
        }

        if plan.current_directory.is_dir() {
            let mut symbols = self.symbols.clone();
            if let Some(ext) = Path::new(&plan.new_descriptor_name).extension() {
                symbols.add_descriptor_extension(&ext.to_string_lossy());
            }
            match symbols.rename_project_symbols(old_name, new_name, &plan.current_directory) {
                Ok(outcome) => {
                    log.log(&format!(
                        "Symbols: {} files scanned, {} types found, {} namespaces and {} descriptors updated",
                        outcome.files_scanned,
                        outcome.classes_found,
                        outcome.namespaces_modified,
                        outcome.descriptors_modified
                    ));
                    result.outcome = outcome;
                },
                Err(err) => {
                    log.log(&format!("Symbol rename failed: {err}"));
                    result.fail(&err);
                    return Ok(result);
                },
            }
        }

        if let Err(err) = self.apply_steps(&plan, &mut result, &mut log) {
            log.log(&format!("Rename failed: {err}"));
            self.rollback(&plan, &mut result, &mut log);
            result.fail(&err);
            return Ok(result);
        }

        result.success = true;
        log.log(&format!("Rename {old_name} -> {new_name} completed"));
        Ok(result)
    }

    fn apply_steps(
        &self,
        plan: &RenamePlan,
        result: &mut TransactionResult,
        log: &mut TransactionLog,
    ) -> Result<()> {
        let mut project_dir = plan.current_directory.clone();

        if let Some(target) = &plan.target_directory {
            if plan.current_directory.is_dir() {
                check_target("directory", &plan.current_directory, target)?;

                log.log(&format!(
                    "Renaming directory {} -> {}",
                    plan.current_directory.display(),
                    target.display()
                ));
                perform_rename(&plan.current_directory, target)?;
                result.old_directory = Some(plan.current_directory.clone());
                result.new_directory = Some(target.clone());
                result.directory_renamed = true;
                project_dir = target.clone();
            }
        }

        let old_descriptor = project_dir.join(&plan.old_descriptor_name);
        let new_descriptor = project_dir.join(&plan.new_descriptor_name);
        if old_descriptor.is_file() && old_descriptor != new_descriptor {
            check_target("descriptor", &old_descriptor, &new_descriptor)?;

            log.log(&format!(
                "Renaming descriptor {} -> {}",
                old_descriptor.display(),
                new_descriptor.display()
            ));
            perform_rename(&old_descriptor, &new_descriptor)?;
            result.old_descriptor = Some(old_descriptor);
            result.new_descriptor = Some(new_descriptor);
            result.descriptor_renamed = true;
        }

        if !self.manifest.rename_project(&plan.old_name, &plan.new_name)? {
            return Err(Error::invalid_state(format!(
                "Manifest entry for '{}' was not updated",
                plan.old_name
            )));
        }
        log.log(&format!(
            "Updated manifest entry {} -> {}",
            plan.old_name, plan.new_name
        ));
        result.manifest_updated = true;

        Ok(())
    }

    /// Undo every recorded step, newest first. Failures are logged and
    /// otherwise ignored.
    fn rollback(&self, plan: &RenamePlan, result: &mut TransactionResult, log: &mut TransactionLog) {
        log.log("Starting rollback due to error");

        if result.manifest_updated {
            result.rolled_back = true;
            if let Err(err) = self.manifest.rename_project(&plan.new_name, &plan.old_name) {
                log.log(&format!("Failed to revert manifest entry: {err}"));
            }
        }

        if result.descriptor_renamed {
            if let (Some(from), Some(to)) = (&result.old_descriptor, &result.new_descriptor) {
                result.rolled_back = true;
                log.log(&format!(
                    "Reverting descriptor rename: {} -> {}",
                    to.display(),
                    from.display()
                ));
                if let Err(err) = perform_rename(to, from) {
                    log.log(&format!("Failed to revert descriptor rename: {err}"));
                }
            }
        }

        if result.directory_renamed {
            if let (Some(from), Some(to)) = (&result.old_directory, &result.new_directory) {
                result.rolled_back = true;
                log.log(&format!(
                    "Reverting directory rename: {} -> {}",
                    to.display(),
                    from.display()
                ));
                if let Err(err) = perform_rename(to, from) {
                    log.log(&format!("Failed to revert directory rename: {err}"));
                }
            }
        }

        log.log("Rollback finished");
    }
}

fn join_relative(base: &Path, relative: &str) -> PathBuf {
    relative
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .fold(base.to_path_buf(), |path, segment| path.join(segment))
}

/// Refuse the rename when the directory or descriptor it would create is
/// already taken by another entry.
fn check_targets(plan: &RenamePlan) -> Result<()> {
    if let Some(target) = &plan.target_directory {
        if plan.current_directory.is_dir() {
            check_target("directory", &plan.current_directory, target)?;
        }
    }

    let old_descriptor = plan.current_directory.join(&plan.old_descriptor_name);
    let new_descriptor = plan.current_directory.join(&plan.new_descriptor_name);
    if old_descriptor.is_file() && old_descriptor != new_descriptor {
        check_target("descriptor", &old_descriptor, &new_descriptor)?;
    }
    Ok(())
}

fn check_target(kind: &str, from: &Path, to: &Path) -> Result<()> {
    if to.exists() && !is_same_entry(from, to) {
        return Err(Error::conflict(format!(
            "Target {kind} already exists: {}",
            to.display()
        )));
    }
    Ok(())
}

/// Whether both paths resolve to the same file system entry, as `Foo` and
/// `FOO` do on a case-insensitive file system.
#[cfg(unix)]
fn is_same_entry(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_same_entry(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn is_case_only_change(from: &Path, to: &Path) -> bool {
    from != to && from.to_string_lossy().to_lowercase() == to.to_string_lossy().to_lowercase()
}

/// Rename a file or directory. Case-only changes go through a temporary
/// name so they also work on case-insensitive file systems. If the second
/// half fails, the entry is moved back to `from`.
fn perform_rename(from: &Path, to: &Path) -> Result<()> {
    let failed = |e: std::io::Error| {
        Error::io(
            format!("Failed to rename {} to {}", from.display(), to.display()),
            e,
        )
    };

    if is_case_only_change(from, to) {
        let temp_name = from.with_extension(format!("{}.reproj.tmp", std::process::id()));
        fs::rename(from, &temp_name).map_err(failed)?;
        if let Err(e) = fs::rename(&temp_name, to) {
            if let Err(restore) = fs::rename(&temp_name, from) {
                return Err(Error::io(
                    format!(
                        "Failed to rename {} to {} and could not restore it from {}",
                        from.display(),
                        to.display(),
                        temp_name.display()
                    ),
                    restore,
                ));
            }
            return Err(failed(e));
        }
    } else {
        fs::rename(from, to).map_err(failed)?;
    }
    Ok(())
}
