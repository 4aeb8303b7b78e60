//! Manifest-only edits: nothing on disk moves except the manifest itself.

use anyhow::{Context, Result};
use reproj_core::{EntryEditResult, LockFile, OutputFormatter};
use std::path::Path;

use crate::cli::{resolve_output, OutputFormat};
use crate::workspace::Solution;

pub fn handle_rename_entry(
    solution: Option<&Path>,
    old: &str,
    new: &str,
    output: Option<OutputFormat>,
) -> Result<()> {
    let solution = Solution::open(solution)?;
    let _lock = LockFile::acquire(&solution.state_dir())?;

    let changed = solution.manifest.rename_project(old, new)?;
    finish(&solution, "rename-entry", changed, old, new, None, output)
}

pub fn handle_set_path(
    solution: Option<&Path>,
    old_path: &str,
    new_path: &str,
    output: Option<OutputFormat>,
) -> Result<()> {
    let solution = Solution::open(solution)?;
    let _lock = LockFile::acquire(&solution.state_dir())?;

    let changed = solution.manifest.change_project_path(old_path, new_path)?;
    finish(&solution, "set-path", changed, old_path, new_path, None, output)
}

pub fn handle_add(
    solution: Option<&Path>,
    name: &str,
    path: &str,
    type_tag: Option<&str>,
    id: Option<&str>,
    output: Option<OutputFormat>,
) -> Result<()> {
    let solution = Solution::open(solution)?;
    let _lock = LockFile::acquire(&solution.state_dir())?;

    let id = solution
        .manifest
        .insert_project(type_tag.unwrap_or_default(), name, path, id)?;
    finish(&solution, "add", true, name, path, Some(id), output)
}

fn finish(
    solution: &Solution,
    operation: &str,
    changed: bool,
    from: &str,
    to: &str,
    id: Option<String>,
    output: Option<OutputFormat>,
) -> Result<()> {
    if changed {
        solution
            .manifest
            .save(None)
            .with_context(|| format!("Failed to save {}", solution.manifest_path.display()))?;
    }

    let result = EntryEditResult {
        operation: operation.to_string(),
        changed,
        from: from.to_string(),
        to: to.to_string(),
        id,
        manifest: solution.manifest_path.clone(),
    };
    print!("{}", result.format(resolve_output(output, &solution.config)));
    Ok(())
}
