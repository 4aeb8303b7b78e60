use anyhow::{anyhow, Context, Result};
use reproj_core::is_excluded_dir_name;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Copy `src` to `dest` recursively, skipping build output and tool
/// directories. Returns the number of files copied.
pub fn backup_directory(src: &Path, dest: &Path) -> Result<usize> {
    if !src.is_dir() {
        return Err(anyhow!("Cannot back up {}: not a directory", src.display()));
    }
    if dest.exists() {
        return Err(anyhow!("Backup destination already exists: {}", dest.display()));
    }

    fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create backup directory {}", dest.display()))?;

    let mut copied = 0;
    let walker = WalkDir::new(src)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !(entry.file_type().is_dir()
                    && is_excluded_dir_name(&entry.file_name().to_string_lossy()))
        });

    for entry in walker {
        let entry = entry.context("Failed to walk project directory")?;
        let relative = entry.path().strip_prefix(src)?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}
