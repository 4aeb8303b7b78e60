//! Namespace and descriptor rewriting for a single project directory.
//!
//! Type declarations that mention the project's base name are collected into
//! a rename mapping, but only its size is reported: the mapping acts as a
//! signal that the directory really belongs to the project. When it is empty
//! nothing is rewritten at all.

use crate::error::{require_name, Error, Result};
use crate::pattern::{
    base_name, contains_ignore_case, extract_namespaces, extract_type_names, has_segment_prefix,
    replace_ignore_case, NamespaceDecl,
};
use crate::scanner::{scan_files, ScanOptions};
use content_inspector::ContentType;
use regex::{Captures, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Descriptor elements whose value tracks the project name.
pub const DESCRIPTOR_FIELDS: &[&str] = &["AssemblyName", "RootNamespace"];

static DESCRIPTOR_FIELD_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DESCRIPTOR_FIELDS
        .iter()
        .map(|field| {
            RegexBuilder::new(&format!(r"(<{field}\s*>)([^<]*)(</{field}\s*>)"))
                .case_insensitive(true)
                .build()
                .expect("descriptor field pattern is valid")
        })
        .collect()
});

/// Counters produced by one symbol rename pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameOutcome {
    pub files_scanned: usize,
    pub classes_found: usize,
    pub namespaces_modified: usize,
    pub descriptors_modified: usize,
}

impl RenameOutcome {
    pub fn has_changes(&self) -> bool {
        self.namespaces_modified > 0 || self.descriptors_modified > 0
    }
}

#[derive(Debug, Clone)]
pub struct SymbolRenamer {
    scan: ScanOptions,
    descriptor_extensions: Vec<String>,
}

impl Default for SymbolRenamer {
    fn default() -> Self {
        Self::new(ScanOptions::default(), vec!["csproj".to_string()])
    }
}

impl SymbolRenamer {
    pub fn new(scan: ScanOptions, descriptor_extensions: Vec<String>) -> Self {
        Self {
            scan,
            descriptor_extensions: descriptor_extensions
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect(),
        }
    }

    pub fn scan_options(&self) -> &ScanOptions {
        &self.scan
    }

    /// Also treat files with `extension` as project descriptors.
    pub fn add_descriptor_extension(&mut self, extension: &str) {
        let extension = extension.trim_start_matches('.');
        if extension.is_empty() {
            return;
        }
        if !self
            .descriptor_extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
        {
            self.descriptor_extensions.push(extension.to_string());
        }
    }

    /// Rewrite namespaces and descriptor metadata of the project rooted at
    /// `root` from `old_name` to `new_name`.
    pub fn rename_project_symbols(
        &self,
        old_name: &str,
        new_name: &str,
        root: &Path,
    ) -> Result<RenameOutcome> {
        require_name("old project name", old_name)?;
        require_name("new project name", new_name)?;
        if !root.is_dir() {
            return Err(Error::invalid_argument(format!(
                "Project directory does not exist: {}",
                root.display()
            )));
        }

        let files: Vec<PathBuf> = scan_files(root, &self.scan)?.collect();
        let mapping = collect_type_renames(&files, old_name, new_name);

        let mut outcome = RenameOutcome {
            files_scanned: files.len(),
            classes_found: mapping.len(),
            ..RenameOutcome::default()
        };

        if outcome.classes_found == 0 {
            return Ok(outcome);
        }

        for file in &files {
            // Unreadable or unwritable files count as unchanged
            outcome.namespaces_modified +=
                rewrite_namespaces_in_file(file, old_name, new_name).unwrap_or(0);
        }

        for descriptor in self.descriptor_files(root) {
            if update_descriptor_file(&descriptor, old_name, new_name).unwrap_or(false) {
                outcome.descriptors_modified += 1;
            }
        }

        Ok(outcome)
    }

    /// Descriptor files directly inside `root`, sorted by name.
    pub fn descriptor_files(&self, root: &Path) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(root) else {
            return vec![];
        };

        let mut descriptors: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.extension().is_some_and(|ext| {
                    let ext = ext.to_string_lossy();
                    self.descriptor_extensions
                        .iter()
                        .any(|known| known.eq_ignore_ascii_case(&ext))
                })
            })
            .collect();
        descriptors.sort();
        descriptors
    }
}

/// Map every declared type that mentions the old base name to its renamed
/// form. Files that cannot be read contribute nothing.
pub fn collect_type_renames(
    files: &[PathBuf],
    old_name: &str,
    new_name: &str,
) -> BTreeMap<String, String> {
    let old_base = base_name(old_name);
    let new_base = base_name(new_name);
    let mut mapping = BTreeMap::new();

    for file in files {
        let Ok(content) = read_source(file) else {
            continue;
        };
        for type_name in extract_type_names(&content) {
            if contains_ignore_case(&type_name, old_base) {
                let renamed = replace_ignore_case(&type_name, old_base, new_base);
                mapping.insert(type_name, renamed);
            }
        }
    }

    mapping
}

/// Rewrite namespace declarations under `old_name` to live under `new_name`.
///
/// Only the text of the old-name prefix is replaced; whatever follows it is
/// kept byte for byte. Returns the new content and the number of
/// declarations changed. When `new_name` extends `old_name`, declarations
/// already under `new_name` are left alone, so a second pass over rewritten
/// content changes nothing.
pub fn rewrite_namespaces(content: &str, old_name: &str, new_name: &str) -> (String, usize) {
    let new_extends_old = new_name.len() > old_name.len() && has_segment_prefix(new_name, old_name);
    let mut result = String::with_capacity(content.len());
    let mut last = 0;
    let mut changed = 0;

    for decl in extract_namespaces(content) {
        if !has_segment_prefix(&decl.path, old_name)
            || (new_extends_old && has_segment_prefix(&decl.path, new_name))
        {
            continue;
        }

        let prefix_end = raw_prefix_end(content, &decl, old_name.len());
        if content[decl.path_start..prefix_end] == *new_name {
            continue;
        }

        result.push_str(&content[last..decl.path_start]);
        result.push_str(new_name);
        last = prefix_end;
        changed += 1;
    }

    result.push_str(&content[last..]);
    (result, changed)
}

/// Byte offset in `content` where the first `len` non-whitespace bytes of
/// the declaration's path end.
fn raw_prefix_end(content: &str, decl: &NamespaceDecl, len: usize) -> usize {
    let mut seen = 0;
    for (offset, ch) in content[decl.path_start..decl.end].char_indices() {
        if seen == len {
            return decl.path_start + offset;
        }
        if !ch.is_whitespace() {
            seen += ch.len_utf8();
        }
    }
    decl.end
}

/// Apply [`rewrite_namespaces`] to one file, writing only when something
/// changed.
pub fn rewrite_namespaces_in_file(path: &Path, old_name: &str, new_name: &str) -> io::Result<usize> {
    let content = read_source(path)?;
    let (rewritten, changed) = rewrite_namespaces(&content, old_name, new_name);
    if changed > 0 {
        fs::write(path, rewritten)?;
    }
    Ok(changed)
}

/// Update descriptor fields whose whole value equals `old_name`.
///
/// Returns `None` when no field matched.
pub fn rewrite_descriptor(content: &str, old_name: &str, new_name: &str) -> Option<String> {
    let mut current = content.to_string();
    let mut any_changed = false;

    for pattern in DESCRIPTOR_FIELD_PATTERNS.iter() {
        let mut changed = false;
        let replaced = pattern.replace_all(&current, |caps: &Captures| {
            let value = &caps[2];
            let trimmed = value.trim();
            if trimmed.eq_ignore_ascii_case(old_name) && trimmed != new_name {
                changed = true;
                let leading = &value[..value.len() - value.trim_start().len()];
                let trailing = &value[value.trim_end().len()..];
                format!("{}{leading}{new_name}{trailing}{}", &caps[1], &caps[3])
            } else {
                caps[0].to_string()
            }
        });
        if changed {
            current = replaced.into_owned();
            any_changed = true;
        }
    }

    any_changed.then_some(current)
}

pub fn update_descriptor_file(path: &Path, old_name: &str, new_name: &str) -> io::Result<bool> {
    let content = fs::read_to_string(path)?;
    match rewrite_descriptor(&content, old_name, new_name) {
        Some(updated) => {
            fs::write(path, updated)?;
            Ok(true)
        },
        None => Ok(false),
    }
}

fn read_source(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    if matches!(content_inspector::inspect(&bytes), ContentType::BINARY) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} looks like a binary file", path.display()),
        ));
    }
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
