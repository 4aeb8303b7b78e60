use crate::error::{Error, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::{Walk, WalkBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Directory names that never contain project sources: build output,
/// version-control and editor metadata, dependency caches, test results.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "bin",
    "obj",
    "out",
    "build",
    ".git",
    ".svn",
    ".hg",
    ".vs",
    ".vscode",
    ".idea",
    "node_modules",
    "packages",
    "TestResults",
];

/// Generated sources that are rewritten by tooling on the next build.
pub const DEFAULT_EXCLUDED_FILES: &[&str] = &[
    "*.designer.cs",
    "*.g.cs",
    "*.g.i.cs",
    "*.AssemblyAttributes.cs",
];

/// Case-insensitive check against the default exclusion vocabulary.
pub fn is_excluded_dir_name(name: &str) -> bool {
    DEFAULT_EXCLUDED_DIRS
        .iter()
        .any(|excluded| excluded.eq_ignore_ascii_case(name))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOptions {
    /// File extension to yield, without the dot. Empty yields every file.
    pub extension: String,
    /// Directory names excluded in addition to the defaults
    pub exclude_dirs: Vec<String>,
    /// File name globs excluded in addition to the defaults
    pub exclude_files: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extension: "cs".to_string(),
            exclude_dirs: vec![],
            exclude_files: vec![],
        }
    }
}

impl ScanOptions {
    pub fn with_extension(extension: &str) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
struct DirExclusions {
    names: HashSet<String>,
}

impl DirExclusions {
    fn new(extra: &[String]) -> Self {
        let names = DEFAULT_EXCLUDED_DIRS
            .iter()
            .map(|s| s.to_ascii_lowercase())
            .chain(extra.iter().map(|s| s.to_ascii_lowercase()))
            .collect();
        Self { names }
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.names.contains(&name.to_ascii_lowercase())
    }

    /// True when any directory segment of `path` below `root` is excluded.
    fn excludes_path(&self, root: &Path, path: &Path) -> bool {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let Some(parent) = relative.parent() else {
            return false;
        };
        parent.components().any(|component| match component {
            Component::Normal(segment) => self.is_excluded(&segment.to_string_lossy()),
            _ => false,
        })
    }
}

/// Lazy iterator over the source files below a root directory.
///
/// The walk is single-pass: once exhausted it yields nothing more.
pub struct SourceFiles {
    walker: Walk,
    root: PathBuf,
    extension: String,
    dirs: Arc<DirExclusions>,
    files: GlobSet,
    debug: bool,
}

impl std::fmt::Debug for SourceFiles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFiles")
            .field("root", &self.root)
            .field("extension", &self.extension)
            .finish_non_exhaustive()
    }
}

impl Iterator for SourceFiles {
    type Item = PathBuf;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    if self.debug {
                        eprintln!("SCANNER: skipping unreadable entry: {err}");
                    }
                    continue;
                },
            };

            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let path = entry.path();

            if self.dirs.excludes_path(&self.root, path) {
                continue;
            }

            if !self.extension.is_empty() {
                let matches_extension = path
                    .extension()
                    .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(&self.extension));
                if !matches_extension {
                    continue;
                }
            }

            if let Some(name) = path.file_name() {
                if self.files.is_match(Path::new(name)) {
                    if self.debug {
                        eprintln!("SCANNER: excluded file {}", path.display());
                    }
                    continue;
                }
            }

            return Some(path.to_path_buf());
        }
    }
}

/// Walk `root` and yield every file matching `options`.
///
/// Relative roots are resolved against the current directory so yielded
/// paths are always absolute.
pub fn scan_files(root: &Path, options: &ScanOptions) -> Result<SourceFiles> {
    let root = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| Error::io("Failed to get current directory", e))?
            .join(root)
    };

    let dirs = Arc::new(DirExclusions::new(&options.exclude_dirs));
    let files = build_file_exclusions(&options.exclude_files)?;

    let filter_dirs = Arc::clone(&dirs);
    let walker = WalkBuilder::new(&root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            // Never prune the root itself, only what lies beneath it
            if entry.depth() == 0 {
                return true;
            }
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            !(is_dir && filter_dirs.is_excluded(&entry.file_name().to_string_lossy()))
        })
        .build();

    Ok(SourceFiles {
        walker,
        root,
        extension: options.extension.trim_start_matches('.').to_string(),
        dirs,
        files,
        debug: std::env::var("REPROJ_DEBUG").is_ok(),
    })
}

fn build_file_exclusions(extra: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in DEFAULT_EXCLUDED_FILES
        .iter()
        .copied()
        .chain(extra.iter().map(String::as_str))
    {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::invalid_argument(format!("Invalid exclude pattern '{pattern}': {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| Error::invalid_argument(format!("Invalid exclude patterns: {e}")))
}
