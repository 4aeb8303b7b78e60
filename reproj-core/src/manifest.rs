//! Line-preserving model of a solution manifest.
//!
//! The manifest is kept as the exact sequence of lines read from disk. A
//! narrow structured view (`projects()`) is parsed from those lines on every
//! call, and every edit replaces or inserts whole lines matched by that view.
//! Global sections, comments and blank lines pass through untouched.

use crate::error::{require_name, Error, Result};
use crate::pattern::replace_ignore_case;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

pub const PROJECT_KEYWORD: &str = "Project(";
pub const END_PROJECT_KEYWORD: &str = "EndProject";
pub const GLOBAL_MARKER: &str = "Global";
pub const MANIFEST_EXTENSION: &str = "sln";

/// Type tag used for C# projects when none is supplied.
pub const DEFAULT_PROJECT_TYPE: &str = "{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}";

/// `Project("type-tag") = "name", "path", "id"`
static PROJECT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*Project\("([^"]*)"\)\s*=\s*"([^"]*)"\s*,\s*"([^"]*)"\s*,\s*"([^"]*)""#)
        .expect("project line pattern is valid")
});

/// One project record of the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub type_tag: String,
    pub name: String,
    pub relative_path: String,
    pub id: String,
}

impl ProjectEntry {
    /// Directory component of the descriptor path, if it has one.
    pub fn directory(&self) -> Option<&str> {
        self.relative_path
            .rfind(['/', '\\'])
            .map(|idx| &self.relative_path[..idx])
            .filter(|dir| !dir.is_empty())
    }

    /// File name component of the descriptor path.
    pub fn file_name(&self) -> &str {
        self.relative_path
            .rfind(['/', '\\'])
            .map_or(self.relative_path.as_str(), |idx| {
                &self.relative_path[idx + 1..]
            })
    }

    /// Absolute descriptor path below `solution_dir`.
    pub fn descriptor_path(&self, solution_dir: &Path) -> PathBuf {
        self.relative_path
            .split(['/', '\\'])
            .filter(|segment| !segment.is_empty())
            .fold(solution_dir.to_path_buf(), |path, segment| path.join(segment))
    }
}

struct ParsedLine {
    entry: ProjectEntry,
    name: Range<usize>,
    path: Range<usize>,
}

fn parse_project_line(line: &str) -> Option<ParsedLine> {
    if !line.trim_start().starts_with(PROJECT_KEYWORD) {
        return None;
    }
    let caps = PROJECT_LINE.captures(line)?;
    let name = caps.get(2)?;
    let path = caps.get(3)?;
    Some(ParsedLine {
        entry: ProjectEntry {
            type_tag: caps[1].to_string(),
            name: name.as_str().to_string(),
            relative_path: path.as_str().to_string(),
            id: caps[4].to_string(),
        },
        name: name.range(),
        path: path.range(),
    })
}

/// Rebuild `line` with the name and/or path spans replaced.
fn rewrite_line(line: &str, parsed: &ParsedLine, name: Option<&str>, path: Option<&str>) -> String {
    let name = name.unwrap_or(&line[parsed.name.clone()]);
    let path = path.unwrap_or(&line[parsed.path.clone()]);
    format!(
        "{}{}{}{}{}",
        &line[..parsed.name.start],
        name,
        &line[parsed.name.end..parsed.path.start],
        path,
        &line[parsed.path.end..]
    )
}

fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Substitute `old_name` with `new_name` in the directory and file name of a
/// manifest-relative descriptor path.
pub fn renamed_project_path(relative_path: &str, old_name: &str, new_name: &str) -> String {
    match relative_path.rfind(['/', '\\']) {
        Some(idx) => {
            let directory = replace_ignore_case(&relative_path[..idx], old_name, new_name);
            let file_name = replace_ignore_case(&relative_path[idx + 1..], old_name, new_name);
            normalize_separators(&format!("{directory}/{file_name}"))
        },
        None => replace_ignore_case(relative_path, old_name, new_name),
    }
}

/// Generate a fresh braced, upper-case project id.
pub fn new_project_id() -> String {
    format!("{{{}}}", Uuid::new_v4().to_string().to_uppercase())
}

#[derive(Debug)]
struct ManifestState {
    path: Option<PathBuf>,
    lines: Vec<String>,
    line_ending: &'static str,
    trailing_newline: bool,
}

impl Default for ManifestState {
    fn default() -> Self {
        Self {
            path: None,
            lines: Vec::new(),
            line_ending: "\n",
            trailing_newline: true,
        }
    }
}

impl ManifestState {
    fn ensure_loaded(&self) -> Result<&Path> {
        self.path
            .as_deref()
            .ok_or_else(|| Error::invalid_state("No manifest has been loaded"))
    }
}

/// A loaded solution manifest.
///
/// All reads and edits go through one mutex, so a `Manifest` can be shared
/// between threads renaming different projects.
#[derive(Debug, Default)]
pub struct Manifest {
    state: Mutex<ManifestState>,
}

impl Manifest {
    /// An empty, unloaded manifest. Every operation except `load` fails
    /// until a file has been loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and load in one step.
    pub fn open(path: &Path) -> Result<Self> {
        let manifest = Self::new();
        manifest.load(path)?;
        Ok(manifest)
    }

    fn state(&self) -> MutexGuard<'_, ManifestState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn load(&self, path: &Path) -> Result<()> {
        let mut state = self.state();
        if let Some(loaded) = &state.path {
            return Err(Error::invalid_state(format!(
                "Manifest already loaded from {}",
                loaded.display()
            )));
        }
        if !path.is_file() {
            return Err(Error::invalid_argument(format!(
                "Manifest file does not exist: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read manifest {}", path.display()), e))?;

        state.line_ending = if content.contains("\r\n") { "\r\n" } else { "\n" };
        state.trailing_newline = content.ends_with('\n');

        let mut lines: Vec<String> = content
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        if state.trailing_newline || content.is_empty() {
            lines.pop();
        }

        state.lines = lines;
        state.path = Some(path.to_path_buf());
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.state().path.is_some()
    }

    /// Path the manifest was loaded from.
    pub fn path(&self) -> Option<PathBuf> {
        self.state().path.clone()
    }

    /// Snapshot of the current line sequence.
    pub fn lines(&self) -> Result<Vec<String>> {
        let state = self.state();
        state.ensure_loaded()?;
        Ok(state.lines.clone())
    }

    /// Parse every project entry from the current lines, in file order.
    pub fn projects(&self) -> Result<Vec<ProjectEntry>> {
        let state = self.state();
        state.ensure_loaded()?;
        Ok(state
            .lines
            .iter()
            .filter_map(|line| parse_project_line(line))
            .map(|parsed| parsed.entry)
            .collect())
    }

    /// Case-insensitive lookup by project name.
    pub fn project(&self, name: &str) -> Result<Option<ProjectEntry>> {
        Ok(self
            .projects()?
            .into_iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name)))
    }

    /// Rename every entry called `old_name` and recompute its path.
    ///
    /// Returns whether any line changed.
    pub fn rename_project(&self, old_name: &str, new_name: &str) -> Result<bool> {
        let mut state = self.state();
        state.ensure_loaded()?;
        require_name("old project name", old_name)?;
        require_name("new project name", new_name)?;

        let mut changed = false;
        for line in &mut state.lines {
            let Some(parsed) = parse_project_line(line) else {
                continue;
            };
            if !parsed.entry.name.eq_ignore_ascii_case(old_name) {
                continue;
            }

            let new_path = renamed_project_path(&parsed.entry.relative_path, old_name, new_name);
            let rewritten = rewrite_line(line, &parsed, Some(new_name), Some(&new_path));
            if rewritten != *line {
                *line = rewritten;
                changed = true;
            }
        }

        Ok(changed)
    }

    /// Point the first entry whose path equals `old_path` at `new_path`.
    pub fn change_project_path(&self, old_path: &str, new_path: &str) -> Result<bool> {
        let mut state = self.state();
        state.ensure_loaded()?;
        require_name("old project path", old_path)?;
        require_name("new project path", new_path)?;

        let new_path = normalize_separators(new_path);
        for line in &mut state.lines {
            let Some(parsed) = parse_project_line(line) else {
                continue;
            };
            if !parsed.entry.relative_path.eq_ignore_ascii_case(old_path) {
                continue;
            }

            let rewritten = rewrite_line(line, &parsed, None, Some(&new_path));
            let changed = rewritten != *line;
            *line = rewritten;
            return Ok(changed);
        }

        Ok(false)
    }

    /// Append a new project block and return its id.
    ///
    /// The block goes right after the last `EndProject`, or before the
    /// `Global` section when there are no projects yet, or at the end.
    pub fn insert_project(
        &self,
        type_tag: &str,
        name: &str,
        relative_path: &str,
        id: Option<&str>,
    ) -> Result<String> {
        let mut state = self.state();
        state.ensure_loaded()?;
        require_name("project name", name)?;
        require_name("project path", relative_path)?;

        let id = id
            .filter(|id| !id.trim().is_empty())
            .map_or_else(new_project_id, str::to_string);
        let type_tag = if type_tag.trim().is_empty() {
            DEFAULT_PROJECT_TYPE
        } else {
            type_tag
        };

        let block = [
            format!(
                "{PROJECT_KEYWORD}\"{type_tag}\") = \"{name}\", \"{}\", \"{id}\"",
                normalize_separators(relative_path)
            ),
            END_PROJECT_KEYWORD.to_string(),
        ];

        let position = state
            .lines
            .iter()
            .rposition(|line| line.trim() == END_PROJECT_KEYWORD)
            .map(|idx| idx + 1)
            .or_else(|| {
                state
                    .lines
                    .iter()
                    .position(|line| line.trim() == GLOBAL_MARKER)
            })
            .unwrap_or(state.lines.len());

        state.lines.splice(position..position, block);
        Ok(id)
    }

    /// Write the lines to `path`, or back to the loaded path.
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let state = self.state();
        let loaded = state.ensure_loaded()?;
        let target = path.unwrap_or(loaded).to_path_buf();

        let mut content = state.lines.join(state.line_ending);
        if state.trailing_newline && !state.lines.is_empty() {
            content.push_str(state.line_ending);
        }

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                Error::io(format!("Failed to create directory {}", parent.display()), e)
            })?;
        }
        fs::write(&target, content)
            .map_err(|e| Error::io(format!("Failed to save manifest {}", target.display()), e))?;

        Ok(target)
    }

    /// Move the manifest file itself to `new_file_name` in the same
    /// directory.
    pub fn rename_file(&self, new_file_name: &str) -> Result<PathBuf> {
        let mut state = self.state();
        let current = state.ensure_loaded()?.to_path_buf();
        require_name("new manifest name", new_file_name)?;

        let mut file_name = new_file_name.to_string();
        if Path::new(&file_name).extension().is_none() {
            file_name = format!("{file_name}.{MANIFEST_EXTENSION}");
        }
        let target = current
            .parent()
            .map_or_else(|| PathBuf::from(&file_name), |dir| dir.join(&file_name));

        if target.exists() {
            return Err(Error::conflict(format!(
                "Manifest already exists: {}",
                target.display()
            )));
        }

        fs::rename(&current, &target).map_err(|e| {
            Error::io(
                format!(
                    "Failed to rename {} to {}",
                    current.display(),
                    target.display()
                ),
                e,
            )
        })?;
        state.path = Some(target.clone());
        Ok(target)
    }
}

/// Locate the single manifest file directly inside `dir`.
pub fn find_manifest(dir: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(dir)
        .map_err(|e| Error::io(format!("Failed to read directory {}", dir.display()), e))?;

    let mut found: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(MANIFEST_EXTENSION))
        })
        .collect();
    found.sort();

    match found.len() {
        0 => Err(Error::invalid_argument(format!(
            "No .{MANIFEST_EXTENSION} file found in {}",
            dir.display()
        ))),
        1 => Ok(found.remove(0)),
        n => Err(Error::invalid_state(format!(
            "Found {n} .{MANIFEST_EXTENSION} files in {}; pass one explicitly",
            dir.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SLN: &str = r#"
Microsoft Visual Studio Solution File, Format Version 12.00
# Visual Studio Version 17
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "Foo", "Foo\Foo.csproj", "{11111111-1111-1111-1111-111111111111}"
EndProject
Project("{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}") = "Foo.Tests", "tests/Foo.Tests/Foo.Tests.csproj", "{22222222-2222-2222-2222-222222222222}"
	ProjectSection(ProjectDependencies) = postProject
	EndProjectSection
EndProject
Global
	GlobalSection(SolutionConfigurationPlatforms) = preSolution
		Debug|Any CPU = Debug|Any CPU
	EndGlobalSection
EndGlobal
"#;

    fn write_manifest(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("App.sln");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_unloaded_manifest_rejects_operations() {
        let manifest = Manifest::new();
        assert!(!manifest.is_loaded());
        assert!(matches!(manifest.projects(), Err(Error::InvalidState { .. })));
        assert!(matches!(
            manifest.rename_project("A", "B"),
            Err(Error::InvalidState { .. })
        ));
        assert!(matches!(
            manifest.change_project_path("a", "b"),
            Err(Error::InvalidState { .. })
        ));
        assert!(matches!(
            manifest.insert_project("", "A", "A/A.csproj", None),
            Err(Error::InvalidState { .. })
        ));
        assert!(matches!(manifest.save(None), Err(Error::InvalidState { .. })));
    }

    #[test]
    fn test_load_twice_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_manifest(temp_dir.path(), SLN);
        let manifest = Manifest::open(&path).unwrap();
        assert!(matches!(manifest.load(&path), Err(Error::InvalidState { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = Manifest::open(&temp_dir.path().join("Missing.sln"));
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_projects_in_file_order() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = Manifest::open(&write_manifest(temp_dir.path(), SLN)).unwrap();

        let projects = manifest.projects().unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].name, "Foo");
        assert_eq!(projects[0].relative_path, "Foo\\Foo.csproj");
        assert_eq!(projects[0].type_tag, DEFAULT_PROJECT_TYPE);
        assert_eq!(projects[0].id, "{11111111-1111-1111-1111-111111111111}");
        assert_eq!(projects[1].name, "Foo.Tests");
    }

    #[test]
    fn test_project_entry_path_helpers() {
        let entry = ProjectEntry {
            type_tag: String::new(),
            name: "Foo".to_string(),
            relative_path: "src\\Foo\\Foo.csproj".to_string(),
            id: String::new(),
        };
        assert_eq!(entry.directory(), Some("src\\Foo"));
        assert_eq!(entry.file_name(), "Foo.csproj");
        assert_eq!(
            entry.descriptor_path(Path::new("/sln")),
            Path::new("/sln").join("src").join("Foo").join("Foo.csproj")
        );

        let flat = ProjectEntry {
            relative_path: "Foo.csproj".to_string(),
            ..entry
        };
        assert_eq!(flat.directory(), None);
        assert_eq!(flat.file_name(), "Foo.csproj");
    }

    #[test]
    fn test_rename_project_updates_only_matching_line() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = Manifest::open(&write_manifest(temp_dir.path(), SLN)).unwrap();
        let before = manifest.lines().unwrap();

        assert!(manifest.rename_project("foo", "Bar").unwrap());

        let after = manifest.lines().unwrap();
        assert_eq!(before.len(), after.len());
        for (idx, (old, new)) in before.iter().zip(&after).enumerate() {
            if idx == 3 {
                assert_eq!(
                    new,
                    "Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"Bar\", \"Bar/Bar.csproj\", \"{11111111-1111-1111-1111-111111111111}\""
                );
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn test_rename_project_without_match() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = Manifest::open(&write_manifest(temp_dir.path(), SLN)).unwrap();
        assert!(!manifest.rename_project("Missing", "Bar").unwrap());
    }

    #[test]
    fn test_rename_project_reflected_in_projects() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = Manifest::open(&write_manifest(temp_dir.path(), SLN)).unwrap();

        manifest.rename_project("Foo.Tests", "Bar.Tests").unwrap();
        let entry = manifest.project("bar.tests").unwrap().unwrap();
        assert_eq!(entry.relative_path, "tests/Bar.Tests/Bar.Tests.csproj");
        assert!(manifest.project("Foo.Tests").unwrap().is_none());
    }

    #[test]
    fn test_renamed_project_path() {
        assert_eq!(renamed_project_path("Foo\\Foo.csproj", "Foo", "Bar"), "Bar/Bar.csproj");
        assert_eq!(
            renamed_project_path("src/Foo/Foo.csproj", "Foo", "Bar"),
            "src/Bar/Bar.csproj"
        );
        assert_eq!(renamed_project_path("Foo.csproj", "Foo", "Bar"), "Bar.csproj");
    }

    #[test]
    fn test_change_project_path_first_match_only() {
        let temp_dir = TempDir::new().unwrap();
        let content = SLN.replace("tests/Foo.Tests/Foo.Tests.csproj", "Foo\\Foo.csproj");
        let manifest = Manifest::open(&write_manifest(temp_dir.path(), &content)).unwrap();

        assert!(manifest
            .change_project_path("foo\\foo.csproj", "src\\Foo\\Foo.csproj")
            .unwrap());

        let projects = manifest.projects().unwrap();
        assert_eq!(projects[0].relative_path, "src/Foo/Foo.csproj");
        assert_eq!(projects[0].name, "Foo");
        assert_eq!(projects[1].relative_path, "Foo\\Foo.csproj");
    }

    #[test]
    fn test_change_project_path_no_match() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = Manifest::open(&write_manifest(temp_dir.path(), SLN)).unwrap();
        assert!(!manifest.change_project_path("nope.csproj", "x.csproj").unwrap());
    }

    #[test]
    fn test_insert_project_after_last_block() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = Manifest::open(&write_manifest(temp_dir.path(), SLN)).unwrap();

        let id = manifest
            .insert_project("", "Baz", "Baz\\Baz.csproj", Some("{ABC}"))
            .unwrap();
        assert_eq!(id, "{ABC}");

        let lines = manifest.lines().unwrap();
        let global = lines.iter().position(|l| l == "Global").unwrap();
        assert_eq!(lines[global - 1], "EndProject");
        assert_eq!(
            lines[global - 2],
            format!("Project(\"{DEFAULT_PROJECT_TYPE}\") = \"Baz\", \"Baz/Baz.csproj\", \"{{ABC}}\"")
        );
        // The nested EndProjectSection is not a block terminator
        assert_eq!(lines[global - 3], "EndProject");
    }

    #[test]
    fn test_insert_project_before_global_when_empty() {
        let temp_dir = TempDir::new().unwrap();
        let content = "Header\nGlobal\nEndGlobal\n";
        let manifest = Manifest::open(&write_manifest(temp_dir.path(), content)).unwrap();

        let id = manifest.insert_project("{T}", "A", "A/A.csproj", None).unwrap();
        assert!(id.starts_with('{') && id.ends_with('}'));
        assert_eq!(id.len(), 38);

        let lines = manifest.lines().unwrap();
        assert_eq!(lines[0], "Header");
        assert!(lines[1].starts_with("Project(\"{T}\") = \"A\""));
        assert_eq!(lines[2], "EndProject");
        assert_eq!(lines[3], "Global");
    }

    #[test]
    fn test_insert_project_at_end_without_markers() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = Manifest::open(&write_manifest(temp_dir.path(), "Header\n")).unwrap();
        manifest.insert_project("{T}", "A", "A.csproj", None).unwrap();

        let lines = manifest.lines().unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "EndProject");
    }

    #[test]
    fn test_insert_generates_unique_ids() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = Manifest::open(&write_manifest(temp_dir.path(), SLN)).unwrap();
        let first = manifest.insert_project("", "A", "A/A.csproj", None).unwrap();
        let second = manifest.insert_project("", "B", "B/B.csproj", None).unwrap();
        assert_ne!(first, second);
        assert_eq!(manifest.projects().unwrap().len(), 4);
    }

    #[test]
    fn test_save_round_trips_unchanged_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_manifest(temp_dir.path(), SLN);
        let manifest = Manifest::open(&path).unwrap();

        let saved = manifest.save(None).unwrap();
        assert_eq!(saved, path);
        assert_eq!(fs::read_to_string(&path).unwrap(), SLN);
    }

    #[test]
    fn test_save_preserves_crlf() {
        let temp_dir = TempDir::new().unwrap();
        let content = SLN.replace('\n', "\r\n");
        let path = write_manifest(temp_dir.path(), &content);
        let manifest = Manifest::open(&path).unwrap();

        manifest.rename_project("Foo", "Bar").unwrap();
        manifest.save(None).unwrap();

        let saved = fs::read_to_string(&path).unwrap();
        assert!(saved.contains("\"Bar\", \"Bar/Bar.csproj\""));
        assert_eq!(saved.matches("\r\n").count(), content.matches("\r\n").count());
    }

    #[test]
    fn test_save_to_new_path_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = Manifest::open(&write_manifest(temp_dir.path(), SLN)).unwrap();

        let target = temp_dir.path().join("out").join("nested").join("Copy.sln");
        manifest.save(Some(&target)).unwrap();
        assert_eq!(fs::read_to_string(target).unwrap(), SLN);
    }

    #[test]
    fn test_save_failure_is_invalid_state() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = Manifest::open(&write_manifest(temp_dir.path(), SLN)).unwrap();

        // A directory cannot be overwritten with a file
        let target = temp_dir.path().join("taken");
        fs::create_dir_all(&target).unwrap();
        let err = manifest.save(Some(&target)).unwrap_err();
        match err {
            Error::InvalidState { source, .. } => assert!(source.is_some()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rename_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_manifest(temp_dir.path(), SLN);
        let manifest = Manifest::open(&path).unwrap();

        let renamed = manifest.rename_file("Renamed").unwrap();
        assert_eq!(renamed, temp_dir.path().join("Renamed.sln"));
        assert!(!path.exists());
        assert!(renamed.exists());
        assert_eq!(manifest.path(), Some(renamed));
    }

    #[test]
    fn test_rename_file_conflict() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_manifest(temp_dir.path(), SLN);
        fs::write(temp_dir.path().join("Other.sln"), "").unwrap();
        let manifest = Manifest::open(&path).unwrap();

        let result = manifest.rename_file("Other.sln");
        assert!(matches!(result, Err(Error::Conflict(_))));
        assert!(path.exists());
    }

    #[test]
    fn test_find_manifest() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            find_manifest(temp_dir.path()),
            Err(Error::InvalidArgument(_))
        ));

        let path = write_manifest(temp_dir.path(), SLN);
        assert_eq!(find_manifest(temp_dir.path()).unwrap(), path);

        fs::write(temp_dir.path().join("Second.SLN"), "").unwrap();
        assert!(matches!(
            find_manifest(temp_dir.path()),
            Err(Error::InvalidState { .. })
        ));
    }
}
