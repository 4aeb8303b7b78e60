use crate::manifest::ProjectEntry;
use crate::transaction::{RenamePlan, TransactionResult};
use comfy_table::{Cell, Color, ContentArrangement, Table};
use nu_ansi_term::Color as AnsiColor;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Write;
use std::path::PathBuf;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Summary,
    Json,
}

impl OutputFormat {
    /// Parse the `output` config value; anything unknown falls back to summary.
    pub fn from_config(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Summary
        }
    }
}

/// Trait for formatting output in different formats
pub trait OutputFormatter {
    fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => self.format_json(),
            OutputFormat::Summary => self.format_summary(),
        }
    }
    fn format_json(&self) -> String;
    fn format_summary(&self) -> String;
}

fn marker(ok: bool, use_color: bool) -> String {
    match (ok, use_color) {
        (true, true) => AnsiColor::Green.paint("✓").to_string(),
        (false, true) => AnsiColor::Red.paint("✗").to_string(),
        (true, false) => "✓".to_string(),
        (false, false) => "✗".to_string(),
    }
}

/// Result of a list operation
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResult {
    pub manifest: PathBuf,
    pub projects: Vec<ProjectEntry>,
    #[serde(skip)]
    pub use_color: bool,
}

impl OutputFormatter for ListResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "list",
            "manifest": self.manifest,
            "projects": self.projects,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        if self.projects.is_empty() {
            return format!("No projects in {}\n", self.manifest.display());
        }
        let mut output = render_project_table(&self.projects, self.use_color);
        output.push('\n');
        let _ = writeln!(output, "{} project(s) in {}", self.projects.len(), self.manifest.display());
        output
    }
}

/// Render manifest entries as a table
pub fn render_project_table(projects: &[ProjectEntry], use_color: bool) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if use_color {
        table.enforce_styling();
        table.set_header(vec![
            Cell::new("Name").fg(Color::Cyan),
            Cell::new("Path").fg(Color::Cyan),
            Cell::new("Id").fg(Color::Cyan),
        ]);
    } else {
        table.set_header(vec!["Name", "Path", "Id"]);
    }

    for project in projects {
        if use_color {
            table.add_row(vec![
                Cell::new(&project.name).fg(Color::Green),
                Cell::new(&project.relative_path),
                Cell::new(&project.id).fg(Color::DarkGrey),
            ]);
        } else {
            table.add_row(vec![&project.name, &project.relative_path, &project.id]);
        }
    }

    table.to_string()
}

/// Result of a full rename, plus what the front-end did around it
#[derive(Debug, Serialize, Deserialize)]
pub struct RenameReport {
    #[serde(flatten)]
    pub result: TransactionResult,
    pub manifest_saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<PathBuf>,
    #[serde(skip)]
    pub use_color: bool,
}

impl OutputFormatter for RenameReport {
    fn format_json(&self) -> String {
        let result = &self.result;
        serde_json::to_string(&json!({
            "success": result.success,
            "operation": "rename",
            "old_name": result.old_name,
            "new_name": result.new_name,
            "steps": {
                "directory_renamed": result.directory_renamed,
                "descriptor_renamed": result.descriptor_renamed,
                "manifest_updated": result.manifest_updated,
                "manifest_saved": self.manifest_saved,
                "rolled_back": result.rolled_back,
            },
            "summary": result.outcome,
            "old_directory": result.old_directory,
            "new_directory": result.new_directory,
            "old_descriptor": result.old_descriptor,
            "new_descriptor": result.new_descriptor,
            "backup": self.backup,
            "error": result.error,
            "error_kind": result.error_kind,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let result = &self.result;
        let mut output = String::new();

        if result.success {
            let _ = writeln!(
                output,
                "{} Renamed project {} -> {}",
                marker(true, self.use_color),
                result.old_name,
                result.new_name
            );
        } else {
            let _ = writeln!(
                output,
                "{} Rename {} -> {} failed: {}",
                marker(false, self.use_color),
                result.old_name,
                result.new_name,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }

        let outcome = &result.outcome;
        if outcome.classes_found > 0 {
            let _ = writeln!(
                output,
                "  Namespaces: {} rewritten across {} files ({} types found)",
                outcome.namespaces_modified, outcome.files_scanned, outcome.classes_found
            );
        }
        if outcome.descriptors_modified > 0 {
            let _ = writeln!(output, "  Descriptors updated: {}", outcome.descriptors_modified);
        }
        if result.directory_renamed {
            if let (Some(from), Some(to)) = (&result.old_directory, &result.new_directory) {
                let _ = writeln!(output, "  Directory: {} -> {}", from.display(), to.display());
            }
        }
        if result.descriptor_renamed {
            if let (Some(from), Some(to)) = (&result.old_descriptor, &result.new_descriptor) {
                let _ = writeln!(output, "  Descriptor: {} -> {}", from.display(), to.display());
            }
        }
        if result.manifest_updated {
            output.push_str("  Manifest entry updated\n");
        }
        if self.manifest_saved {
            output.push_str("  Manifest saved\n");
        }
        if result.rolled_back {
            output.push_str("  File moves were rolled back\n");
        }
        if let Some(backup) = &self.backup {
            let _ = writeln!(output, "  Backup: {}", backup.display());
        }

        output
    }
}

/// What a rename would do, without doing it
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanReport {
    pub plan: RenamePlan,
}

impl OutputFormatter for PlanReport {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "rename",
            "dry_run": true,
            "plan": self.plan,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let plan = &self.plan;
        let mut output = format!("Rename plan: {} -> {}\n", plan.old_name, plan.new_name);
        match &plan.target_directory {
            Some(target) => {
                let _ = writeln!(
                    output,
                    "  Directory: {} -> {}",
                    plan.current_directory.display(),
                    target.display()
                );
            },
            None => {
                let _ = writeln!(output, "  Directory: {} (unchanged)", plan.current_directory.display());
            },
        }
        let _ = writeln!(
            output,
            "  Descriptor: {} -> {}",
            plan.old_descriptor_name, plan.new_descriptor_name
        );
        let _ = writeln!(output, "  Manifest entry: {}", plan.entry.relative_path);
        output.push_str("Dry run: nothing was changed\n");
        output
    }
}

/// Result of a manifest-only edit (rename-entry, set-path, add)
#[derive(Debug, Serialize, Deserialize)]
pub struct EntryEditResult {
    pub operation: String,
    pub changed: bool,
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub manifest: PathBuf,
}

impl OutputFormatter for EntryEditResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": self.operation,
            "changed": self.changed,
            "from": self.from,
            "to": self.to,
            "id": self.id,
            "manifest": self.manifest,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        if !self.changed {
            return format!("No entry matched '{}'; manifest unchanged\n", self.from);
        }
        let mut output = match &self.id {
            Some(id) => format!("Added project {} ({}) at {}\n", self.from, id, self.to),
            None => format!("Updated entry {} -> {}\n", self.from, self.to),
        };
        let _ = writeln!(output, "Saved {}", self.manifest.display());
        output
    }
}

/// Result of moving the manifest file itself
#[derive(Debug, Serialize, Deserialize)]
pub struct SolutionRenameResult {
    pub old_path: PathBuf,
    pub new_path: PathBuf,
}

impl OutputFormatter for SolutionRenameResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "rename-solution",
            "old_path": self.old_path,
            "new_path": self.new_path,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        format!(
            "Renamed solution {} -> {}\n",
            self.old_path.display(),
            self.new_path.display()
        )
    }
}

/// Result of a version command
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResult {
    pub name: String,
    pub version: String,
}

impl OutputFormatter for VersionResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&self).unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        format!("{} {}", self.name, self.version)
    }
}
