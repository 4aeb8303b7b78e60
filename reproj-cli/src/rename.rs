use anyhow::{anyhow, Context, Result};
use reproj_core::{
    LockFile, OutputFormatter, PlanReport, ProjectEntry, ProjectRenamer, RenameReport,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::backup::backup_directory;
use crate::cli::{resolve_output, OutputFormat};
use crate::workspace::Solution;

pub struct RenameArgs {
    pub old: Option<String>,
    pub new: Option<String>,
    pub dry_run: bool,
    pub backup: bool,
    pub output: Option<OutputFormat>,
}

/// Run a full rename. Returns whether the transaction succeeded.
pub fn handle_rename(
    solution: Option<&Path>,
    args: RenameArgs,
    auto_approve: bool,
    use_color: bool,
) -> Result<bool> {
    let solution = Solution::open(solution)?;
    let format = resolve_output(args.output, &solution.config);
    let projects = solution.manifest.projects()?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let old = match args.old {
        Some(old) => old,
        None => prompt_for_old_name(&mut input, &projects)?,
    };
    let new = match args.new {
        Some(new) => new,
        None => prompt_line(&mut input, &format!("New name for {old}: "))?,
    };

    let renamer = ProjectRenamer::new(
        &solution.manifest,
        solution.config.symbol_renamer(),
        solution.config.transaction_options(&solution.dir),
    );
    let plan = renamer.plan(&old, &new, &solution.dir)?;

    if args.dry_run {
        print!("{}", PlanReport { plan }.format(format));
        return Ok(true);
    }

    if !auto_approve && !confirm(&mut input, &format!("Rename project {old} -> {new}?"))? {
        eprintln!("Aborted");
        return Ok(true);
    }
    drop(input);

    let _lock = LockFile::acquire(&solution.state_dir())?;

    let backup = if args.backup || solution.config.defaults.backup {
        backup_project(&solution, &old, &plan.current_directory, plan.target_directory.is_some())?
    } else {
        None
    };

    let result = renamer.rename_project_with_files(&old, &new, &solution.dir)?;
    let mut manifest_saved = false;
    if result.success {
        solution
            .manifest
            .save(None)
            .with_context(|| format!("Failed to save {}", solution.manifest_path.display()))?;
        manifest_saved = true;
    }

    let success = result.success;
    let report = RenameReport {
        result,
        manifest_saved,
        backup,
        use_color,
    };
    print!("{}", report.format(format));
    Ok(success)
}

fn backup_project(
    solution: &Solution,
    name: &str,
    project_dir: &Path,
    has_own_directory: bool,
) -> Result<Option<PathBuf>> {
    if !has_own_directory || !project_dir.is_dir() {
        eprintln!("Skipping backup: {name} has no project directory of its own");
        return Ok(None);
    }

    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let dest = solution
        .state_dir()
        .join("backups")
        .join(format!("{name}-{stamp}"));
    let copied = backup_directory(project_dir, &dest)?;
    eprintln!("Backed up {copied} files to {}", dest.display());
    Ok(Some(dest))
}

/// Show the projects and read a name or list number.
fn prompt_for_old_name<R: BufRead>(input: &mut R, projects: &[ProjectEntry]) -> Result<String> {
    if projects.is_empty() {
        return Err(anyhow!("The solution has no projects to rename"));
    }

    eprintln!("Projects:");
    for (i, project) in projects.iter().enumerate() {
        eprintln!("  {}. {}", i + 1, project.name);
    }
    let answer = prompt_line(input, "Project to rename (name or number): ")?;

    if let Ok(index) = answer.parse::<usize>() {
        return projects
            .get(index.wrapping_sub(1))
            .map(|project| project.name.clone())
            .ok_or_else(|| anyhow!("No project number {index}"));
    }
    Ok(answer)
}

fn prompt_line<R: BufRead>(input: &mut R, prompt: &str) -> Result<String> {
    eprint!("{prompt}");
    io::stderr().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(anyhow!("No input given"));
    }
    let answer = line.trim();
    if answer.is_empty() {
        return Err(anyhow!("No input given"));
    }
    Ok(answer.to_string())
}

fn confirm<R: BufRead>(input: &mut R, question: &str) -> Result<bool> {
    eprint!("{question} [y/N] ");
    io::stderr().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}
