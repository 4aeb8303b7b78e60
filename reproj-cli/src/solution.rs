use anyhow::Result;
use reproj_core::{LockFile, OutputFormatter, SolutionRenameResult};
use std::path::Path;

use crate::cli::{resolve_output, OutputFormat};
use crate::workspace::Solution;

pub fn handle_rename_solution(
    solution: Option<&Path>,
    new_file_name: &str,
    output: Option<OutputFormat>,
) -> Result<()> {
    let solution = Solution::open(solution)?;
    let _lock = LockFile::acquire(&solution.state_dir())?;

    let new_path = solution.manifest.rename_file(new_file_name)?;
    let result = SolutionRenameResult {
        old_path: solution.manifest_path.clone(),
        new_path,
    };

    print!("{}", result.format(resolve_output(output, &solution.config)));
    Ok(())
}
