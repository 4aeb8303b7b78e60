use anyhow::Result;
use reproj_core::{ListResult, OutputFormatter};
use std::path::Path;

use crate::cli::{resolve_output, OutputFormat};
use crate::workspace::Solution;

pub fn handle_list(
    solution: Option<&Path>,
    output: Option<OutputFormat>,
    use_color: bool,
) -> Result<()> {
    let solution = Solution::open(solution)?;
    let result = ListResult {
        manifest: solution.manifest_path.clone(),
        projects: solution.manifest.projects()?,
        use_color,
    };

    print!("{}", result.format(resolve_output(output, &solution.config)));
    Ok(())
}
