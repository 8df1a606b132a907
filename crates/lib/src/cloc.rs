//! Source line-count report via `cloc`.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::config::ClocSettings;
use crate::process::{ToolCommand, ToolError};

#[derive(Debug, Error)]
pub enum ClocError {
  #[error("line count of {target} failed: {source}")]
  Tool { target: String, source: ToolError },
}

/// One `cloc` invocation per configured target, relative to the project root.
pub fn commands(project_root: &Path, settings: &ClocSettings) -> Vec<ToolCommand> {
  // cloc wants forward slashes in its patterns, even on Windows.
  let not_match_d = settings.exclude_dirs.join("|").replace('\\', "/");
  let not_match_f = settings.exclude_files.join("|").replace('\\', "/");

  settings
    .targets
    .iter()
    .map(|target| {
      let mut args = vec!["--fullpath".to_string()];
      if !not_match_d.is_empty() {
        args.push(format!("--not-match-d={}", not_match_d));
      }
      if !not_match_f.is_empty() {
        args.push(format!("--not-match-f={}", not_match_f));
      }
      args.push(project_root.join(target).display().to_string());

      ToolCommand::new(&settings.program).args(args).cwd(project_root)
    })
    .collect()
}

/// Run the report. Output goes straight to the terminal.
pub fn report(project_root: &Path, settings: &ClocSettings) -> Result<(), ClocError> {
  for (target, command) in settings.targets.iter().zip(commands(project_root, settings)) {
    info!(target = %target.display(), "counting lines");
    command.run().map_err(|source| ClocError::Tool {
      target: target.display().to_string(),
      source,
    })?;
  }
  Ok(())
}
