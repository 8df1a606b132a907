//! External tool invocation.
//!
//! The native toolchain, the bytecode compiler, `git` and `cloc` are all opaque
//! subprocesses. They run synchronously; a hung tool hangs the caller.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ToolError {
  #[error("failed to start {program}: {source}")]
  Spawn { program: String, source: io::Error },

  #[error("{program} failed with exit code {code:?}")]
  Failed { program: String, code: Option<i32> },
}

/// A fully resolved command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
  pub program: PathBuf,
  pub args: Vec<String>,
  pub cwd: Option<PathBuf>,
}

impl ToolCommand {
  pub fn new(program: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
    }
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
    self.cwd = Some(dir.into());
    self
  }

  fn program_name(&self) -> String {
    self.program.display().to_string()
  }

  fn build(&self) -> Command {
    let mut command = Command::new(&self.program);
    command.args(&self.args);
    if let Some(cwd) = &self.cwd {
      command.current_dir(cwd);
    }
    command
  }

  /// Run with inherited stdio so the tool's own diagnostics reach the user
  /// unchanged. Fails on a non-zero exit.
  pub fn run(&self) -> Result<(), ToolError> {
    debug!(program = %self.program.display(), args = ?self.args, cwd = ?self.cwd, "spawning process");

    let status = self.build().status().map_err(|source| ToolError::Spawn {
      program: self.program_name(),
      source,
    })?;

    if !status.success() {
      return Err(ToolError::Failed {
        program: self.program_name(),
        code: status.code(),
      });
    }

    Ok(())
  }

  /// Run and capture stdout, trimmed. Stderr is logged, not surfaced.
  pub fn output(&self) -> Result<String, ToolError> {
    debug!(program = %self.program.display(), args = ?self.args, cwd = ?self.cwd, "spawning process");

    let output = self
      .build()
      .stdin(Stdio::null())
      .output()
      .map_err(|source| ToolError::Spawn {
        program: self.program_name(),
        source,
      })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if !stderr.is_empty() {
        debug!(stderr = %stderr.trim(), "command stderr");
      }
      return Err(ToolError::Failed {
        program: self.program_name(),
        code: output.status.code(),
      });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }
}

/// Substitute `{name}` placeholders in an argument template.
///
/// Unknown placeholders are left untouched so tool-specific braces survive.
pub fn expand_args(template: &[String], vars: &BTreeMap<&str, &OsStr>) -> Vec<String> {
  template
    .iter()
    .map(|arg| {
      vars.iter().fold(arg.clone(), |acc, (name, value)| {
        acc.replace(&format!("{{{}}}", name), &value.to_string_lossy())
      })
    })
    .collect()
}

/// Shorthand for building the placeholder map from paths.
pub fn path_vars<'a>(pairs: &[(&'a str, &'a Path)]) -> BTreeMap<&'a str, &'a OsStr> {
  pairs.iter().map(|(name, path)| (*name, path.as_os_str())).collect()
}
