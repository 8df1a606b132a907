//! Lua staging.
//!
//! The script tree reaches the package through a staging root
//! (`build/windows/bytecode` by default) in one of two ways:
//!
//! - **compile**: every `.lua` file goes through the pinned LuaJIT compiler and
//!   lands at the same relative location (see [`compile`])
//! - **verbatim**: the tree is copied as source, which keeps hotloading and
//!   readable stack traces for packaged debug builds (see [`copy_verbatim`])
//!
//! Staged paths mirror the source tree relative to the project root with the
//! `src` segment dropped, so `src/scripts/core/boot.lua` stages to
//! `scripts/core/boot.lua` in both modes. Either way the pass ends with the
//! exclusion rules, which delete matching staged paths whether or not they
//! compiled.

mod compile;

use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::process::ToolError;
use crate::util::fs::{self as fsutil, FsError};
use crate::variant::{ResolvedConfig, ScriptMode, ScriptRules};

pub use compile::compile;

#[derive(Debug, Error)]
pub enum ScriptError {
  #[error("script root {} does not exist", path.display())]
  MissingRoot { path: PathBuf },

  #[error("failed to compile {}: {source}", path.display())]
  Compile { path: PathBuf, source: ToolError },

  #[error(transparent)]
  Fs(#[from] FsError),
}

/// A path under the staging root that must not ship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRule {
  path: PathBuf,
}

impl ExclusionRule {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// The excluded path under `staging_root`.
  ///
  /// Only normal components are kept, so a rule can never point outside the
  /// staging root. An empty rule yields `None`.
  fn target(&self, staging_root: &Path) -> Option<PathBuf> {
    let relative: PathBuf = self
      .path
      .components()
      .filter_map(|c| match c {
        Component::Normal(part) => Some(part),
        _ => None,
      })
      .collect();

    if relative.as_os_str().is_empty() {
      return None;
    }
    Some(staging_root.join(relative))
  }
}

/// An eligible script found under the script root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFile {
  pub source: PathBuf,
  /// Relative to the script root.
  pub relative: PathBuf,
}

/// Result of one staging pass.
#[derive(Debug, Clone, Default)]
pub struct StagedTree {
  pub root: PathBuf,
  /// Files present after staging, before exclusions were applied.
  pub staged: Vec<PathBuf>,
  /// Paths removed by exclusion rules.
  pub excluded: Vec<PathBuf>,
}

/// Find every file under `script_root` whose extension is exactly `extension`.
///
/// Anything else (other extensions, no extension, `foo.lua.bak`) is skipped.
/// Symlinks are followed, so a linked script is eligible like any other.
pub fn discover(script_root: &Path, extension: &str) -> Result<Vec<ScriptFile>, ScriptError> {
  if !script_root.is_dir() {
    return Err(ScriptError::MissingRoot {
      path: script_root.to_path_buf(),
    });
  }

  let mut files = Vec::new();
  for entry in WalkDir::new(script_root).follow_links(true).sort_by_file_name() {
    let entry = entry.map_err(|source| FsError::Walk {
      path: script_root.to_path_buf(),
      source,
    })?;

    if !entry.file_type().is_file() {
      continue;
    }
    if entry.path().extension().is_none_or(|ext| ext != extension) {
      continue;
    }

    let relative = entry
      .path()
      .strip_prefix(script_root)
      .unwrap_or(entry.path())
      .to_path_buf();
    files.push(ScriptFile {
      source: entry.path().to_path_buf(),
      relative,
    });
  }

  Ok(files)
}

/// Where `dir` lands under the staging root: its path relative to the mirror
/// base with every `strip_segment` (and any `..`) removed.
pub fn mirrored_dir(dir: &Path, rules: &ScriptRules) -> PathBuf {
  let relative = dir.strip_prefix(&rules.mirror_base).unwrap_or(dir);
  relative
    .components()
    .filter_map(|c| match c {
      Component::Normal(part) if part != rules.strip_segment.as_str() => Some(part),
      _ => None,
    })
    .collect()
}

/// Delete every excluded path under `staging_root`.
///
/// Returns the paths that existed and were removed.
pub fn apply_exclusions(staging_root: &Path, exclusions: &[ExclusionRule]) -> Result<Vec<PathBuf>, ScriptError> {
  let mut removed = Vec::new();

  for rule in exclusions {
    let Some(target) = rule.target(staging_root) else {
      warn!(rule = %rule.path().display(), "ignoring empty exclusion rule");
      continue;
    };

    info!(path = %target.display(), "excluding path from bytecode");
    if fsutil::remove_path(&target)? {
      removed.push(target);
    }
  }

  Ok(removed)
}

/// Copy the script tree into the staging root as source.
pub fn copy_verbatim(script_root: &Path, staging_root: &Path, rules: &ScriptRules) -> Result<StagedTree, ScriptError> {
  if !script_root.is_dir() {
    return Err(ScriptError::MissingRoot {
      path: script_root.to_path_buf(),
    });
  }

  fsutil::remove_path(staging_root)?;

  let target = staging_root.join(mirrored_dir(script_root, rules));
  fsutil::create_dir_all(&target)?;

  let mut staged = Vec::new();
  for entry in WalkDir::new(script_root).follow_links(true).sort_by_file_name() {
    let entry = entry.map_err(|source| FsError::Walk {
      path: script_root.to_path_buf(),
      source,
    })?;
    let relative = entry.path().strip_prefix(script_root).unwrap_or(entry.path());
    let dest = target.join(relative);

    if entry.file_type().is_dir() {
      fsutil::create_dir_all(&dest)?;
    } else {
      fsutil::copy_file(entry.path(), &dest)?;
      staged.push(dest);
    }
  }

  let excluded = apply_exclusions(staging_root, &rules.exclusions)?;

  Ok(StagedTree {
    root: staging_root.to_path_buf(),
    staged,
    excluded,
  })
}

/// Stage the scripts for `config`, compiling or copying according to its variant.
pub fn stage(config: &ResolvedConfig) -> Result<StagedTree, ScriptError> {
  let mode = config.scripts.mode;
  info!(
    mode = ?mode,
    from = %config.script_root.display(),
    to = %config.bytecode_root.display(),
    "staging scripts"
  );

  let tree = match mode {
    ScriptMode::Compile => compile(
      &config.script_root,
      &config.bytecode_root,
      &config.scripts,
      &config.toolchain,
    )?,
    ScriptMode::Verbatim => copy_verbatim(&config.script_root, &config.bytecode_root, &config.scripts)?,
  };

  info!(
    staged = tree.staged.len(),
    excluded = tree.excluded.len(),
    "scripts staged"
  );
  Ok(tree)
}
