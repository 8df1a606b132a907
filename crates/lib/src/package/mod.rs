//! Packaging pipeline.
//!
//! One run, strictly in order, each step finished on disk before the next:
//!
//! 1. native build (`msbuild <solution> /p:Configuration=<variant>`)
//! 2. stop here for the development environment
//! 3. stage scripts (compiled or verbatim, see [`crate::scripts`])
//! 4. reset the destination folder
//! 5. copy the executable, the staged scripts, the asset tree and the
//!    platform files, plus the C runtime when requested
//!
//! The first failure ends the run. Nothing in the destination is touched until
//! the native build and script staging have both succeeded.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::consts::ASSET_DEST_DIR;
use crate::process::ToolError;
use crate::scripts::{self, ScriptError};
use crate::util::fs::{self as fsutil, FsError};
use crate::variant::{BuildVariant, DestinationKind, ResolvedConfig};

#[derive(Debug, Error)]
pub enum PackageError {
  #[error("native build failed: {0}")]
  NativeBuild(#[source] ToolError),

  #[error(transparent)]
  Scripts(#[from] ScriptError),

  #[error(transparent)]
  Fs(#[from] FsError),
}

/// Summary of a packaged run.
#[derive(Debug, Clone, Serialize)]
pub struct PackageReport {
  pub variant: BuildVariant,
  pub destination: PathBuf,
  pub destination_kind: DestinationKind,
  pub overridden: bool,
  /// Entries removed from the destination by the reset.
  pub cleared: usize,
  pub scripts_staged: usize,
  pub scripts_excluded: usize,
  pub assets_copied: usize,
  /// Single files placed at the destination root (executable, platform and
  /// runtime files).
  pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
  /// Only the native build ran.
  BuiltOnly { variant: BuildVariant },
  Packaged(PackageReport),
}

/// Run the whole pipeline for `config`.
pub fn run(config: &ResolvedConfig) -> Result<Outcome, PackageError> {
  build_native(config)?;

  let destination = match (&config.destination.kind, &config.destination.folder) {
    (DestinationKind::DevelopmentEnvironment, _) | (_, None) => {
      info!(variant = %config.variant, "development build, skipping packaging");
      return Ok(Outcome::BuiltOnly {
        variant: config.variant,
      });
    }
    (_, Some(folder)) => folder.clone(),
  };

  let staged = scripts::stage(config)?;

  info!(path = %destination.display(), kind = %config.destination.kind, "preparing destination");
  let cleared = fsutil::reset_dir(&destination)?;

  let mut files = Vec::new();
  files.push(copy_into(&config.executable_path, &destination)?);

  fsutil::copy_dir_all(&staged.root, &destination)?;
  debug!(from = %staged.root.display(), "scripts copied");

  let asset_dest = destination.join(ASSET_DEST_DIR);
  let assets_copied = fsutil::copy_dir_all(&config.assets.root, &asset_dest)?;
  debug!(count = assets_copied, "assets copied");

  // Shipped on every packaged build, not only platform builds, so there is a
  // single configuration to maintain.
  for file in &config.platform_files {
    files.push(copy_into(file, &destination)?);
  }

  if config.bundle_runtime {
    for file in &config.runtime_files {
      files.push(copy_into(file, &destination)?);
    }
  }

  info!(
    variant = %config.variant,
    path = %destination.display(),
    "finished building"
  );

  Ok(Outcome::Packaged(PackageReport {
    variant: config.variant,
    destination,
    destination_kind: config.destination.kind,
    overridden: config.destination.overridden,
    cleared,
    scripts_staged: staged.staged.len(),
    scripts_excluded: staged.excluded.len(),
    assets_copied,
    files,
  }))
}

/// Invoke the native toolchain for the configured variant.
pub fn build_native(config: &ResolvedConfig) -> Result<(), PackageError> {
  info!(
    configuration = config.variant.configuration(),
    build_file = %config.build_file.display(),
    "building executable"
  );
  config.toolchain.native_build.run().map_err(PackageError::NativeBuild)
}

/// Copy `file` to `dir/<file name>`, returning the new path.
fn copy_into(file: &Path, dir: &Path) -> Result<PathBuf, FsError> {
  let target = match file.file_name() {
    Some(name) => dir.join(name),
    None => dir.to_path_buf(),
  };
  fsutil::copy_file(file, &target)?;
  debug!(from = %file.display(), to = %target.display(), "copied");
  Ok(target)
}
