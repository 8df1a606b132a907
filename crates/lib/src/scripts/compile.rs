use std::path::Path;

use tracing::debug;

use super::{ScriptError, StagedTree, apply_exclusions, discover, mirrored_dir};
use crate::consts::COMPILE_WORK_DIR;
use crate::util::fs as fsutil;
use crate::variant::{ScriptRules, Toolchain};

/// Compile every eligible script under `script_root` into `staging_root`.
///
/// The staging root is wiped first so nothing from a previous run survives.
/// Each file is compiled into a transient work directory and then moved to its
/// mirrored location, named `<stem>.<compiled_extension>`. A compiler failure
/// aborts the whole pass: a syntax error must stop packaging, never drop a
/// file silently.
///
/// Exclusions run once every file has compiled, and override compiled output.
pub fn compile(
  script_root: &Path,
  staging_root: &Path,
  rules: &ScriptRules,
  toolchain: &Toolchain,
) -> Result<StagedTree, ScriptError> {
  let files = discover(script_root, &rules.extension)?;

  fsutil::remove_path(staging_root)?;
  let work_dir = staging_root.join(COMPILE_WORK_DIR);
  fsutil::create_dir_all(&work_dir)?;

  let mut staged = Vec::with_capacity(files.len());
  for file in &files {
    let parent = file.source.parent().unwrap_or(script_root);
    let dest_dir = staging_root.join(mirrored_dir(parent, rules));
    fsutil::create_dir_all(&dest_dir)?;

    let stem = file.source.file_stem().unwrap_or_default().to_string_lossy();
    let file_name = format!("{}.{}", stem, rules.compiled_extension);
    let transient = work_dir.join(&file_name);

    toolchain
      .compile_command(&file.source, &transient)
      .run()
      .map_err(|source| ScriptError::Compile {
        path: file.source.clone(),
        source,
      })?;

    let dest = dest_dir.join(&file_name);
    fsutil::move_file(&transient, &dest)?;
    debug!(script = %file.relative.display(), out = %dest.display(), "compiled");
    staged.push(dest);
  }

  fsutil::remove_path(&work_dir)?;

  let excluded = apply_exclusions(staging_root, &rules.exclusions)?;

  Ok(StagedTree {
    root: staging_root.to_path_buf(),
    staged,
    excluded,
  })
}
