//! Implementation of `luapack --stamp`.
//!
//! Regenerates the build-info header only when the source revision moved, so
//! the native build is not forced to recompile everything that includes it.

use std::path::Path;

use anyhow::{Context, Result};

use luapack_lib::config::Settings;
use luapack_lib::stamp::{CommandRevision, Declaration, StampOutcome, reconcile};

use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success};

pub fn cmd_stamp(root: &Path, settings: &Settings, output: OutputFormat) -> Result<()> {
  let path = root.join(&settings.build_info.path);
  let source = CommandRevision::new(&settings.revision, root);
  let declaration = Declaration::from_settings(&settings.build_info);

  let outcome = reconcile(&path, &source, &declaration).context("Failed to update build info")?;

  if output.is_json() {
    return print_json(&outcome);
  }

  match &outcome {
    StampOutcome::Unchanged { revision } => {
      print_info(&format!("Build info already at {}, skipping generation", revision));
    }
    StampOutcome::Regenerated { previous, revision } => {
      print_success(&format!("Updated build info with revision {}", revision));
      print_stat("Previous", previous.as_deref().unwrap_or("none"));
    }
  }
  print_stat("File", &path.display().to_string());

  Ok(())
}
