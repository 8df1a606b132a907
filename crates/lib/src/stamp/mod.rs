//! Revision stamp for the generated build-info header.
//!
//! The native build compiles a tiny header holding the source revision:
//!
//! ```text
//! const char* GIT_HASH = "1a2b3c4";
//! ```
//!
//! Rewriting it on every build would touch its mtime and force a rebuild of
//! everything that includes it, so [`reconcile`] rewrites the file only when
//! the recorded revision differs from the current one. The file is owned
//! entirely by this module: a rewrite replaces all of its content.

mod revision;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::BuildInfoSettings;

pub use revision::{CommandRevision, FixedRevision, RevisionSource};

#[derive(Debug, Error)]
pub enum StampError {
  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: std::io::Error },
}

/// The declaration line's type and symbol, e.g. `const char*` and `GIT_HASH`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
  pub ty: String,
  pub symbol: String,
}

impl Declaration {
  pub fn new(ty: impl Into<String>, symbol: impl Into<String>) -> Self {
    Self {
      ty: ty.into(),
      symbol: symbol.into(),
    }
  }

  pub fn from_settings(settings: &BuildInfoSettings) -> Self {
    Self::new(&settings.declaration_type, &settings.symbol)
  }

  /// The full file content declaring `token`.
  pub fn render(&self, token: &str) -> String {
    format!("{} {} = \"{}\";\n", self.ty, self.symbol, token)
  }

  /// Extract the token from a declaration line, if `line` is one.
  pub fn parse_line(&self, line: &str) -> Option<String> {
    let rest = line.strip_prefix(&self.ty)?;
    let rest = rest.trim_start().strip_prefix(&self.symbol)?;
    if !rest.trim_start().starts_with('=') {
      return None;
    }

    let value = rest.split('=').nth(1)?;
    Some(value.trim().trim_end_matches(';').trim().trim_matches('"').to_string())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StampOutcome {
  /// The header already declared the current revision; nothing was written.
  Unchanged { revision: String },
  /// The header was (re)written.
  Regenerated { previous: Option<String>, revision: String },
}

impl StampOutcome {
  pub fn revision(&self) -> &str {
    match self {
      StampOutcome::Unchanged { revision } | StampOutcome::Regenerated { revision, .. } => revision,
    }
  }
}

/// Read the revision recorded in `path`.
///
/// A missing file, an unreadable file and a file without a declaration line
/// all mean "no prior record".
pub fn read_recorded_revision(path: &Path, declaration: &Declaration) -> Option<String> {
  let content = match fs::read_to_string(path) {
    Ok(content) => content,
    Err(e) => {
      debug!(path = %path.display(), error = %e, "no readable build info");
      return None;
    }
  };

  content.lines().find_map(|line| declaration.parse_line(line))
}

/// Bring the header at `path` in line with the current revision.
///
/// Never fails because the revision is unknown; only a failed write is an error.
pub fn reconcile(
  path: &Path,
  source: &dyn RevisionSource,
  declaration: &Declaration,
) -> Result<StampOutcome, StampError> {
  let current = source.revision_or_unknown();
  info!(revision = %current, "current revision");

  let recorded = read_recorded_revision(path, declaration);
  match &recorded {
    Some(rev) => info!(revision = %rev, path = %path.display(), "recorded revision"),
    None => info!(path = %path.display(), "no recorded revision"),
  }

  if recorded.as_deref() == Some(current.as_str()) {
    info!(path = %path.display(), "revision unchanged, skipping generation");
    return Ok(StampOutcome::Unchanged { revision: current });
  }

  fs::write(path, declaration.render(&current)).map_err(|source| StampError::Write {
    path: path.to_path_buf(),
    source,
  })?;
  info!(path = %path.display(), revision = %current, "build info regenerated");

  Ok(StampOutcome::Regenerated {
    previous: recorded,
    revision: current,
  })
}
