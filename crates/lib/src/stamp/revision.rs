use std::path::Path;

use tracing::debug;

use crate::config::RevisionSettings;
use crate::consts::UNKNOWN_REVISION;
use crate::process::ToolCommand;

/// Something that knows the current source revision.
pub trait RevisionSource {
  /// The current revision, or `None` if it cannot be determined.
  fn current_revision(&self) -> Option<String>;

  /// The current revision, with [`UNKNOWN_REVISION`] standing in when the
  /// source is unavailable. Never fails.
  fn revision_or_unknown(&self) -> String {
    self.current_revision().unwrap_or_else(|| UNKNOWN_REVISION.to_string())
  }
}

/// Asks an external command (`git rev-parse --short HEAD` by default).
#[derive(Debug, Clone)]
pub struct CommandRevision {
  command: ToolCommand,
}

impl CommandRevision {
  pub fn new(settings: &RevisionSettings, project_root: &Path) -> Self {
    Self {
      command: ToolCommand::new(&settings.program)
        .args(settings.args.iter().cloned())
        .cwd(project_root),
    }
  }
}

impl RevisionSource for CommandRevision {
  fn current_revision(&self) -> Option<String> {
    match self.command.output() {
      Ok(rev) if !rev.is_empty() => Some(rev),
      Ok(_) => {
        debug!("revision command printed nothing");
        None
      }
      Err(e) => {
        debug!(error = %e, "revision command unavailable");
        None
      }
    }
  }
}

/// A fixed revision. Useful when the caller already knows the answer.
#[derive(Debug, Clone)]
pub struct FixedRevision(pub Option<String>);

impl RevisionSource for FixedRevision {
  fn current_revision(&self) -> Option<String> {
    self.0.clone()
  }
}
