//! Filesystem helpers.
//!
//! Thin wrappers over `std::fs` that attach the offending path to every error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum FsError {
  #[error("failed to walk {}: {source}", path.display())]
  Walk { path: PathBuf, source: walkdir::Error },

  #[error("failed to read directory {}: {source}", path.display())]
  ReadDir { path: PathBuf, source: io::Error },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },

  #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
  Copy { from: PathBuf, to: PathBuf, source: io::Error },

  #[error("failed to move {} to {}: {source}", from.display(), to.display())]
  Move { from: PathBuf, to: PathBuf, source: io::Error },

  #[error("failed to remove {}: {source}", path.display())]
  Remove { path: PathBuf, source: io::Error },
}

pub fn create_dir_all(path: &Path) -> Result<(), FsError> {
  fs::create_dir_all(path).map_err(|source| FsError::CreateDir {
    path: path.to_path_buf(),
    source,
  })
}

/// Remove a file, symlink or directory tree.
///
/// Returns `false` if nothing existed at `path`. Symlinks are removed, never
/// followed.
pub fn remove_path(path: &Path) -> Result<bool, FsError> {
  let metadata = match fs::symlink_metadata(path) {
    Ok(m) => m,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
    Err(source) => {
      return Err(FsError::Remove {
        path: path.to_path_buf(),
        source,
      });
    }
  };

  let result = if metadata.is_dir() {
    fs::remove_dir_all(path)
  } else {
    fs::remove_file(path)
  };

  result.map_err(|source| FsError::Remove {
    path: path.to_path_buf(),
    source,
  })?;

  Ok(true)
}

/// Make `path` an existing, empty directory.
///
/// Every top-level entry is removed; the directory itself is kept (or created).
pub fn reset_dir(path: &Path) -> Result<usize, FsError> {
  create_dir_all(path)?;

  let entries = fs::read_dir(path).map_err(|source| FsError::ReadDir {
    path: path.to_path_buf(),
    source,
  })?;

  let mut removed = 0;
  for entry in entries {
    let entry = entry.map_err(|source| FsError::ReadDir {
      path: path.to_path_buf(),
      source,
    })?;
    if remove_path(&entry.path())? {
      removed += 1;
    }
  }

  debug!(path = %path.display(), removed, "directory reset");
  Ok(removed)
}

/// Copy a single file, creating the target's parent directory.
pub fn copy_file(from: &Path, to: &Path) -> Result<(), FsError> {
  if let Some(parent) = to.parent() {
    create_dir_all(parent)?;
  }

  fs::copy(from, to).map_err(|source| FsError::Copy {
    from: from.to_path_buf(),
    to: to.to_path_buf(),
    source,
  })?;

  Ok(())
}

/// Move a file. Falls back to copy-and-delete when a rename is refused, as it
/// is across filesystems.
pub fn move_file(from: &Path, to: &Path) -> Result<(), FsError> {
  if fs::rename(from, to).is_ok() {
    return Ok(());
  }

  fs::copy(from, to).map_err(|source| FsError::Move {
    from: from.to_path_buf(),
    to: to.to_path_buf(),
    source,
  })?;
  fs::remove_file(from).map_err(|source| FsError::Move {
    from: from.to_path_buf(),
    to: to.to_path_buf(),
    source,
  })
}

/// Recursively copy the contents of `from` into `to`, merging with anything
/// already there. Symlinks are followed, so the copy holds real files.
///
/// Returns the number of files copied.
pub fn copy_dir_all(from: &Path, to: &Path) -> Result<usize, FsError> {
  let mut copied = 0;

  for entry in WalkDir::new(from).follow_links(true).sort_by_file_name() {
    let entry = entry.map_err(|source| FsError::Walk {
      path: from.to_path_buf(),
      source,
    })?;

    let rel = entry.path().strip_prefix(from).unwrap_or(entry.path());
    let target = to.join(rel);

    if entry.file_type().is_dir() {
      create_dir_all(&target)?;
    } else {
      copy_file(entry.path(), &target)?;
      copied += 1;
    }
  }

  Ok(copied)
}
