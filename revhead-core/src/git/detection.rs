//! Repository discovery helpers.

use std::env;
use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::trace;

/// Working directory of the repository enclosing the current directory.
pub fn detect_repository() -> Option<PathBuf> {
  let current_dir = env::current_dir().ok()?;
  detect_repository_from_path(&current_dir)
}

/// Working directory of the repository enclosing `path`, searching upwards.
///
/// Bare repositories have no working directory and yield their git dir
/// instead.
pub fn detect_repository_from_path<P: AsRef<Path>>(path: P) -> Option<PathBuf> {
  let path = path.as_ref();

  match Repository::discover(path) {
    Ok(repo) => {
      let root = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
      trace!(start = %path.display(), root = %root.display(), "Discovered repository");
      Some(root)
    }
    Err(_) => None,
  }
}
