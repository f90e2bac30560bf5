//! Git repository fixtures for testing
//!
//! Creates temporary repositories and fills them with just enough history for
//! ref and commit tests.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use git2::{BranchType, Oid, Repository, Signature};
use tempfile::TempDir;

/// Name and email used for every fixture commit.
pub const TEST_USER_NAME: &str = "Test User";
pub const TEST_USER_EMAIL: &str = "test@example.com";

/// A temporary git repository with a configured test identity. The directory
/// is removed when the guard is dropped.
pub struct GitRepoTestGuard {
  /// The temporary directory containing the git repository
  pub temp_dir: TempDir,
  /// The git repository
  pub repo: Repository,
}

impl GitRepoTestGuard {
  /// Create a new test repository
  pub fn new() -> Self {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let repo = Repository::init(temp_dir.path()).expect("Failed to initialize git repository");

    let mut config = repo.config().expect("Failed to get repository config");
    config
      .set_str("user.name", TEST_USER_NAME)
      .expect("Failed to set user.name");
    config
      .set_str("user.email", TEST_USER_EMAIL)
      .expect("Failed to set user.email");

    assert!(
      temp_dir.path().join(".git").exists(),
      "Git repository was not properly initialized"
    );

    Self { temp_dir, repo }
  }

  /// Path to the repository's working directory
  pub fn path(&self) -> &Path {
    self.temp_dir.path()
  }
}

impl Default for GitRepoTestGuard {
  fn default() -> Self {
    Self::new()
  }
}

/// Write `file_name`, stage it and commit on top of HEAD. Returns the new
/// commit id.
pub fn create_commit(repo: &Repository, file_name: &str, content: &str, message: &str) -> Result<Oid> {
  let workdir = repo.workdir().ok_or_else(|| anyhow!("Repository has no working directory"))?;
  fs::write(workdir.join(file_name), content)?;

  let mut index = repo.index()?;
  index.add_path(Path::new(file_name))?;
  index.write()?;

  let tree_id = index.write_tree()?;
  let tree = repo.find_tree(tree_id)?;
  let signature = Signature::now(TEST_USER_NAME, TEST_USER_EMAIL)?;

  let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
  let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

  let oid = repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
  Ok(oid)
}

/// Create a local branch at `start_point` (a local branch name) or at HEAD
pub fn create_branch(repo: &Repository, branch_name: &str, start_point: Option<&str>) -> Result<()> {
  let head = if let Some(start) = start_point {
    repo
      .find_branch(start, BranchType::Local)?
      .into_reference()
      .peel_to_commit()?
  } else {
    repo.head()?.peel_to_commit()?
  };

  repo.branch(branch_name, &head, false)?;
  Ok(())
}

/// Check out a local branch, updating the index and working directory
pub fn checkout_branch(repo: &Repository, branch_name: &str) -> Result<()> {
  let obj = repo
    .revparse_single(&format!("refs/heads/{branch_name}"))?
    .peel_to_commit()?;

  repo.checkout_tree(&obj.into_object(), Some(git2::build::CheckoutBuilder::new().force()))?;
  repo.set_head(&format!("refs/heads/{branch_name}"))?;

  Ok(())
}

/// Create `refs/remotes/<remote>/<branch>` at `target`, registering the remote
/// first if needed
pub fn add_remote_branch(repo: &Repository, remote: &str, branch: &str, target: Oid) -> Result<()> {
  if repo.find_remote(remote).is_err() {
    repo
      .remote(remote, &format!("https://example.com/{remote}.git"))
      .with_context(|| format!("Failed to add remote {remote}"))?;
  }

  repo.reference(
    &format!("refs/remotes/{remote}/{branch}"),
    target,
    true,
    "revhead test fixture",
  )?;
  Ok(())
}

/// Configure `local` to track `<remote>/<merge_branch>`
pub fn set_upstream(repo: &Repository, local: &str, remote: &str, merge_branch: &str) -> Result<()> {
  let mut config = repo.config()?;
  config.set_str(&format!("branch.{local}.remote"), remote)?;
  config.set_str(&format!("branch.{local}.merge"), &format!("refs/heads/{merge_branch}"))?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_creates_git_repo() {
    let git_repo = GitRepoTestGuard::new();
    assert!(git_repo.path().join(".git").exists());
  }

  #[test]
  fn commits_chain_onto_head() {
    let git_repo = GitRepoTestGuard::new();
    let first = create_commit(&git_repo.repo, "a.txt", "a", "first").unwrap();
    let second = create_commit(&git_repo.repo, "b.txt", "b", "second").unwrap();

    let commit = git_repo.repo.find_commit(second).unwrap();
    assert_eq!(commit.parent_ids().collect::<Vec<_>>(), vec![first]);
  }

  #[test]
  fn upstream_is_written_to_config() {
    let git_repo = GitRepoTestGuard::new();
    create_commit(&git_repo.repo, "a.txt", "a", "first").unwrap();
    create_branch(&git_repo.repo, "feature", None).unwrap();
    set_upstream(&git_repo.repo, "feature", "origin", "feature").unwrap();

    let config = git_repo.repo.config().unwrap();
    assert_eq!(config.get_string("branch.feature.remote").unwrap(), "origin");
    assert_eq!(
      config.get_string("branch.feature.merge").unwrap(),
      "refs/heads/feature"
    );
  }

  #[test]
  fn remote_branch_is_created() {
    let git_repo = GitRepoTestGuard::new();
    let tip = create_commit(&git_repo.repo, "a.txt", "a", "first").unwrap();
    add_remote_branch(&git_repo.repo, "origin", "main", tip).unwrap();

    let reference = git_repo.repo.find_reference("refs/remotes/origin/main").unwrap();
    assert_eq!(reference.target(), Some(tip));
  }
}
