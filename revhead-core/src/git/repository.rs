//! `git2` adapters that build the core's inputs from an on-disk repository.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use git2::{BranchType, ErrorCode, Repository, Signature, Sort};
use tracing::{debug, trace};

use super::detection::detect_repository;
use super::refs::{ConfigLookup, GitRef, SharedConfig};
use crate::commit::{CommitData, Revision, RevisionLookup, RevisionLookupError};
use crate::object_id::ObjectId;

/// Open the repository enclosing the current directory.
pub fn get_repository() -> Result<Repository> {
  let repo_path = detect_repository().ok_or_else(|| anyhow!("Not in a Git repository"))?;
  Repository::open(&repo_path).with_context(|| format!("Failed to open Git repository at {}", repo_path.display()))
}

/// Open the repository enclosing `path`.
pub fn get_repository_from_path<P: AsRef<Path>>(path: P) -> Result<Repository> {
  let path = path.as_ref();
  Repository::discover(path).with_context(|| format!("Failed to open Git repository at {}", path.display()))
}

/// In-memory copy of the branch tracking configuration of a repository.
///
/// `git2::Config` cannot be shared between threads, so [`GitRef`]s built from
/// a repository hold this snapshot instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSnapshot {
  entries: BTreeMap<String, String>,
}

impl ConfigSnapshot {
  /// Read `branch.<name>.merge` and `branch.<name>.remote` for every local
  /// branch of `repo`.
  pub fn from_repository(repo: &Repository) -> Result<Self> {
    let config = repo.config().context("Failed to read repository config")?;
    let mut entries = BTreeMap::new();

    for branch in repo.branches(Some(BranchType::Local))? {
      let (branch, _) = branch?;
      let Some(name) = branch.name()? else {
        continue;
      };

      for key in [format!("branch.{name}.merge"), format!("branch.{name}.remote")] {
        match config.get_string(&key) {
          Ok(value) => {
            entries.insert(key, value);
          }
          Err(err) if err.code() == ErrorCode::NotFound => {}
          Err(err) => return Err(err).with_context(|| format!("Failed to read config key {key}")),
        }
      }
    }

    trace!(entries = entries.len(), "Captured branch tracking config");
    Ok(Self { entries })
  }
}

impl ConfigLookup for ConfigSnapshot {
  fn value(&self, key: &str) -> String {
    self.entries.value(key)
  }
}

/// Local and remote-tracking branches of `repo`.
///
/// Symbolic references such as `refs/remotes/origin/HEAD` are skipped.
pub fn list_refs(repo: &Repository) -> Result<Vec<GitRef>> {
  let config: SharedConfig = Arc::new(ConfigSnapshot::from_repository(repo)?);
  let mut refs = Vec::new();

  for branch in repo.branches(None)? {
    let (branch, kind) = branch?;
    let reference = branch.get();
    let (Some(complete_name), Some(target)) = (reference.name(), reference.target()) else {
      continue;
    };

    let git_ref = match kind {
      BranchType::Local => GitRef::new(Arc::clone(&config), target.into(), complete_name),
      BranchType::Remote => match repo.branch_remote_name(complete_name) {
        Ok(remote) => match remote.as_str() {
          Some(remote) => GitRef::with_remote(Arc::clone(&config), target.into(), complete_name, remote)?,
          None => GitRef::new(Arc::clone(&config), target.into(), complete_name),
        },
        Err(err) => {
          debug!(reference = complete_name, error = %err, "Could not resolve remote name");
          GitRef::new(Arc::clone(&config), target.into(), complete_name)
        }
      },
    };

    refs.push(git_ref);
  }

  Ok(refs)
}

/// Resolve `rev` (anything `git rev-parse` accepts) and load its commit data.
pub fn load_commit_data(repo: &Repository, rev: &str) -> Result<CommitData> {
  let commit = repo
    .revparse_single(rev)
    .and_then(|object| object.peel_to_commit())
    .with_context(|| format!("Failed to resolve revision '{rev}'"))?;

  commit_data_from_git2(&commit)
}

/// Convert a `git2` commit. Children are left empty, see [`find_children`].
pub fn commit_data_from_git2(commit: &git2::Commit<'_>) -> Result<CommitData> {
  let author = commit.author();
  let committer = commit.committer();

  Ok(CommitData::new(
    commit.id().into(),
    commit.tree_id().into(),
    commit.parent_ids().map(ObjectId::from).collect(),
    signature_text(&author),
    signature_time(&author).with_context(|| format!("Commit {} has an invalid author date", commit.id()))?,
    signature_text(&committer),
    signature_time(&committer).with_context(|| format!("Commit {} has an invalid commit date", commit.id()))?,
    String::from_utf8_lossy(commit.message_bytes()),
  ))
}

fn signature_text(signature: &Signature<'_>) -> String {
  let name = String::from_utf8_lossy(signature.name_bytes());
  let email = String::from_utf8_lossy(signature.email_bytes());
  format!("{name} <{email}>")
}

fn signature_time(signature: &Signature<'_>) -> Result<DateTime<FixedOffset>> {
  let when = signature.when();
  let offset = FixedOffset::east_opt(when.offset_minutes() * 60).unwrap_or_else(|| Utc.fix());
  let utc = DateTime::from_timestamp(when.seconds(), 0).ok_or_else(|| anyhow!("timestamp out of range"))?;
  Ok(utc.with_timezone(&offset))
}

/// Commits reachable from any local or remote branch that list `id` as a
/// parent, newest first.
pub fn find_children(repo: &Repository, id: &ObjectId) -> Result<Vec<ObjectId>> {
  let target = git2::Oid::from(*id);

  let mut walk = repo.revwalk()?;
  walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
  walk.push_glob("refs/heads")?;
  walk.push_glob("refs/remotes")?;
  walk.hide(target).with_context(|| format!("Unknown commit {id}"))?;

  let mut children = Vec::new();
  for oid in walk {
    let oid = oid?;
    let commit = repo.find_commit(oid)?;
    if commit.parent_ids().any(|parent| parent == target) {
      children.push(ObjectId::from(oid));
    }
  }

  debug!(%id, count = children.len(), "Found child commits");
  Ok(children)
}

/// [`RevisionLookup`] backed by a repository's object database.
#[derive(Clone, Copy)]
pub struct GitRevisionProvider<'r> {
  repo: &'r Repository,
}

impl<'r> GitRevisionProvider<'r> {
  /// Lookup over `repo`.
  pub fn new(repo: &'r Repository) -> Self {
    Self { repo }
  }
}

impl RevisionLookup for GitRevisionProvider<'_> {
  fn revision(&self, id: &ObjectId, short_format: bool) -> Result<Revision, RevisionLookupError> {
    let commit = self.repo.find_commit((*id).into()).map_err(|err| {
      if err.code() == ErrorCode::NotFound {
        RevisionLookupError::NotFound(*id)
      } else {
        RevisionLookupError::Git(err)
      }
    })?;

    let subject = commit
      .summary_bytes()
      .map(|subject| String::from_utf8_lossy(subject).into_owned())
      .unwrap_or_default();
    let body = (!short_format).then(|| String::from_utf8_lossy(commit.message_bytes()).into_owned());

    Ok(Revision { id: *id, subject, body })
  }
}

#[cfg(test)]
mod tests {
  use revhead_test_utils::git::{GitRepoTestGuard, add_remote_branch, create_branch, create_commit, set_upstream};

  use super::*;

  fn head_branch(repo: &Repository) -> String {
    repo.head().unwrap().shorthand().unwrap().to_string()
  }

  #[test]
  fn loads_commit_data_for_head() {
    let guard = GitRepoTestGuard::new();
    let first = create_commit(&guard.repo, "a.txt", "a\n", "first commit").unwrap();
    let second = create_commit(&guard.repo, "b.txt", "b\n", "second commit\n\nwith a body").unwrap();

    let data = load_commit_data(&guard.repo, "HEAD").unwrap();

    assert_eq!(data.id, ObjectId::from(second));
    assert_eq!(data.parent_ids, vec![ObjectId::from(first)]);
    assert!(data.child_ids.is_empty());
    assert_eq!(data.author, "Test User <test@example.com>");
    assert_eq!(data.subject(), "second commit");
    assert!(data.author_date <= Utc::now().fixed_offset());
  }

  #[test]
  fn unknown_revision_is_an_error() {
    let guard = GitRepoTestGuard::new();
    create_commit(&guard.repo, "a.txt", "a\n", "first commit").unwrap();

    assert!(load_commit_data(&guard.repo, "does-not-exist").is_err());
  }

  #[test]
  fn finds_children_across_branches() {
    let guard = GitRepoTestGuard::new();
    let repo = &guard.repo;
    let base = create_commit(repo, "base.txt", "base\n", "base").unwrap();
    let main = head_branch(repo);

    create_branch(repo, "feature", None).unwrap();
    let on_main = create_commit(repo, "main.txt", "main\n", "main work").unwrap();

    revhead_test_utils::git::checkout_branch(repo, "feature").unwrap();
    let on_feature = create_commit(repo, "feature.txt", "feature\n", "feature work").unwrap();
    revhead_test_utils::git::checkout_branch(repo, &main).unwrap();

    let mut children = find_children(repo, &base.into()).unwrap();
    children.sort();
    let mut expected = vec![ObjectId::from(on_main), ObjectId::from(on_feature)];
    expected.sort();

    assert_eq!(children, expected);
    assert!(find_children(repo, &on_main.into()).unwrap().is_empty());
  }

  #[test]
  fn revision_provider_honours_short_format() {
    let guard = GitRepoTestGuard::new();
    let oid = create_commit(&guard.repo, "a.txt", "a\n", "subject line\n\nbody text").unwrap();
    let provider = GitRevisionProvider::new(&guard.repo);

    let short = provider.revision(&oid.into(), true).unwrap();
    assert_eq!(short.subject, "subject line");
    assert!(short.body.is_none());

    let full = provider.revision(&oid.into(), false).unwrap();
    assert_eq!(full.body.as_deref(), Some("subject line\n\nbody text"));
  }

  #[test]
  fn revision_provider_reports_missing_commits() {
    let guard = GitRepoTestGuard::new();
    create_commit(&guard.repo, "a.txt", "a\n", "first").unwrap();
    let missing = ObjectId::random();

    let err = GitRevisionProvider::new(&guard.repo).revision(&missing, true).unwrap_err();
    assert!(matches!(err, RevisionLookupError::NotFound(id) if id == missing));
  }

  #[test]
  fn snapshot_captures_tracking_config() {
    let guard = GitRepoTestGuard::new();
    let repo = &guard.repo;
    create_commit(repo, "a.txt", "a\n", "first").unwrap();
    create_branch(repo, "feature", None).unwrap();
    set_upstream(repo, "feature", "origin", "feature").unwrap();

    let snapshot = ConfigSnapshot::from_repository(repo).unwrap();

    assert_eq!(snapshot.value("branch.feature.merge"), "refs/heads/feature");
    assert_eq!(snapshot.value("branch.feature.remote"), "origin");
    assert_eq!(snapshot.value("branch.other.merge"), "");
  }

  #[test]
  fn listed_refs_resolve_tracking() {
    let guard = GitRepoTestGuard::new();
    let repo = &guard.repo;
    let tip = create_commit(repo, "a.txt", "a\n", "first").unwrap();
    create_branch(repo, "feature", None).unwrap();
    add_remote_branch(repo, "origin", "feature", tip).unwrap();
    add_remote_branch(repo, "origin", "other", tip).unwrap();
    set_upstream(repo, "feature", "origin", "feature").unwrap();

    let refs = list_refs(repo).unwrap();
    let feature = refs.iter().find(|r| r.complete_name() == "refs/heads/feature").unwrap();
    let remote_feature = refs
      .iter()
      .find(|r| r.complete_name() == "refs/remotes/origin/feature")
      .unwrap();
    let remote_other = refs
      .iter()
      .find(|r| r.complete_name() == "refs/remotes/origin/other")
      .unwrap();

    assert_eq!(remote_feature.remote_name(), "origin");
    assert_eq!(remote_feature.target(), ObjectId::from(tip));
    assert!(feature.is_tracking_remote(Some(remote_feature)));
    assert!(!feature.is_tracking_remote(Some(remote_other)));
    assert!(!remote_feature.is_tracking_remote(Some(remote_feature)));
  }
}
