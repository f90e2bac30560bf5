//! Branch references and upstream tracking resolution.
//!
//! A [`GitRef`] is a snapshot of one reference together with a read-only view
//! of the repository configuration it came from. Tracking questions are
//! answered purely from that configuration (`branch.<name>.merge` and
//! `branch.<name>.remote`), so the resolver never touches the object database.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::object_id::ObjectId;

/// Prefix of local branch references.
pub const HEADS_PREFIX: &str = "refs/heads/";
/// Prefix of remote-tracking references.
pub const REMOTES_PREFIX: &str = "refs/remotes/";
/// Prefix of tag references.
pub const TAGS_PREFIX: &str = "refs/tags/";

const TAG_PEEL_SUFFIX: &str = "^{}";

/// Read-only key/value access to repository configuration.
///
/// Implementations must return an empty string for keys that are not set.
pub trait ConfigLookup: fmt::Debug {
  /// Value stored under `key`, or `""` when the key is absent.
  fn value(&self, key: &str) -> String;
}

impl ConfigLookup for BTreeMap<String, String> {
  fn value(&self, key: &str) -> String {
    self.get(key).cloned().unwrap_or_default()
  }
}

impl ConfigLookup for HashMap<String, String> {
  fn value(&self, key: &str) -> String {
    self.get(key).cloned().unwrap_or_default()
  }
}

/// Shared handle to a configuration accessor.
pub type SharedConfig = Arc<dyn ConfigLookup + Send + Sync>;

/// Kind of reference, derived from its complete name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
  /// A local branch under `refs/heads/`.
  Head,
  /// A remote-tracking branch under `refs/remotes/<remote>/`.
  Remote,
  /// A tag under `refs/tags/`.
  Tag,
  /// Anything else (`HEAD`, `refs/stash`, notes, ...).
  Other,
}

/// Errors raised while constructing a [`GitRef`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GitRefError {
  /// The remote name does not prefix the reference path.
  #[error("reference `{complete_name}` does not belong to remote `{remote}`")]
  RemoteMismatch {
    /// Complete reference name that was supplied.
    complete_name: String,
    /// Remote name that was supplied.
    remote: String,
  },
}

/// A branch, tag or other reference pointing at a commit.
#[derive(Clone)]
pub struct GitRef {
  config: SharedConfig,
  target: ObjectId,
  complete_name: String,
  remote: Option<String>,
  name: String,
  kind: RefKind,
}

impl GitRef {
  /// Create a reference from its complete name.
  ///
  /// For remote-tracking references the remote is taken to be the first path
  /// segment after `refs/remotes/`. Use [`GitRef::with_remote`] for remotes
  /// whose names contain `/`.
  pub fn new(config: SharedConfig, target: ObjectId, complete_name: impl Into<String>) -> Self {
    let complete_name = complete_name.into();

    let remote = complete_name
      .strip_prefix(REMOTES_PREFIX)
      .and_then(|rest| rest.split_once('/'))
      .map(|(remote, _)| remote.to_string())
      .filter(|remote| !remote.is_empty());

    Self::build(config, target, complete_name, remote)
  }

  /// Create a remote-tracking reference with an explicit remote name.
  pub fn with_remote(
    config: SharedConfig,
    target: ObjectId,
    complete_name: impl Into<String>,
    remote: impl Into<String>,
  ) -> Result<Self, GitRefError> {
    let complete_name = complete_name.into();
    let remote = remote.into();

    let belongs = !remote.is_empty()
      && complete_name
        .strip_prefix(REMOTES_PREFIX)
        .and_then(|rest| rest.strip_prefix(remote.as_str()))
        .is_some_and(|rest| rest.starts_with('/'));

    if !belongs {
      return Err(GitRefError::RemoteMismatch { complete_name, remote });
    }

    Ok(Self::build(config, target, complete_name, Some(remote)))
  }

  fn build(config: SharedConfig, target: ObjectId, complete_name: String, remote: Option<String>) -> Self {
    let (kind, name) = if let Some(remote) = remote.as_deref() {
      let tail = complete_name
        .strip_prefix(REMOTES_PREFIX)
        .and_then(|rest| rest.strip_prefix(remote))
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or_default();
      (RefKind::Remote, tail.to_string())
    } else if let Some(tail) = complete_name.strip_prefix(HEADS_PREFIX) {
      (RefKind::Head, tail.to_string())
    } else if let Some(tail) = complete_name.strip_prefix(TAGS_PREFIX) {
      let tail = tail.strip_suffix(TAG_PEEL_SUFFIX).unwrap_or(tail);
      (RefKind::Tag, tail.to_string())
    } else {
      (RefKind::Other, complete_name.clone())
    };

    Self {
      config,
      target,
      complete_name,
      remote,
      name,
      kind,
    }
  }

  /// Commit this reference points at.
  pub fn target(&self) -> ObjectId {
    self.target
  }

  /// Full reference path, e.g. `refs/remotes/origin/main`.
  pub fn complete_name(&self) -> &str {
    &self.complete_name
  }

  /// Short display name: the path tail after the recognised prefix.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Remote name for remote-tracking references, `""` otherwise.
  pub fn remote_name(&self) -> &str {
    self.remote.as_deref().unwrap_or_default()
  }

  /// Kind derived from the complete name.
  pub fn kind(&self) -> RefKind {
    self.kind
  }

  /// Whether this is a remote-tracking reference.
  pub fn is_remote(&self) -> bool {
    self.kind == RefKind::Remote
  }

  /// Whether this is a local branch.
  pub fn is_head(&self) -> bool {
    self.kind == RefKind::Head
  }

  /// Whether this is a tag.
  pub fn is_tag(&self) -> bool {
    self.kind == RefKind::Tag
  }

  /// Configured upstream merge branch (`branch.<name>.merge`) without the
  /// `refs/heads/` prefix. Empty when nothing is configured.
  pub fn merge_with(&self) -> String {
    let merge = self.config.value(&self.merge_key());
    merge.strip_prefix(HEADS_PREFIX).map(str::to_string).unwrap_or(merge)
  }

  /// Configured upstream remote (`branch.<name>.remote`). Empty when nothing is
  /// configured.
  pub fn tracking_remote(&self) -> String {
    self.config.value(&self.remote_key())
  }

  /// Whether this local branch is configured to track `candidate`.
  ///
  /// Only a local branch can track something, and only a remote-tracking
  /// reference can be tracked. Every undetermined case answers `false`.
  pub fn is_tracking_remote(&self, candidate: Option<&GitRef>) -> bool {
    let Some(candidate) = candidate else {
      return false;
    };

    if self.is_remote() || !candidate.is_remote() {
      debug!(
        local = %self.complete_name,
        candidate = %candidate.complete_name,
        "Tracking check skipped: wrong reference locality"
      );
      return false;
    }

    let configured_merge = self.config.value(&self.merge_key());
    let configured_remote = self.config.value(&self.remote_key());

    if configured_merge.is_empty() || configured_remote.is_empty() {
      debug!(local = %self.complete_name, "No upstream configured");
      return false;
    }

    let expected_merge = format!("{HEADS_PREFIX}{}", candidate.name());
    let tracking = configured_merge == expected_merge && configured_remote == candidate.remote_name();

    debug!(
      local = %self.complete_name,
      candidate = %candidate.complete_name,
      tracking,
      "Resolved upstream tracking"
    );

    tracking
  }

  fn merge_key(&self) -> String {
    format!("branch.{}.merge", self.name)
  }

  fn remote_key(&self) -> String {
    format!("branch.{}.remote", self.name)
  }
}

impl fmt::Debug for GitRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("GitRef")
      .field("complete_name", &self.complete_name)
      .field("target", &self.target)
      .field("remote", &self.remote)
      .finish_non_exhaustive()
  }
}

impl fmt::Display for GitRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.complete_name)
  }
}

/// First reference in `candidates` that `local` tracks.
pub fn find_tracked_remote<'a, I>(local: &GitRef, candidates: I) -> Option<&'a GitRef>
where
  I: IntoIterator<Item = &'a GitRef>,
{
  candidates
    .into_iter()
    .find(|candidate| local.is_tracking_remote(Some(candidate)))
}
