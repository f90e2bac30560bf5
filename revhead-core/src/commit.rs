//! Commit metadata consumed by the header renderer, and the revision lookup
//! seam used to resolve related commits.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, FixedOffset};
use thiserror::Error;
use tracing::trace;

use crate::object_id::ObjectId;

/// Parsed commit record.
///
/// Parent order is significant (first parent first). Child ids are kept in the
/// order they were supplied; an empty list means no children are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitData {
  /// Id of the commit itself.
  pub id: ObjectId,
  /// Id of the commit's root tree.
  pub tree_id: ObjectId,
  /// Parent ids in parent order.
  pub parent_ids: Vec<ObjectId>,
  /// Child ids, if any were computed by the caller.
  pub child_ids: Vec<ObjectId>,
  /// Author as `Name <email>`.
  pub author: String,
  /// Authoring timestamp.
  pub author_date: DateTime<FixedOffset>,
  /// Committer as `Name <email>`.
  pub committer: String,
  /// Commit timestamp.
  pub commit_date: DateTime<FixedOffset>,
  /// Raw message body.
  pub body: String,
}

impl CommitData {
  /// Create a commit record without children.
  #[allow(clippy::too_many_arguments)]
  pub fn new(
    id: ObjectId,
    tree_id: ObjectId,
    parent_ids: Vec<ObjectId>,
    author: impl Into<String>,
    author_date: DateTime<FixedOffset>,
    committer: impl Into<String>,
    commit_date: DateTime<FixedOffset>,
    body: impl Into<String>,
  ) -> Self {
    Self {
      id,
      tree_id,
      parent_ids,
      child_ids: Vec::new(),
      author: author.into(),
      author_date,
      committer: committer.into(),
      commit_date,
      body: body.into(),
    }
  }

  /// Attach child ids.
  pub fn with_children(mut self, child_ids: Vec<ObjectId>) -> Self {
    self.child_ids = child_ids;
    self
  }

  /// First line of the message body.
  pub fn subject(&self) -> &str {
    self.body.trim_start().lines().next().unwrap_or_default()
  }
}

/// A commit as returned by a [`RevisionLookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
  /// Id of the commit.
  pub id: ObjectId,
  /// One-line subject.
  pub subject: String,
  /// Full message body. `None` when the revision was loaded in short format.
  pub body: Option<String>,
}

impl Revision {
  /// Revision carrying only a subject.
  pub fn new(id: ObjectId, subject: impl Into<String>) -> Self {
    Self {
      id,
      subject: subject.into(),
      body: None,
    }
  }
}

/// Failure to resolve a revision.
#[derive(Debug, Error)]
pub enum RevisionLookupError {
  /// No commit with this id is known.
  #[error("revision {0} not found")]
  NotFound(ObjectId),
  /// The repository backend failed.
  #[error(transparent)]
  Git(#[from] git2::Error),
  /// Any other collaborator-specific failure.
  #[error("{0}")]
  Other(String),
}

/// Resolves commit ids to revisions.
///
/// The header renderer calls this once per related commit, in display order.
/// Memoisation is up to the implementation, see [`CachingRevisionLookup`].
pub trait RevisionLookup {
  /// Load the revision for `id`. `short_format` asks for the subject only.
  fn revision(&self, id: &ObjectId, short_format: bool) -> Result<Revision, RevisionLookupError>;
}

impl<L: RevisionLookup + ?Sized> RevisionLookup for &L {
  fn revision(&self, id: &ObjectId, short_format: bool) -> Result<Revision, RevisionLookupError> {
    (**self).revision(id, short_format)
  }
}

impl RevisionLookup for HashMap<ObjectId, Revision> {
  fn revision(&self, id: &ObjectId, _short_format: bool) -> Result<Revision, RevisionLookupError> {
    self.get(id).cloned().ok_or(RevisionLookupError::NotFound(*id))
  }
}

/// Memoising wrapper around another lookup.
///
/// Successful results are cached per `(id, short_format)`; failures are not.
#[derive(Debug)]
pub struct CachingRevisionLookup<L> {
  inner: L,
  cache: Mutex<HashMap<(ObjectId, bool), Revision>>,
}

impl<L: RevisionLookup> CachingRevisionLookup<L> {
  /// Wrap `inner` with an empty cache.
  pub fn new(inner: L) -> Self {
    Self {
      inner,
      cache: Mutex::new(HashMap::new()),
    }
  }

  /// Unwrap the inner lookup, dropping the cache.
  pub fn into_inner(self) -> L {
    self.inner
  }
}

impl<L: RevisionLookup> RevisionLookup for CachingRevisionLookup<L> {
  fn revision(&self, id: &ObjectId, short_format: bool) -> Result<Revision, RevisionLookupError> {
    let key = (*id, short_format);

    if let Ok(cache) = self.cache.lock()
      && let Some(revision) = cache.get(&key)
    {
      trace!(%id, "Revision cache hit");
      return Ok(revision.clone());
    }

    let revision = self.inner.revision(id, short_format)?;
    if let Ok(mut cache) = self.cache.lock() {
      cache.insert(key, revision.clone());
    }

    Ok(revision)
  }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use chrono::TimeZone;

  use super::*;

  struct CountingLookup {
    calls: Cell<usize>,
  }

  impl RevisionLookup for CountingLookup {
    fn revision(&self, id: &ObjectId, _short_format: bool) -> Result<Revision, RevisionLookupError> {
      self.calls.set(self.calls.get() + 1);
      Ok(Revision::new(*id, format!("subject {}", id.to_short_string())))
    }
  }

  #[test]
  fn caching_lookup_calls_inner_once_per_id() {
    let lookup = CachingRevisionLookup::new(CountingLookup { calls: Cell::new(0) });
    let first = ObjectId::random();
    let second = ObjectId::random();

    lookup.revision(&first, true).unwrap();
    lookup.revision(&first, true).unwrap();
    lookup.revision(&second, true).unwrap();

    assert_eq!(lookup.into_inner().calls.get(), 2);
  }

  #[test]
  fn map_lookup_reports_missing_ids() {
    let lookup: HashMap<ObjectId, Revision> = HashMap::new();
    let id = ObjectId::random();

    let err = lookup.revision(&id, true).unwrap_err();
    assert!(matches!(err, RevisionLookupError::NotFound(missing) if missing == id));
  }

  #[test]
  fn subject_is_first_non_blank_line() {
    let date = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let commit = CommitData::new(
      ObjectId::random(),
      ObjectId::random(),
      Vec::new(),
      "A <a@example.com>",
      date,
      "A <a@example.com>",
      date,
      "\tI made a really neat change.\n\nNotes (p4notes):\n\tP4@547123",
    );

    assert_eq!(commit.subject(), "I made a really neat change.");
  }
}
