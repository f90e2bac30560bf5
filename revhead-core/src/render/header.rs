//! Commit header block renderer.
//!
//! Produces the summary shown above a commit message:
//!
//! ```text
//! Author:      John Doe <john@example.com>
//! Author date: 3 days ago (Monday, October 12, 2026 12:00:00 PM)
//! Committer:   Jane Doe <jane@example.com>
//! Commit date: 2 days ago (Tuesday, October 13, 2026 12:00:00 PM)
//! Commit hash: 1f3d6a0b9c2e4f5a6b7c8d9e0f1a2b3c4d5e6f70
//! Children:    3b6ce324 Child1
//!              2a8788ff Child2
//! Parents:     5c0ffee5 Parent1
//! ```
//!
//! The label column is computed once per pass from the labels that actually
//! appear, so dropping the children block can move every value.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};
use unicode_width::UnicodeWidthStr;

use super::date::DateFormatter;
use super::labels::{HeaderLabelFormatter, LabelAlignment, html_encode};
use super::links::LinkFactory;
use crate::commit::{CommitData, RevisionLookup, RevisionLookupError};
use crate::object_id::ObjectId;

/// Field labels shown in the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderLabels {
  /// Label for the author line
  pub author: String,
  /// Label for the author date line
  pub author_date: String,
  /// Label for the committer line
  pub committer: String,
  /// Label for the commit date line
  pub commit_date: String,
  /// Label for the commit id line
  pub commit_hash: String,
  /// Label for the list of child commits
  pub children: String,
  /// Label for the list of parent commits
  pub parents: String,
}

impl Default for HeaderLabels {
  fn default() -> Self {
    Self {
      author: "Author".to_string(),
      author_date: "Author date".to_string(),
      committer: "Committer".to_string(),
      commit_date: "Commit date".to_string(),
      commit_hash: "Commit hash".to_string(),
      children: "Children".to_string(),
      parents: "Parents".to_string(),
    }
  }
}

/// Errors raised while rendering a header.
#[derive(Debug, Error)]
pub enum HeaderRenderError {
  /// A related commit could not be resolved.
  #[error("failed to resolve revision {id}")]
  Lookup {
    /// Id that failed to resolve.
    id: ObjectId,
    /// Underlying lookup failure.
    #[source]
    source: RevisionLookupError,
  },
}

/// Renders [`CommitData`] as an aligned header block.
#[derive(Debug, Clone, Default)]
pub struct CommitDataHeaderRenderer<F = LabelAlignment> {
  formatter: F,
  dates: DateFormatter,
  links: LinkFactory,
  labels: HeaderLabels,
}

impl<F: HeaderLabelFormatter> CommitDataHeaderRenderer<F> {
  /// Create a renderer with the default English labels.
  pub fn new(formatter: F, dates: DateFormatter, links: LinkFactory) -> Self {
    Self {
      formatter,
      dates,
      links,
      labels: HeaderLabels::default(),
    }
  }

  /// Replace the field labels.
  pub fn with_labels(mut self, labels: HeaderLabels) -> Self {
    self.labels = labels;
    self
  }

  /// Labels in use.
  pub fn labels(&self) -> &HeaderLabels {
    &self.labels
  }

  /// Render the full header.
  ///
  /// Author and committer are always mail links. `include_links` controls
  /// whether child and parent ids become commit links. Every related id is
  /// resolved through `lookup` for its subject; the first failure aborts the
  /// render.
  pub fn render<L>(&self, commit: &CommitData, include_links: bool, lookup: &L) -> Result<String, HeaderRenderError>
  where
    L: RevisionLookup + ?Sized,
  {
    let labels = &self.labels;

    let mut present = vec![
      labels.author.as_str(),
      labels.author_date.as_str(),
      labels.committer.as_str(),
      labels.commit_date.as_str(),
      labels.commit_hash.as_str(),
    ];
    if !commit.child_ids.is_empty() {
      present.push(labels.children.as_str());
    }
    if !commit.parent_ids.is_empty() {
      present.push(labels.parents.as_str());
    }
    let width = self.column_width(&present, true);

    let mut lines = vec![
      format!(
        "{}{}",
        self.formatter.format_label(&labels.author, width, true),
        self.links.signature_link(&commit.author)
      ),
      format!(
        "{}{}",
        self.formatter.format_label(&labels.author_date, width, true),
        self.dates.format_date(&commit.author_date)
      ),
      format!(
        "{}{}",
        self.formatter.format_label(&labels.committer, width, true),
        self.links.signature_link(&commit.committer)
      ),
      format!(
        "{}{}",
        self.formatter.format_label(&labels.commit_date, width, true),
        self.dates.format_date(&commit.commit_date)
      ),
      format!(
        "{}{}",
        self.formatter.format_label(&labels.commit_hash, width, true),
        commit.id
      ),
    ];

    self.push_related(&mut lines, &labels.children, &commit.child_ids, width, include_links, lookup)?;
    self.push_related(&mut lines, &labels.parents, &commit.parent_ids, width, include_links, lookup)?;

    Ok(lines.join("\n"))
  }

  /// Render the five fixed lines without any markup or related commits.
  pub fn render_plain(&self, commit: &CommitData) -> String {
    let labels = &self.labels;
    let width = self.column_width(
      &[
        labels.author.as_str(),
        labels.author_date.as_str(),
        labels.committer.as_str(),
        labels.commit_date.as_str(),
        labels.commit_hash.as_str(),
      ],
      false,
    );

    [
      format!(
        "{}{}",
        self.formatter.format_label_plain(&labels.author, width),
        commit.author
      ),
      format!(
        "{}{}",
        self.formatter.format_label_plain(&labels.author_date, width),
        self.dates.format_date(&commit.author_date)
      ),
      format!(
        "{}{}",
        self.formatter.format_label_plain(&labels.committer, width),
        commit.committer
      ),
      format!(
        "{}{}",
        self.formatter.format_label_plain(&labels.commit_date, width),
        self.dates.format_date(&commit.commit_date)
      ),
      format!(
        "{}{}",
        self.formatter.format_label_plain(&labels.commit_hash, width),
        commit.id
      ),
    ]
    .join("\n")
  }

  /// Column for `labels` as they will be emitted: entity-encoded when
  /// `encoded`, verbatim otherwise.
  fn column_width(&self, labels: &[&str], encoded: bool) -> usize {
    let longest = labels
      .iter()
      .map(|label| if encoded { html_encode(label).width() } else { label.width() })
      .max()
      .unwrap_or_default();
    let width = self.formatter.column_width(longest);
    trace!(longest, width, "Computed header label column");
    width
  }

  fn push_related<L>(
    &self,
    lines: &mut Vec<String>,
    label: &str,
    ids: &[ObjectId],
    width: usize,
    include_links: bool,
    lookup: &L,
  ) -> Result<(), HeaderRenderError>
  where
    L: RevisionLookup + ?Sized,
  {
    for (index, id) in ids.iter().enumerate() {
      let prefix = if index == 0 {
        self.formatter.format_label(label, width, true)
      } else {
        self.formatter.format_label("", width, false)
      };

      debug!(%id, "Resolving related revision");
      let revision = lookup
        .revision(id, true)
        .map_err(|source| HeaderRenderError::Lookup { id: *id, source })?;

      let short = id.to_short_string();
      let id_text = if include_links {
        self.links.commit_link(id, &short)
      } else {
        short
      };

      lines.push(format!("{prefix}{id_text} {}", revision.subject));
    }

    Ok(())
  }
}
