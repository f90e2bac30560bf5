//! # revhead core library
//!
//! Answers two questions about a git repository:
//!
//! - does a local branch track a given remote-tracking branch
//!   ([`GitRef::is_tracking_remote`]);
//! - what does a commit's header block look like
//!   ([`CommitDataHeaderRenderer`]).
//!
//! Both are pure functions of their inputs. Repository access lives in
//! [`git::repository`] and is only needed to build those inputs.

pub mod commit;
pub mod config;
pub mod git;
pub mod object_id;
pub mod output;
pub mod render;

// Re-export main types
pub use commit::{CachingRevisionLookup, CommitData, Revision, RevisionLookup, RevisionLookupError};
pub use config::{ConfigDirs, HeaderConfig, HeaderConfigError, get_config_dirs};
pub use git::{ConfigLookup, GitRef, GitRefError, RefKind, find_tracked_remote};
pub use object_id::{ObjectId, ObjectIdParseError};
pub use render::{
  CommitDataHeaderRenderer, DateFormatter, DateLocale, HeaderLabelFormatter, HeaderLabels, HeaderRenderError,
  LabelAlignment, LinkFactory, MonospacedHeaderLabelFormatter, TabbedHeaderLabelFormatter,
};
