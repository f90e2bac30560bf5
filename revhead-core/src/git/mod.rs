//! Git reference modelling and repository adapters.
//!
//! [`refs`] is pure and only needs a [`ConfigLookup`]; the remaining modules
//! bridge to an on-disk repository through `git2`.

pub mod detection;
pub mod refs;
pub mod repository;

pub use detection::{detect_repository, detect_repository_from_path};
pub use refs::{ConfigLookup, GitRef, GitRefError, RefKind, SharedConfig, find_tracked_remote};
pub use repository::{
  ConfigSnapshot, GitRevisionProvider, commit_data_from_git2, find_children, get_repository, get_repository_from_path,
  list_refs, load_commit_data,
};
