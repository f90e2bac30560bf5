//! Test utilities shared across the revhead workspace
//!
//! Provides throwaway git repositories ([`GitRepoTestGuard`]) and helpers to
//! populate them with commits, branches, remotes and upstream configuration.

pub mod git;

pub use git::GitRepoTestGuard;
