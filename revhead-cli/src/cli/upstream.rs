//! # Upstream Command
//!
//! Finds the remote-tracking branch a local branch tracks by checking every
//! remote-tracking branch in the repository.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Args;
use revhead_core::git::refs::HEADS_PREFIX;
use revhead_core::git::{GitRef, find_tracked_remote, list_refs};
use revhead_core::output::{format_commit_id, format_ref_name, print_warning};

use super::{find_ref, open_repository};

/// Arguments for the upstream command
#[derive(Args, Debug)]
pub struct UpstreamArgs {
  /// Local branch to inspect. Defaults to the checked-out branch
  pub branch: Option<String>,

  /// Path to the repository
  #[arg(short = 'C', long = "repo", value_name = "PATH")]
  pub repo: Option<PathBuf>,
}

/// Upstream resolution for one local branch
#[derive(Debug)]
pub struct Upstream {
  /// The local branch that was inspected
  pub local: GitRef,
  /// The remote-tracking branch it tracks, if any
  pub remote: Option<GitRef>,
}

/// Handle the upstream command
pub fn handle_upstream_command(args: UpstreamArgs) -> Result<ExitCode> {
  let upstream = resolve_upstream(&args)?;

  match &upstream.remote {
    Some(remote) => {
      println!(
        "{} {}",
        format_ref_name(&format!("{}/{}", remote.remote_name(), remote.name())),
        format_commit_id(&remote.target().to_short_string())
      );
      Ok(ExitCode::SUCCESS)
    }
    None => {
      let merge_with = upstream.local.merge_with();
      if merge_with.is_empty() {
        print_warning(&format!("{} has no upstream configured", upstream.local.name()));
      } else {
        print_warning(&format!(
          "{} is configured to track {}/{}, but no such remote-tracking branch exists",
          upstream.local.name(),
          upstream.local.tracking_remote(),
          merge_with
        ));
      }
      Ok(ExitCode::FAILURE)
    }
  }
}

/// Resolve the local branch named in `args` and the remote-tracking branch it
/// tracks, if any
pub fn resolve_upstream(args: &UpstreamArgs) -> Result<Upstream> {
  let repo = open_repository(args.repo.as_deref())?;

  let branch = match &args.branch {
    Some(branch) => branch.clone(),
    None => {
      let head = repo.head().context("Failed to read HEAD")?;
      if !head.is_branch() {
        bail!("HEAD is detached; name a branch explicitly");
      }
      head.shorthand().context("HEAD is not valid UTF-8")?.to_string()
    }
  };

  let refs = list_refs(&repo)?;
  let Some(local) = find_ref(&refs, &branch, HEADS_PREFIX).filter(|git_ref| git_ref.is_head()) else {
    bail!("Local branch '{branch}' not found");
  };

  let remote = find_tracked_remote(local, refs.iter().filter(|git_ref| git_ref.is_remote())).cloned();

  Ok(Upstream {
    local: local.clone(),
    remote,
  })
}

#[cfg(test)]
mod tests {
  use revhead_test_utils::git::{
    GitRepoTestGuard, add_remote_branch, checkout_branch, create_branch, create_commit, set_upstream,
  };

  use super::*;

  fn args(git_repo: &GitRepoTestGuard, branch: Option<&str>) -> UpstreamArgs {
    UpstreamArgs {
      branch: branch.map(str::to_string),
      repo: Some(git_repo.path().to_path_buf()),
    }
  }

  #[test]
  fn finds_configured_remote_branch() {
    let git_repo = GitRepoTestGuard::new();
    let tip = create_commit(&git_repo.repo, "a.txt", "a", "First").unwrap();
    create_branch(&git_repo.repo, "feature", None).unwrap();
    add_remote_branch(&git_repo.repo, "origin", "main", tip).unwrap();
    add_remote_branch(&git_repo.repo, "origin", "feature", tip).unwrap();
    set_upstream(&git_repo.repo, "feature", "origin", "feature").unwrap();

    let upstream = resolve_upstream(&args(&git_repo, Some("feature"))).unwrap();
    let remote = upstream.remote.unwrap();
    assert_eq!(remote.complete_name(), "refs/remotes/origin/feature");
    assert_eq!(upstream.local.name(), "feature");
  }

  #[test]
  fn defaults_to_checked_out_branch() {
    let git_repo = GitRepoTestGuard::new();
    let tip = create_commit(&git_repo.repo, "a.txt", "a", "First").unwrap();
    create_branch(&git_repo.repo, "topic", None).unwrap();
    checkout_branch(&git_repo.repo, "topic").unwrap();
    add_remote_branch(&git_repo.repo, "upstream", "topic", tip).unwrap();
    set_upstream(&git_repo.repo, "topic", "upstream", "topic").unwrap();

    let upstream = resolve_upstream(&args(&git_repo, None)).unwrap();
    assert_eq!(upstream.local.name(), "topic");
    assert_eq!(
      upstream.remote.map(|remote| remote.complete_name().to_string()),
      Some("refs/remotes/upstream/topic".to_string())
    );
  }

  #[test]
  fn unconfigured_branch_has_no_upstream() {
    let git_repo = GitRepoTestGuard::new();
    let tip = create_commit(&git_repo.repo, "a.txt", "a", "First").unwrap();
    create_branch(&git_repo.repo, "feature", None).unwrap();
    add_remote_branch(&git_repo.repo, "origin", "feature", tip).unwrap();

    let upstream = resolve_upstream(&args(&git_repo, Some("feature"))).unwrap();
    assert!(upstream.remote.is_none());
    assert!(upstream.local.merge_with().is_empty());
  }

  #[test]
  fn upstream_without_remote_ref_is_reported_unresolved() {
    let git_repo = GitRepoTestGuard::new();
    create_commit(&git_repo.repo, "a.txt", "a", "First").unwrap();
    create_branch(&git_repo.repo, "feature", None).unwrap();
    set_upstream(&git_repo.repo, "feature", "origin", "feature").unwrap();

    let upstream = resolve_upstream(&args(&git_repo, Some("feature"))).unwrap();
    assert!(upstream.remote.is_none());
    assert_eq!(upstream.local.merge_with(), "feature");
    assert_eq!(upstream.local.tracking_remote(), "origin");
  }
}
