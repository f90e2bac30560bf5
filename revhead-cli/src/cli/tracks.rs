//! # Tracks Command
//!
//! Answers whether a local branch is configured to track a given
//! remote-tracking branch.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::Args;
use revhead_core::git::list_refs;
use revhead_core::git::refs::{HEADS_PREFIX, REMOTES_PREFIX};
use revhead_core::output::{format_ref_name, print_info, print_success};
use tracing::debug;

use super::{find_ref, open_repository};

/// Arguments for the tracks command
#[derive(Args, Debug)]
pub struct TracksArgs {
  /// Local branch, e.g. `main` or `refs/heads/main`
  pub local: String,

  /// Remote-tracking branch, e.g. `origin/main` or `refs/remotes/origin/main`
  pub remote: String,

  /// Path to the repository
  #[arg(short = 'C', long = "repo", value_name = "PATH")]
  pub repo: Option<PathBuf>,
}

/// Handle the tracks command
pub fn handle_tracks_command(args: TracksArgs) -> Result<ExitCode> {
  if check_tracking(&args)? {
    print_success(&format!(
      "{} tracks {}",
      format_ref_name(&args.local),
      format_ref_name(&args.remote)
    ));
    Ok(ExitCode::SUCCESS)
  } else {
    print_info(&format!(
      "{} does not track {}",
      format_ref_name(&args.local),
      format_ref_name(&args.remote)
    ));
    Ok(ExitCode::FAILURE)
  }
}

/// Whether `args.local` tracks `args.remote`.
///
/// An unknown local branch is an error; an unknown remote-tracking branch is
/// simply not tracked.
pub fn check_tracking(args: &TracksArgs) -> Result<bool> {
  let repo = open_repository(args.repo.as_deref())?;
  let refs = list_refs(&repo)?;

  let Some(local) = find_ref(&refs, &args.local, HEADS_PREFIX).filter(|git_ref| git_ref.is_head()) else {
    bail!("Local branch '{}' not found", args.local);
  };

  let candidate = find_ref(&refs, &args.remote, REMOTES_PREFIX);
  if candidate.is_none() {
    debug!(remote = %args.remote, "Remote-tracking branch not found");
  }

  Ok(local.is_tracking_remote(candidate))
}
