//! # Show Command
//!
//! Renders the header block of a commit.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{FixedOffset, Local, Offset, Utc};
use clap::Args;
use revhead_core::git::{GitRevisionProvider, find_children, load_commit_data};
use revhead_core::{CachingRevisionLookup, HeaderConfig, LabelAlignment, get_config_dirs};
use tracing::{debug, info};

use super::open_repository;

/// Arguments for the show command
#[derive(Args, Debug, Default)]
pub struct ShowArgs {
  /// Revision to render (anything `git rev-parse` accepts)
  #[arg(default_value = "HEAD")]
  pub rev: String,

  /// Label alignment: `tabs` or `spaces`. Overrides header.toml
  #[arg(long, value_name = "STYLE")]
  pub style: Option<LabelAlignment>,

  /// Render the fixed fields only, without markup or related commits
  #[arg(long)]
  pub plain: bool,

  /// Show child and parent ids as plain short ids instead of links
  #[arg(long)]
  pub no_links: bool,

  /// Skip the search for child commits
  #[arg(long)]
  pub no_children: bool,

  /// Display absolute dates in UTC instead of the local offset
  #[arg(long)]
  pub utc: bool,

  /// Path to the repository
  #[arg(short = 'C', long = "repo", value_name = "PATH")]
  pub repo: Option<PathBuf>,

  /// Header configuration file to use instead of the default location
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,
}

/// Handle the show command
pub fn handle_show_command(args: ShowArgs) -> Result<ExitCode> {
  let header = render_header(&args)?;
  println!("{header}");
  Ok(ExitCode::SUCCESS)
}

/// Render the header requested by `args`
pub fn render_header(args: &ShowArgs) -> Result<String> {
  let config = load_config(args)?;
  let repo = open_repository(args.repo.as_deref())?;

  let mut commit = load_commit_data(&repo, &args.rev)?;
  info!(rev = %args.rev, id = %commit.id, "Rendering commit header");

  let offset: FixedOffset = if args.utc { Utc.fix() } else { *Local::now().offset() };
  let renderer = config.build_renderer(offset);

  if args.plain {
    return Ok(renderer.render_plain(&commit));
  }

  if !args.no_children {
    let children = find_children(&repo, &commit.id).context("Failed to find child commits")?;
    commit = commit.with_children(children);
  }

  let lookup = CachingRevisionLookup::new(GitRevisionProvider::new(&repo));
  let include_links = config.links && !args.no_links;

  renderer
    .render(&commit, include_links, &lookup)
    .with_context(|| format!("Failed to render header for {}", commit.id))
}

fn load_config(args: &ShowArgs) -> Result<HeaderConfig> {
  let mut config = match &args.config {
    Some(path) => HeaderConfig::load_from_path(path)?,
    None => get_config_dirs()?.load_header_config()?,
  };

  if let Some(style) = args.style {
    debug!(%style, "Overriding label alignment from the command line");
    config.style = style;
  }

  Ok(config)
}
