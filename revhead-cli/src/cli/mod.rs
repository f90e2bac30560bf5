//! # Command Line Interface
//!
//! Defines the CLI structure and dispatches to the subcommand handlers.

pub mod show;
pub mod tracks;
pub mod upstream;

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use git2::Repository;
use revhead_core::git::{GitRef, get_repository, get_repository_from_path};

/// Top-level CLI command for revhead
#[derive(Parser)]
#[command(name = "revhead")]
#[command(about = "Commit headers and upstream tracking for git repositories")]
#[command(
  long_about = "revhead renders the header block shown above a commit message (author, dates,\n\
        hash, children and parents) and answers whether a local branch tracks a given\n\
        remote-tracking branch."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(long, value_enum, ignore_case = true, global = true, default_value_t = ColorMode::Auto)]
  pub colors: ColorMode,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// When to emit ANSI colors
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
  /// Enable colored output
  Always,
  /// Detect terminal support
  Auto,
  /// Disable colored output
  Never,
}

/// Subcommands for revhead
#[derive(Subcommand)]
pub enum Commands {
  /// Render the header block of a commit
  #[command(long_about = "Render the header block of a commit.\n\n\
            Shows author, author date, committer, commit date and hash, followed by the\n\
            commits that have this one as a parent and the commit's own parents. Layout,\n\
            labels and link scheme are read from header.toml in the config directory.")]
  Show(show::ShowArgs),

  /// Check whether a local branch tracks a remote-tracking branch
  #[command(long_about = "Check whether a local branch tracks a remote-tracking branch.\n\n\
            Compares the branch's configured upstream (branch.<name>.remote and\n\
            branch.<name>.merge) with the given remote-tracking branch. Exits with\n\
            status 0 when it does and 1 when it does not.")]
  Tracks(tracks::TracksArgs),

  /// Show the remote-tracking branch a local branch tracks
  #[command(long_about = "Show the remote-tracking branch a local branch tracks.\n\n\
            Scans the repository's remote-tracking branches for the one the local branch\n\
            is configured to track. Defaults to the checked-out branch.")]
  Upstream(upstream::UpstreamArgs),
}

pub fn handle_cli(cli: Cli) -> Result<ExitCode> {
  match cli.colors {
    ColorMode::Always => owo_colors::set_override(true),
    ColorMode::Never => owo_colors::set_override(false),
    ColorMode::Auto => {}
  }

  match cli.command {
    Commands::Show(show) => show::handle_show_command(show),
    Commands::Tracks(tracks) => tracks::handle_tracks_command(tracks),
    Commands::Upstream(upstream) => upstream::handle_upstream_command(upstream),
  }
}

/// Open the repository at `path`, or the one enclosing the current directory
pub(crate) fn open_repository(path: Option<&Path>) -> Result<Repository> {
  match path {
    Some(path) => get_repository_from_path(path),
    None => get_repository(),
  }
}

/// Find a reference by complete name or by its name under `prefix`
pub(crate) fn find_ref<'a>(refs: &'a [GitRef], name: &str, prefix: &str) -> Option<&'a GitRef> {
  refs
    .iter()
    .find(|git_ref| git_ref.complete_name() == name)
    .or_else(|| {
      let complete_name = format!("{prefix}{name}");
      refs.iter().find(|git_ref| git_ref.complete_name() == complete_name)
    })
}
