//! # Configuration Management
//!
//! Locates the revhead configuration directory and loads `header.toml`, which
//! tunes how commit headers are rendered.
//!
//! ```toml
//! style = "spaces"
//! links = false
//! commit_link_scheme = "revhead://commit/"
//! date_format = "%Y-%m-%d %H:%M"
//!
//! [labels]
//! author = "Auteur"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::FixedOffset;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::render::{
  CommitDataHeaderRenderer, DEFAULT_COMMIT_LINK_SCHEME, DEFAULT_DATE_FORMAT, DateFormatter, DateLocale, HeaderLabels,
  LabelAlignment, LinkFactory,
};

/// Represents the configuration directories for revhead
#[derive(Debug, Clone)]
pub struct ConfigDirs {
  pub config_dir: PathBuf,
}

impl ConfigDirs {
  /// Resolve the platform configuration directory
  pub fn new() -> Result<Self> {
    let proj_dirs = ProjectDirs::from("", "", "revhead").context("Failed to determine project directories")?;

    Ok(Self {
      config_dir: proj_dirs.config_dir().to_path_buf(),
    })
  }

  /// Use an explicit configuration directory
  pub fn from_config_dir<P: Into<PathBuf>>(config_dir: P) -> Self {
    Self {
      config_dir: config_dir.into(),
    }
  }

  /// Get the config directory
  pub fn config_dir(&self) -> &PathBuf {
    &self.config_dir
  }

  /// Get the path to the header configuration file
  pub fn header_config_path(&self) -> PathBuf {
    self.config_dir.join("header.toml")
  }

  /// Load the header configuration, falling back to defaults when the file
  /// does not exist
  pub fn load_header_config(&self) -> Result<HeaderConfig> {
    HeaderConfig::load_from_path(self.header_config_path())
  }
}

/// Get the configuration directories
pub fn get_config_dirs() -> Result<ConfigDirs> {
  ConfigDirs::new()
}

/// Header rendering settings stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderConfig {
  #[serde(default)]
  pub style: LabelAlignment,
  #[serde(default = "HeaderConfig::default_links")]
  pub links: bool,
  #[serde(default = "HeaderConfig::default_commit_link_scheme")]
  pub commit_link_scheme: String,
  #[serde(default = "HeaderConfig::default_date_format")]
  pub date_format: String,
  #[serde(default)]
  pub labels: HeaderLabels,
}

impl Default for HeaderConfig {
  fn default() -> Self {
    Self {
      style: LabelAlignment::default(),
      links: Self::default_links(),
      commit_link_scheme: Self::default_commit_link_scheme(),
      date_format: Self::default_date_format(),
      labels: HeaderLabels::default(),
    }
  }
}

/// Errors raised while validating a header configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderConfigError {
  /// `date_format` contains an unknown specifier.
  #[error("invalid date format {0:?}")]
  InvalidDateFormat(String),
  /// `commit_link_scheme` is empty.
  #[error("commit link scheme must not be empty")]
  EmptyCommitLinkScheme,
}

impl HeaderConfig {
  fn default_links() -> bool {
    true
  }

  fn default_commit_link_scheme() -> String {
    DEFAULT_COMMIT_LINK_SCHEME.to_string()
  }

  fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
  }

  /// Load the configuration from `path`, returning defaults if it is missing
  pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    if !path.exists() {
      debug!(path = %path.display(), "No header config found, using defaults");
      return Ok(Self::default());
    }

    let contents =
      fs::read_to_string(path).with_context(|| format!("Failed to read header config from {}", path.display()))?;
    let config: HeaderConfig =
      toml::from_str(&contents).with_context(|| format!("Failed to parse header config from {}", path.display()))?;

    config
      .validate()
      .with_context(|| format!("Invalid header config in {}", path.display()))?;

    debug!(path = %path.display(), style = %config.style, "Loaded header config");
    Ok(config)
  }

  /// Write the configuration to `path`, creating parent directories
  pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }

    let content = toml::to_string_pretty(self).context("Failed to serialize header config to TOML")?;
    fs::write(path, content).with_context(|| format!("Failed to write header config to {}", path.display()))?;

    Ok(())
  }

  /// Check the values that serde cannot
  pub fn validate(&self) -> Result<(), HeaderConfigError> {
    if !DateLocale::is_valid_format(&self.date_format) {
      return Err(HeaderConfigError::InvalidDateFormat(self.date_format.clone()));
    }
    if self.commit_link_scheme.is_empty() {
      return Err(HeaderConfigError::EmptyCommitLinkScheme);
    }
    Ok(())
  }

  /// Build a renderer displaying absolute dates in `offset`.
  pub fn build_renderer(&self, offset: FixedOffset) -> CommitDataHeaderRenderer<LabelAlignment> {
    let dates = DateFormatter::new(DateLocale::new(self.date_format.clone(), offset));
    let links = LinkFactory::new(self.commit_link_scheme.clone());

    CommitDataHeaderRenderer::new(self.style, dates, links).with_labels(self.labels.clone())
  }
}
