//! Anchor markup for mail addresses and commits.

use super::labels::html_encode;
use crate::object_id::ObjectId;

/// URI prefix for in-app commit navigation.
pub const DEFAULT_COMMIT_LINK_SCHEME: &str = "gitext://gotocommit/";

/// Builds `<a href='...'>...</a>` markup.
///
/// Targets are embedded verbatim; only mail link text is entity-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFactory {
  commit_scheme: String,
}

impl Default for LinkFactory {
  fn default() -> Self {
    Self::new(DEFAULT_COMMIT_LINK_SCHEME)
  }
}

impl LinkFactory {
  /// Factory whose commit links start with `commit_scheme`.
  pub fn new(commit_scheme: impl Into<String>) -> Self {
    Self {
      commit_scheme: commit_scheme.into(),
    }
  }

  /// Generic anchor around encoded `text`.
  pub fn link(&self, text: &str, target: &str) -> String {
    format!("<a href='{target}'>{}</a>", html_encode(text))
  }

  /// `mailto:` anchor around encoded `text`.
  pub fn mail_link(&self, text: &str, address: &str) -> String {
    self.link(text, &format!("mailto:{address}"))
  }

  /// Anchor navigating to commit `id`, showing `text` as given.
  pub fn commit_link(&self, id: &ObjectId, text: &str) -> String {
    format!("<a href='{}{id}'>{text}</a>", self.commit_scheme)
  }

  /// Mail link for a `Name <address>` signature.
  ///
  /// Signatures without an address render as encoded text only.
  pub fn signature_link(&self, signature: &str) -> String {
    match extract_address(signature) {
      Some(address) => self.mail_link(signature, address),
      None => html_encode(signature),
    }
  }
}

/// Text between the first `<` and the last `>` of a signature.
pub fn extract_address(signature: &str) -> Option<&str> {
  let start = signature.find('<')? + 1;
  let end = signature.rfind('>')?;
  signature.get(start..end).filter(|address| !address.trim().is_empty())
}
