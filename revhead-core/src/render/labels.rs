//! Header label alignment strategies.
//!
//! Labels sit in a left column and values start at a common column to their
//! right. [`MonospacedHeaderLabelFormatter`] pads with spaces for fixed-width
//! fonts; [`TabbedHeaderLabelFormatter`] pads with tabs and relies on the
//! viewer's tab stops.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

/// Width of a tab stop assumed by [`TabbedHeaderLabelFormatter`].
pub const TAB_SIZE: usize = 4;

/// Aligns header labels to a column width.
pub trait HeaderLabelFormatter {
  /// HTML-encode `label`, optionally append a colon, and pad it to
  /// `desired_length`.
  fn format_label(&self, label: &str, desired_length: usize, append_colon: bool) -> String;

  /// Append a colon to `label` and pad it to `desired_length` without any
  /// encoding.
  fn format_label_plain(&self, label: &str, desired_length: usize) -> String;

  /// Column at which values start, given the width of the longest label.
  fn column_width(&self, longest_label: usize) -> usize;
}

/// Pads labels with spaces to an exact column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonospacedHeaderLabelFormatter;

impl HeaderLabelFormatter for MonospacedHeaderLabelFormatter {
  fn format_label(&self, label: &str, desired_length: usize, append_colon: bool) -> String {
    pad_with_spaces(label_text(label, append_colon), desired_length)
  }

  fn format_label_plain(&self, label: &str, desired_length: usize) -> String {
    pad_with_spaces(format!("{label}:"), desired_length)
  }

  fn column_width(&self, longest_label: usize) -> usize {
    // colon plus one separating space
    longest_label + 2
  }
}

/// Pads labels with tabs, rounding up to the next tab stop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabbedHeaderLabelFormatter;

impl HeaderLabelFormatter for TabbedHeaderLabelFormatter {
  fn format_label(&self, label: &str, desired_length: usize, append_colon: bool) -> String {
    pad_with_tabs(label_text(label, append_colon), desired_length)
  }

  fn format_label_plain(&self, label: &str, desired_length: usize) -> String {
    pad_with_tabs(format!("{label}:"), desired_length)
  }

  fn column_width(&self, longest_label: usize) -> usize {
    // first tab stop strictly past "label:"
    ((longest_label + 1) / TAB_SIZE + 1) * TAB_SIZE
  }
}

/// Runtime choice between the two label strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelAlignment {
  /// Tab-stop alignment.
  #[default]
  Tabs,
  /// Fixed-width space alignment.
  Spaces,
}

impl LabelAlignment {
  fn formatter(self) -> &'static dyn HeaderLabelFormatter {
    match self {
      LabelAlignment::Tabs => &TabbedHeaderLabelFormatter,
      LabelAlignment::Spaces => &MonospacedHeaderLabelFormatter,
    }
  }
}

impl HeaderLabelFormatter for LabelAlignment {
  fn format_label(&self, label: &str, desired_length: usize, append_colon: bool) -> String {
    self.formatter().format_label(label, desired_length, append_colon)
  }

  fn format_label_plain(&self, label: &str, desired_length: usize) -> String {
    self.formatter().format_label_plain(label, desired_length)
  }

  fn column_width(&self, longest_label: usize) -> usize {
    self.formatter().column_width(longest_label)
  }
}

impl fmt::Display for LabelAlignment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LabelAlignment::Tabs => f.write_str("tabs"),
      LabelAlignment::Spaces => f.write_str("spaces"),
    }
  }
}

impl FromStr for LabelAlignment {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "tabs" | "tab" => Ok(LabelAlignment::Tabs),
      "spaces" | "space" | "monospaced" => Ok(LabelAlignment::Spaces),
      other => Err(format!("unknown label alignment `{other}` (expected `tabs` or `spaces`)")),
    }
  }
}

fn label_text(label: &str, append_colon: bool) -> String {
  let mut text = html_encode(label);
  if append_colon {
    text.push(':');
  }
  text
}

fn pad_with_spaces(mut text: String, desired_length: usize) -> String {
  let width = text.width();
  if width < desired_length {
    text.push_str(&" ".repeat(desired_length - width));
  }
  text
}

fn pad_with_tabs(mut text: String, desired_length: usize) -> String {
  let width = text.width();
  if width < desired_length {
    let missing = desired_length - width;
    text.push_str(&"\t".repeat(missing.div_ceil(TAB_SIZE)));
  }
  text
}

/// Replace the characters that are significant in HTML with entities.
pub fn html_encode(text: &str) -> String {
  let mut encoded = String::with_capacity(text.len());
  for ch in text.chars() {
    match ch {
      '&' => encoded.push_str("&amp;"),
      '<' => encoded.push_str("&lt;"),
      '>' => encoded.push_str("&gt;"),
      '"' => encoded.push_str("&quot;"),
      '\'' => encoded.push_str("&#39;"),
      _ => encoded.push(ch),
    }
  }
  encoded
}
