//! # Output Formatting
//!
//! Colored, emoji-prefixed messages for the terminal. Rendered headers are
//! printed verbatim; these helpers are for everything around them.

use owo_colors::OwoColorize;

/// Emoji for `name`, or `default` when the shortcode is unknown
pub fn get_emoji_or_default(name: &str, default: &str) -> String {
  match emojis::get_by_shortcode(name) {
    Some(emoji) => emoji.to_string(),
    None => default.to_string(),
  }
}

/// Print a success message
pub fn print_success(message: &str) {
  let check = get_emoji_or_default("check_mark", "✓");
  println!("{} {}", check.green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
  let warning = get_emoji_or_default("warning", "⚠");
  println!("{} {}", warning.yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
  let info = get_emoji_or_default("information", "ℹ");
  println!("{} {}", info.blue().bold(), message);
}

/// Format a ref name such as `origin/main`
pub fn format_ref_name(name: &str) -> String {
  name.bright_cyan().bold().to_string()
}

/// Format a commit id
pub fn format_commit_id(id: &str) -> String {
  id.yellow().to_string()
}
