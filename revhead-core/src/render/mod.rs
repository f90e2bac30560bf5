//! Commit header rendering.
//!
//! The renderer is assembled from small collaborators so callers can swap the
//! alignment strategy, the date locale or the link scheme independently.

pub mod date;
pub mod header;
pub mod labels;
pub mod links;

pub use date::{DEFAULT_DATE_FORMAT, DateFormatter, DateLocale};
pub use header::{CommitDataHeaderRenderer, HeaderLabels, HeaderRenderError};
pub use labels::{
  HeaderLabelFormatter, LabelAlignment, MonospacedHeaderLabelFormatter, TAB_SIZE, TabbedHeaderLabelFormatter,
  html_encode,
};
pub use links::{DEFAULT_COMMIT_LINK_SCHEME, LinkFactory, extract_address};
