use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Navigation and layout of the combined document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NavigationConfig {
  /// Word marking section headings. Matching headings get a "Back to
  /// contents" link and an entry in the table of contents.
  pub section_marker: String,

  /// Insert a page break before every section heading but the first one of
  /// each document.
  pub page_breaks: bool,

  /// Heading of the table of contents.
  pub toc_title: String,

  /// Inject the persistent "Back to index" link into generated documents.
  pub back_link: bool,

  /// Stylesheet replacing the built-in one of the combined document.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub stylesheet: Option<PathBuf>,
}

impl Default for NavigationConfig {
  fn default() -> Self {
    Self {
      section_marker: "Part".to_string(),
      page_breaks:    true,
      toc_title:      "Contents".to_string(),
      back_link:      true,
      stylesheet:     None,
    }
  }
}
