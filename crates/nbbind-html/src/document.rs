//! Source documents and the fragments extracted from them.
use std::{
  fs,
  path::{Path, PathBuf},
};

use log::warn;

use crate::{
  assets::relative_href,
  dom,
  error::{HtmlError, HtmlResult},
  extract::extract_tag_content,
  nav,
};

/// A standalone HTML document and the path it was read from.
///
/// Documents are never mutated; every transform returns a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
  path: PathBuf,
  html: String,
}

/// `<head>` and `<body>` inner markup of one document. Either may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
  pub head: String,
  pub body: String,
}

impl Fragment {
  /// Extract head and body from raw HTML. Missing tags yield empty strings.
  #[must_use]
  pub fn from_html(html: &str) -> Self {
    Self {
      head: extract_tag_content(html, "head"),
      body: extract_tag_content(html, "body"),
    }
  }
}

impl Document {
  #[must_use]
  pub fn new(path: impl Into<PathBuf>, html: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      html: html.into(),
    }
  }

  /// Read a document from disk. Invalid UTF-8 sequences are replaced rather
  /// than rejected.
  ///
  /// # Errors
  ///
  /// Returns [`HtmlError::Read`] if the file cannot be read.
  pub fn read(path: &Path) -> HtmlResult<Self> {
    let bytes = fs::read(path).map_err(|source| {
      HtmlError::Read {
        path: path.to_path_buf(),
        source,
      }
    })?;
    Ok(Self::new(path, String::from_utf8_lossy(&bytes).into_owned()))
  }

  #[must_use]
  pub fn path(&self) -> &Path {
    &self.path
  }

  #[must_use]
  pub fn html(&self) -> &str {
    &self.html
  }

  #[must_use]
  pub fn into_html(self) -> String {
    self.html
  }

  /// Directory the document lives in; relative asset references in its body
  /// are resolved against it.
  #[must_use]
  pub fn source_dir(&self) -> &Path {
    self
      .path
      .parent()
      .filter(|p| !p.as_os_str().is_empty())
      .unwrap_or_else(|| Path::new("."))
  }

  /// File name, e.g. `intro.html`.
  #[must_use]
  pub fn file_name(&self) -> String {
    self
      .path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_default()
  }

  /// File name without extension, e.g. `intro`.
  #[must_use]
  pub fn file_stem(&self) -> String {
    self
      .path
      .file_stem()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_default()
  }

  /// Extract the head and body fragments, logging when either is missing.
  #[must_use]
  pub fn fragment(&self) -> Fragment {
    let fragment = Fragment::from_html(&self.html);
    if fragment.body.is_empty() {
      warn!(
        "No <body> content in {}; using an empty section",
        self.path.display()
      );
    }
    fragment
  }

  /// Whether the persistent "Back to index" link is already present.
  #[must_use]
  pub fn has_navigation_marker(&self) -> bool {
    nav::has_navigation_marker(&dom::parse_document(&self.html))
  }

  /// Return a copy carrying the persistent back link to `href`. A document
  /// that already has the link is returned as-is.
  #[must_use]
  pub fn with_back_link(&self, href: &str) -> Self {
    Self {
      path: self.path.clone(),
      html: nav::inject_back_link(&self.html, href),
    }
  }

  /// Like [`Self::with_back_link`], with the href computed from this
  /// document's directory to `index_page`.
  #[must_use]
  pub fn with_back_link_to(&self, index_page: &Path) -> Self {
    let href = relative_href(self.source_dir(), index_page);
    self.with_back_link(&href)
  }
}
