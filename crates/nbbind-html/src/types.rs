//! Records shared between the rewriting stages and the table of contents.

/// A heading found in a fragment, after its anchor id has been assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
  /// Heading level (1-4).
  pub level: u8,
  /// Display text, markup and permalink decorations removed.
  pub text:  String,
  /// Anchor id, unique within the combined document.
  pub id:    String,
}

/// One source document after all rewrites, ready to be wrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
  /// Element id of the wrapping `<section>`.
  pub id:          String,
  /// File name of the source document, e.g. `intro.html`.
  pub source_name: String,
  /// Rewritten body markup.
  pub body:        String,
  /// Headings of the body in document order.
  pub headings:    Vec<Heading>,
}

/// Nesting level of a [`TocEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TocLevel {
  /// One per source document.
  Top,
  /// One per section-marker heading.
  Sub,
}

/// A single link in the table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
  pub label: String,
  pub href:  String,
  pub level: TocLevel,
}
