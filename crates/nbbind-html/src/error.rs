use std::{io, path::PathBuf};

use thiserror::Error;

/// Error type for nbbind-html operations.
///
/// Malformed markup is never an error here; missing tags and unresolvable
/// asset paths degrade to pass-through. Only I/O and caller mistakes surface.
#[derive(Debug, Error)]
pub enum HtmlError {
  #[error("Failed to read HTML document {}: {source}", path.display())]
  Read {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("No HTML documents provided for combination")]
  NoDocuments,

  #[error("Invalid section marker '{marker}': {source}")]
  SectionMarker {
    marker: String,
    #[source]
    source: regex::Error,
  },
}

/// Result type for nbbind-html operations.
pub type HtmlResult<T> = Result<T, HtmlError>;
