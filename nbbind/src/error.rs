use std::{io, path::PathBuf, process::ExitStatus};

use nbbind_config::ConfigError;
use nbbind_html::HtmlError;
use thiserror::Error;

/// Top-level error type for the nbbind crate.
#[derive(Debug, Error)]
pub enum NbbindError {
  #[error("Missing notebook: {}", path.display())]
  MissingInput { path: PathBuf },

  #[error(
    "Conversion of {} to {} failed ({status})",
    input.display(),
    output.display()
  )]
  Conversion {
    input:  PathBuf,
    output: PathBuf,
    status: ExitStatus,
  },

  #[error("Failed to run '{program}': {source}")]
  Spawn {
    program: String,
    #[source]
    source:  io::Error,
  },

  #[error("Package snapshot '{program}' failed ({status})")]
  Snapshot { program: String, status: ExitStatus },

  #[error("Package snapshot '{program}' returned empty output")]
  EmptySnapshot { program: String },

  #[error("Failed to write {}: {source}", path.display())]
  Write {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to build worker pool: {0}")]
  ThreadPool(#[from] rayon::ThreadPoolBuildError),

  #[error(transparent)]
  Html(#[from] HtmlError),

  #[error(transparent)]
  Config(#[from] ConfigError),
}

/// Result type for nbbind operations.
pub type Result<T> = std::result::Result<T, NbbindError>;
