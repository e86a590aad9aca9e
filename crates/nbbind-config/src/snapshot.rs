use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Snapshot of the installed packages, written before conversion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SnapshotConfig {
  /// Whether to write the snapshot at all.
  pub enable: bool,

  /// Command printing one `name==version` line per package.
  pub program: String,
  pub args:    Vec<String>,

  /// Output file, relative to the root directory.
  pub output: PathBuf,
}

impl Default for SnapshotConfig {
  fn default() -> Self {
    Self {
      enable:  true,
      program: "python3".to_string(),
      args:    ["-m", "pip", "list", "--not-required", "--format=freeze"]
        .map(String::from)
        .to_vec(),
      output:  PathBuf::from("requirements.txt"),
    }
  }
}
