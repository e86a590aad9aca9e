use serde::{Deserialize, Serialize};

/// External notebook converter invocation.
///
/// The converter is run as `program args… --output NAME --output-dir DIR
/// INPUT` and must leave `DIR/NAME` behind or exit non-zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConverterConfig {
  /// Executable to run.
  pub program: String,

  /// Leading arguments, before the per-notebook ones.
  pub args: Vec<String>,
}

impl Default for ConverterConfig {
  fn default() -> Self {
    Self {
      program: "python3".to_string(),
      args:    ["-m", "jupyter", "nbconvert", "--to", "html"]
        .map(String::from)
        .to_vec(),
    }
  }
}
