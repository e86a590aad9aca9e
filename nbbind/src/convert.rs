//! Parallel fan-out of notebook conversions to the external converter.
use std::{
  path::{Path, PathBuf},
  process::Command,
};

use log::{debug, info};
use nbbind_config::{NotebookEntry, converter::ConverterConfig};
use rayon::prelude::*;

use crate::error::{NbbindError, Result};

/// One notebook to render: the converter writes `output_name` into
/// `output_dir`, which is the notebook's own directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
  pub input:       PathBuf,
  pub output_dir:  PathBuf,
  pub output_name: String,
}

impl Conversion {
  /// Resolve a configured notebook against the root directory.
  #[must_use]
  pub fn from_entry(entry: &NotebookEntry, root: &Path) -> Self {
    let input = root.join(&entry.input);
    let output_dir = input
      .parent()
      .filter(|parent| !parent.as_os_str().is_empty())
      .map_or_else(|| root.to_path_buf(), Path::to_path_buf);

    Self {
      input,
      output_dir,
      output_name: entry.output.clone(),
    }
  }

  /// Path of the HTML document the converter is expected to produce.
  #[must_use]
  pub fn output_path(&self) -> PathBuf {
    self.output_dir.join(&self.output_name)
  }

  /// `program args... --output NAME --output-dir DIR INPUT`
  #[must_use]
  pub fn command(&self, converter: &ConverterConfig) -> Command {
    let mut command = Command::new(&converter.program);
    command
      .args(&converter.args)
      .arg("--output")
      .arg(&self.output_name)
      .arg("--output-dir")
      .arg(&self.output_dir)
      .arg(&self.input);
    command
  }

  /// Run the converter and wait for it.
  ///
  /// # Errors
  ///
  /// Returns an error if the converter cannot be started or exits with a
  /// non-zero status.
  pub fn run(&self, converter: &ConverterConfig) -> Result<PathBuf> {
    let output = self.output_path();
    info!("Generating: {}", output.display());

    let status = self.command(converter).status().map_err(|source| {
      NbbindError::Spawn {
        program: converter.program.clone(),
        source,
      }
    })?;

    if !status.success() {
      return Err(NbbindError::Conversion {
        input: self.input.clone(),
        output,
        status,
      });
    }

    debug!("Converted {}", self.input.display());
    Ok(output)
  }
}

/// Check that every notebook exists. Runs before any conversion so a typo
/// in the list does not leave half the outputs regenerated.
///
/// # Errors
///
/// Returns [`NbbindError::MissingInput`] for the first missing notebook.
pub fn check_inputs(conversions: &[Conversion]) -> Result<()> {
  match conversions.iter().find(|c| !c.input.is_file()) {
    Some(missing) => {
      Err(NbbindError::MissingInput {
        path: missing.input.clone(),
      })
    },
    None => Ok(()),
  }
}

/// Convert all notebooks on a dedicated pool of `workers` threads.
///
/// Returns the generated HTML paths in input order. The first failure stops
/// scheduling further conversions and is returned.
///
/// # Errors
///
/// Returns an error if the pool cannot be built or any conversion fails.
pub fn convert_all(
  conversions: &[Conversion],
  converter: &ConverterConfig,
  workers: usize,
) -> Result<Vec<PathBuf>> {
  let pool = rayon::ThreadPoolBuilder::new()
    .num_threads(workers.max(1))
    .build()?;
  debug!(
    "Converting {} notebooks on {workers} threads",
    conversions.len()
  );

  pool.install(|| {
    conversions
      .par_iter()
      .map(|conversion| conversion.run(converter))
      .collect()
  })
}
