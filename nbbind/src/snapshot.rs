use std::{
  fs,
  path::{Path, PathBuf},
  process::Command,
};

use log::info;
use nbbind_config::snapshot::SnapshotConfig;

use crate::error::{NbbindError, Result};

/// Run the snapshot command in `root` and write its trimmed standard output,
/// plus a trailing newline, to the configured file.
///
/// # Errors
///
/// Returns an error if the command cannot run, fails, prints nothing, or the
/// file cannot be written.
pub fn snapshot_packages(config: &SnapshotConfig, root: &Path) -> Result<PathBuf> {
  let output = Command::new(&config.program)
    .args(&config.args)
    .current_dir(root)
    .output()
    .map_err(|source| {
      NbbindError::Spawn {
        program: config.program.clone(),
        source,
      }
    })?;

  if !output.status.success() {
    return Err(NbbindError::Snapshot {
      program: config.program.clone(),
      status:  output.status,
    });
  }

  let stdout = String::from_utf8_lossy(&output.stdout);
  let content = stdout.trim();
  if content.is_empty() {
    return Err(NbbindError::EmptySnapshot {
      program: config.program.clone(),
    });
  }

  let path = root.join(&config.output);
  fs::write(&path, format!("{content}\n")).map_err(|source| {
    NbbindError::Write {
      path: path.clone(),
      source,
    }
  })?;
  info!("Package snapshot: {}", path.display());

  Ok(path)
}
