//! The full build: snapshot, convert, link, assemble.
use std::{
  fs,
  path::{Path, PathBuf},
};

use log::{debug, info};
use nbbind_config::Config;
use nbbind_html::{AssembleOptions, Assembler, Document, HtmlResult};

use crate::{
  convert::{Conversion, check_inputs, convert_all},
  error::{NbbindError, Result},
  snapshot::snapshot_packages,
};

/// Steps of [`build`] that can be left out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
  /// Do not write the package snapshot.
  pub skip_snapshot: bool,
  /// Assemble the HTML files left by a previous run instead of converting.
  pub skip_convert:  bool,
}

/// Root directory of `config`, made absolute.
#[must_use]
pub fn root_dir(config: &Config) -> PathBuf {
  let root = config.root_dir();
  std::path::absolute(&root).unwrap_or(root)
}

/// Write `contents` to a temporary sibling of `path`, then rename it into
/// place so readers never see a partial file.
///
/// # Errors
///
/// Returns an error if either step fails.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
  let file_name = path
    .file_name()
    .map_or_else(|| "output".into(), |name| name.to_string_lossy());
  let tmp = path.with_file_name(format!(".{file_name}.tmp"));

  let write_err = |source| {
    NbbindError::Write {
      path: path.to_path_buf(),
      source,
    }
  };

  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent).map_err(write_err)?;
  }
  fs::write(&tmp, contents).map_err(write_err)?;
  fs::rename(&tmp, path).map_err(|source| {
    let _ = fs::remove_file(&tmp);
    write_err(source)
  })
}

/// Add the persistent "Back to index" link to the HTML file at `path`.
///
/// Returns `false` when the file already carried the link and was left
/// untouched.
///
/// # Errors
///
/// Returns an error if the file cannot be read or written.
pub fn apply_back_link(path: &Path, index_page: &Path) -> Result<bool> {
  let document = Document::read(path)?;
  if document.has_navigation_marker() {
    debug!("Back link already present in {}", path.display());
    return Ok(false);
  }

  let linked = document.with_back_link_to(index_page);
  write_atomic(path, linked.html())?;
  Ok(true)
}

/// Assembler options from the `[navigation]` table. A configured stylesheet
/// is read relative to the root.
///
/// # Errors
///
/// Returns an error if the stylesheet cannot be read.
pub fn assemble_options(config: &Config, root: &Path) -> Result<AssembleOptions> {
  let navigation = &config.navigation;
  let stylesheet = navigation
    .stylesheet
    .as_ref()
    .map(|path| {
      let path = root.join(path);
      fs::read_to_string(&path).map_err(|source| {
        NbbindError::Html(nbbind_html::HtmlError::Read { path, source })
      })
    })
    .transpose()?;

  Ok(AssembleOptions {
    section_marker: navigation.section_marker.clone(),
    page_breaks: navigation.page_breaks,
    toc_title: navigation.toc_title.clone(),
    stylesheet,
  })
}

/// Combine the HTML files `inputs`, in order, into `output`, then add the
/// back link to the result when enabled.
///
/// # Errors
///
/// Returns an error if an input cannot be read, no inputs are given, or the
/// output cannot be written.
pub fn assemble_files(
  config: &Config,
  inputs: &[PathBuf],
  output: &Path,
) -> Result<PathBuf> {
  let root = root_dir(config);
  let output = root.join(output);

  let documents = inputs
    .iter()
    .map(|path| Document::read(&root.join(path)))
    .collect::<HtmlResult<Vec<_>>>()?;

  let assembler = Assembler::new(assemble_options(config, &root)?)?;
  let combined = Document::new(&output, assembler.assemble(&documents, &root)?);

  let combined = if config.navigation.back_link {
    combined.with_back_link_to(&root.join(&config.index_page))
  } else {
    combined
  };

  write_atomic(&output, combined.html())?;
  info!("Combined HTML: {}", output.display());

  Ok(output)
}

/// Run the whole build described by `config` and return the path of the
/// combined document.
///
/// Every notebook is checked before anything runs; conversions happen in
/// parallel and the first failure aborts the build before the combined
/// document is touched.
///
/// # Errors
///
/// Returns the first error of any step.
pub fn build(config: &Config, options: BuildOptions) -> Result<PathBuf> {
  let root = root_dir(config);
  let conversions: Vec<Conversion> = config
    .effective_notebooks()
    .iter()
    .map(|entry| Conversion::from_entry(entry, &root))
    .collect();

  if !options.skip_convert {
    check_inputs(&conversions)?;
  }

  if config.snapshot.enable && !options.skip_snapshot {
    snapshot_packages(&config.snapshot, &root)?;
  }

  let html_paths = if options.skip_convert {
    conversions.iter().map(Conversion::output_path).collect()
  } else {
    let workers = config.worker_count(num_cpus::get());
    convert_all(&conversions, &config.converter, workers)?
  };

  if config.navigation.back_link {
    let index_page = root.join(&config.index_page);
    for path in &html_paths {
      apply_back_link(path, &index_page)?;
    }
  }

  assemble_files(config, &html_paths, &config.combined_output)
}

#[cfg(test)]
mod tests {
  #![allow(
    clippy::unwrap_used,
    clippy::field_reassign_with_default,
    reason = "Fine in tests"
  )]

  use super::*;

  #[test]
  fn write_atomic_replaces_and_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/out.html");

    write_atomic(&path, "one").unwrap();
    write_atomic(&path, "two").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "two");
    assert!(!dir.path().join("nested/.out.html.tmp").exists());
  }

  #[test]
  fn back_link_is_applied_once() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("nb");
    fs::create_dir_all(&sub).unwrap();
    let path = sub.join("a.html");
    fs::write(
      &path,
      "<html><head><title>a</title></head><body><p>x</p></body></html>",
    )
    .unwrap();
    let index = dir.path().join("index.html");

    assert!(apply_back_link(&path, &index).unwrap());
    let once = fs::read_to_string(&path).unwrap();
    assert!(once.contains(r#"href="../index.html""#));

    assert!(!apply_back_link(&path, &index).unwrap());
    assert_eq!(fs::read_to_string(&path).unwrap(), once);
  }

  #[test]
  fn missing_stylesheet_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.navigation.stylesheet = Some(PathBuf::from("missing.css"));
    assert!(assemble_options(&config, dir.path()).is_err());

    fs::write(dir.path().join("missing.css"), "body {}").unwrap();
    let options = assemble_options(&config, dir.path()).unwrap();
    assert_eq!(options.stylesheet.as_deref(), Some("body {}"));
  }
}
