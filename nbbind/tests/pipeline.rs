#![cfg(unix)]
#![allow(
  clippy::expect_used,
  clippy::unwrap_used,
  clippy::field_reassign_with_default,
  reason = "Fine in tests"
)]
use std::{fs, path::Path};

use nbbind::{
  error::NbbindError,
  pipeline::{self, BuildOptions},
};
use nbbind_config::{
  Config,
  NotebookEntry,
  converter::ConverterConfig,
  snapshot::SnapshotConfig,
};
use tempfile::tempdir;

/// A converter that copies the notebook to the requested output. Invoked as
/// `sh -c SCRIPT convert --output NAME --output-dir DIR INPUT`.
fn sh_converter(script: &str) -> ConverterConfig {
  ConverterConfig {
    program: "sh".to_string(),
    args:    vec!["-c".to_string(), script.to_string(), "convert".to_string()],
  }
}

const COPY: &str = r#"cp "$5" "$4/$2""#;

fn notebook(title: &str, body: &str) -> String {
  format!(
    "<!DOCTYPE html>\n<html>\n<head>\n<title>{title}</title>\n</head>\n<body>\n\
     {body}\n</body>\n</html>\n"
  )
}

/// Two "notebooks" (already HTML, so the copying converter renders them)
/// under `root/a` and `root/b`.
fn project(root: &Path) -> Config {
  fs::create_dir_all(root.join("a/img")).unwrap();
  fs::create_dir_all(root.join("b")).unwrap();
  fs::write(
    root.join("a/alpha.ipynb"),
    notebook(
      "Alpha",
      "<h1>Part 1: Setup</h1>\n<img src=\"img/plot.png\">\n<h2>Part 2</h2>",
    ),
  )
  .unwrap();
  fs::write(root.join("b/beta.ipynb"), notebook("Beta", "<h1>Part 3</h1>"))
    .unwrap();

  let mut config = Config::default();
  config.root = Some(root.to_path_buf());
  config.notebooks = vec![
    NotebookEntry::new("a/alpha.ipynb", "alpha.html"),
    NotebookEntry::new("b/beta.ipynb", "beta.html"),
  ];
  config.combined_output = "book.html".into();
  config.converter = sh_converter(COPY);
  config.snapshot.enable = false;
  config
}

#[test]
fn test_build_writes_linked_documents_and_combined_output() {
  let dir = tempdir().expect("Failed to create temp dir in test");
  let config = project(dir.path());

  let combined = pipeline::build(&config, BuildOptions::default()).unwrap();
  assert_eq!(combined, dir.path().join("book.html"));

  let alpha = fs::read_to_string(dir.path().join("a/alpha.html")).unwrap();
  assert!(alpha.contains(
    r#"<a class="back-to-index" href="../index.html">Back to index</a>"#
  ));

  let html = fs::read_to_string(&combined).unwrap();
  assert!(html.contains(r#"<nav id="toc""#));
  assert!(html.contains(r#"id="alpha-part-1-setup""#));
  assert!(html.contains(r#"id="alpha-part-2""#));
  assert!(html.contains(r#"id="beta-part-3""#));
  assert!(html.contains(r#"src="a/img/plot.png""#));
  assert!(html.contains(r#"href="index.html""#));

  let alpha_pos = html.find(r#"id="alpha""#).unwrap();
  let beta_pos = html.find(r#"id="beta""#).unwrap();
  assert!(alpha_pos < beta_pos);
}

#[test]
fn test_rebuild_is_stable() {
  let dir = tempdir().expect("Failed to create temp dir in test");
  let config = project(dir.path());

  let combined = pipeline::build(&config, BuildOptions::default()).unwrap();
  let first = fs::read_to_string(&combined).unwrap();

  pipeline::build(&config, BuildOptions::default()).unwrap();
  assert_eq!(fs::read_to_string(&combined).unwrap(), first);

  // Assembling the already linked outputs again changes nothing either
  pipeline::build(&config, BuildOptions {
    skip_convert: true,
    ..BuildOptions::default()
  })
  .unwrap();
  assert_eq!(fs::read_to_string(&combined).unwrap(), first);
}

#[test]
fn test_missing_notebook_stops_before_any_conversion() {
  let dir = tempdir().expect("Failed to create temp dir in test");
  let mut config = project(dir.path());
  config
    .notebooks
    .push(NotebookEntry::new("c/missing.ipynb", "missing.html"));
  config.converter = sh_converter(r#"touch "$4/ran"; cp "$5" "$4/$2""#);

  let err = pipeline::build(&config, BuildOptions::default()).unwrap_err();
  assert!(matches!(
    err,
    NbbindError::MissingInput { ref path } if path.ends_with("c/missing.ipynb")
  ));
  assert!(!dir.path().join("a/ran").exists());
  assert!(!dir.path().join("book.html").exists());
}

#[test]
fn test_failed_conversion_names_the_notebook() {
  let dir = tempdir().expect("Failed to create temp dir in test");
  let mut config = project(dir.path());
  config.converter =
    sh_converter(r#"case "$5" in *beta*) exit 3;; esac; cp "$5" "$4/$2""#);

  let err = pipeline::build(&config, BuildOptions::default()).unwrap_err();
  assert!(
    matches!(
      err,
      NbbindError::Conversion { ref input, ref output, ref status }
        if input.ends_with("b/beta.ipynb")
          && output.ends_with("b/beta.html")
          && status.code() == Some(3)
    ),
    "unexpected error: {err}"
  );
  assert!(err.to_string().contains("beta.ipynb"));
  assert!(!dir.path().join("book.html").exists());
}

#[test]
fn test_snapshot_is_written_before_converting() {
  let dir = tempdir().expect("Failed to create temp dir in test");
  let mut config = project(dir.path());
  config.snapshot = SnapshotConfig {
    enable:  true,
    program: "sh".to_string(),
    args:    vec!["-c".to_string(), "echo 'numpy==2.0'".to_string()],
    output:  "requirements.txt".into(),
  };

  pipeline::build(&config, BuildOptions::default()).unwrap();
  assert_eq!(
    fs::read_to_string(dir.path().join("requirements.txt")).unwrap(),
    "numpy==2.0\n"
  );

  fs::remove_file(dir.path().join("requirements.txt")).unwrap();
  pipeline::build(&config, BuildOptions {
    skip_snapshot: true,
    ..BuildOptions::default()
  })
  .unwrap();
  assert!(!dir.path().join("requirements.txt").exists());
}

#[test]
fn test_assemble_files_without_back_link() {
  let dir = tempdir().expect("Failed to create temp dir in test");
  let mut config = project(dir.path());
  config.navigation.back_link = false;
  config.navigation.toc_title = "Index".to_string();

  fs::copy(dir.path().join("b/beta.ipynb"), dir.path().join("b/beta.html"))
    .unwrap();
  let output = pipeline::assemble_files(
    &config,
    &["b/beta.html".into()],
    Path::new("out/only-beta.html"),
  )
  .unwrap();

  let html = fs::read_to_string(output).unwrap();
  assert!(html.contains("<h2>Index</h2>"));
  assert!(!html.contains("back-to-index\""));
  assert!(html.contains(r#"data-source="beta.html""#));
}
