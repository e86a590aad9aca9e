use std::{
  fs,
  path::{Path, PathBuf},
  sync::OnceLock,
};

use serde::{Deserialize, Serialize};

use crate::{
  converter::ConverterConfig,
  error::ConfigError,
  navigation::NavigationConfig,
  snapshot::SnapshotConfig,
};

/// Upper bound on concurrent conversions, whatever `jobs` says.
pub const MAX_JOBS: usize = 4;

/// A notebook to convert and the name of the HTML file to produce next to
/// it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotebookEntry {
  /// Notebook path, relative to the root directory.
  pub input: PathBuf,

  /// File name of the generated HTML document.
  pub output: String,
}

impl NotebookEntry {
  #[must_use]
  pub fn new(input: impl Into<PathBuf>, output: impl Into<String>) -> Self {
    Self {
      input:  input.into(),
      output: output.into(),
    }
  }
}

/// Configuration for nbbind.
///
/// [`Config`] holds everything the build needs: which notebooks to convert
/// and in what order, how to invoke the converter and the package snapshot,
/// where the combined document goes and how its navigation looks. Fields are
/// typically loaded from a TOML or JSON file, then adjusted by CLI flags and
/// `--config KEY=VALUE` overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
  /// Directory all other paths are relative to. Defaults to the current
  /// directory.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub root: Option<PathBuf>,

  /// Notebooks in combined-document order. Empty means the built-in list.
  pub notebooks: Vec<NotebookEntry>,

  /// Combined document path, relative to the root.
  pub combined_output: PathBuf,

  /// Target of the "Back to index" links, relative to the root.
  pub index_page: PathBuf,

  /// Maximum number of concurrent conversions.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub jobs: Option<usize>,

  /// External notebook converter.
  pub converter: ConverterConfig,

  /// Installed package snapshot.
  pub snapshot: SnapshotConfig,

  /// Navigation and layout of the combined document.
  pub navigation: NavigationConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      root:            None,
      notebooks:       Vec::new(),
      combined_output: PathBuf::from("polygon_ratio_all.html"),
      index_page:      PathBuf::from("index.html"),
      jobs:            None,
      converter:       ConverterConfig::default(),
      snapshot:        SnapshotConfig::default(),
      navigation:      NavigationConfig::default(),
    }
  }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" | "on" => Ok(true),
    "false" | "no" | "0" | "off" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean for '{key}': '{value}'"
      )))
    },
  }
}

fn parse_list(value: &str) -> Vec<String> {
  value.split_whitespace().map(String::from).collect()
}

impl Config {
  /// The notebook list used when no configuration names any.
  #[must_use]
  pub fn default_notebooks() -> Vec<NotebookEntry> {
    vec![
      NotebookEntry::new(
        "polygon_ratio_geometry/polygon_ratio_problem.ipynb",
        "polygon_ratio_problem.html",
      ),
      NotebookEntry::new(
        "pysym/pysym_polygon_ratio_Wu_and_Groebner.ipynb",
        "pysym_polygon_ratio_Wu_and_Groebner.html",
      ),
      NotebookEntry::new(
        "newclid_methods/newclid_polygon_ratio.ipynb",
        "newclid_polygon_ratio.html",
      ),
    ]
  }

  /// Notebooks to convert: the configured ones, or the built-in list.
  #[must_use]
  pub fn effective_notebooks(&self) -> Vec<NotebookEntry> {
    if self.notebooks.is_empty() {
      Self::default_notebooks()
    } else {
      self.notebooks.clone()
    }
  }

  /// Root directory: the configured one, else the current directory.
  #[must_use]
  pub fn root_dir(&self) -> PathBuf {
    self.root.clone().unwrap_or_else(|| {
      std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    })
  }

  /// Resolve a root-relative path. Absolute paths are returned as-is.
  #[must_use]
  pub fn resolve(&self, path: &Path) -> PathBuf {
    self.root_dir().join(path)
  }

  /// Number of worker threads for conversions: `jobs` (or the available
  /// parallelism), clamped to `1..=MAX_JOBS`.
  #[must_use]
  pub fn worker_count(&self, available: usize) -> usize {
    self.jobs.unwrap_or(available).clamp(1, MAX_JOBS)
  }

  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format
  /// is unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
      Some(ext) => {
        match ext.to_lowercase().as_str() {
          "json" => {
            serde_json::from_str(&content).map_err(|e| {
              ConfigError::Config(format!(
                "Failed to parse JSON config from {}: {}",
                path.display(),
                e
              ))
            })
          },
          "toml" => {
            toml::from_str(&content).map_err(|e| {
              ConfigError::Config(format!(
                "Failed to parse TOML config from {}: {}",
                path.display(),
                e
              ))
            })
          },
          _ => {
            Err(ConfigError::Config(format!(
              "Unsupported config file format: {}",
              path.display()
            )))
          },
        }
      },
      None => {
        Err(ConfigError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from explicit files (merged in order), else from a
  /// discovered file, else defaults; then apply `KEY=VALUE` overrides and
  /// validate.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded, an override is malformed,
  /// or validation fails.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged_config = Self::from_file(first)?;

      for config_path in rest {
        merged_config.merge(Self::from_file(config_path)?);
      }

      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }

      merged_config
    } else if let Some(discovered_config) = Self::find_config_file() {
      log::info!(
        "Using discovered config file: {}",
        discovered_config.display()
      );
      Self::from_file(&discovered_config)?
    } else {
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    config.validate()?;

    Ok(config)
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// # Errors
  ///
  /// Returns an error if an override is not in KEY=VALUE format, the key is
  /// unknown, or the value cannot be parsed.
  ///
  /// # Example
  ///
  /// ```rust, ignore
  /// config.apply_overrides(&vec![
  ///     "navigation.page_breaks=false".to_string(),
  ///     "combined_output=book.html".to_string(),
  /// ])?;
  /// ```
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a single override. List values (`*.args`) are whitespace
  /// separated.
  ///
  /// # Errors
  ///
  /// Returns an error for unknown keys or unparsable values.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "root" => self.root = Some(PathBuf::from(value)),
      "combined_output" => self.combined_output = PathBuf::from(value),
      "index_page" => self.index_page = PathBuf::from(value),
      "jobs" => {
        self.jobs = Some(value.parse().map_err(|e| {
          ConfigError::Config(format!("Invalid value for 'jobs': {e}"))
        })?);
      },
      "converter.program" => self.converter.program = value.to_string(),
      "converter.args" => self.converter.args = parse_list(value),
      "snapshot.enable" => self.snapshot.enable = parse_bool(key, value)?,
      "snapshot.program" => self.snapshot.program = value.to_string(),
      "snapshot.args" => self.snapshot.args = parse_list(value),
      "snapshot.output" => self.snapshot.output = PathBuf::from(value),
      "navigation.section_marker" => {
        self.navigation.section_marker = value.to_string();
      },
      "navigation.page_breaks" => {
        self.navigation.page_breaks = parse_bool(key, value)?;
      },
      "navigation.toc_title" => self.navigation.toc_title = value.to_string(),
      "navigation.back_link" => {
        self.navigation.back_link = parse_bool(key, value)?;
      },
      "navigation.stylesheet" => {
        self.navigation.stylesheet =
          (!value.is_empty()).then(|| PathBuf::from(value));
      },
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'"
        )));
      },
    }

    Ok(())
  }

  /// Merge another config into this one, with the other config's values
  /// taking precedence.
  ///
  /// # Merge Rules
  ///
  /// - [`Option<T>`] fields: other's [`Some`] value replaces this config's
  /// - `notebooks`: a non-empty list replaces this config's list as a whole
  /// - Plain and nested fields: other's value replaces this one unless it is
  ///   still the default
  pub fn merge(&mut self, other: Self) {
    let defaults = Self::default();

    if other.root.is_some() {
      self.root = other.root;
    }
    if other.jobs.is_some() {
      self.jobs = other.jobs;
    }

    if !other.notebooks.is_empty() {
      self.notebooks = other.notebooks;
    }

    if other.combined_output != defaults.combined_output {
      self.combined_output = other.combined_output;
    }
    if other.index_page != defaults.index_page {
      self.index_page = other.index_page;
    }
    if other.converter != defaults.converter {
      self.converter = other.converter;
    }
    if other.snapshot != defaults.snapshot {
      self.snapshot = other.snapshot;
    }
    if other.navigation != defaults.navigation {
      self.navigation = other.navigation;
    }
  }

  /// Search for config files in common locations
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    static RESULT: OnceLock<Option<PathBuf>> = OnceLock::new();
    RESULT
      .get_or_init(|| {
        let config_filenames = [
          "nbbind.toml",
          "nbbind.json",
          ".nbbind.toml",
          ".nbbind.json",
          ".config/nbbind.toml",
          ".config/nbbind.json",
        ];

        let current_dir = std::env::current_dir().ok()?;
        config_filenames
          .iter()
          .map(|filename| current_dir.join(filename))
          .find(|path| path.exists())
      })
      .clone()
  }

  /// Check the configuration for values that can never work.
  ///
  /// Paths of notebooks are not checked here: a missing notebook is reported
  /// by the build, before any conversion starts.
  ///
  /// # Errors
  ///
  /// Returns an error listing every problem found.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    for (index, entry) in self.notebooks.iter().enumerate() {
      if entry.input.as_os_str().is_empty() {
        errors.push(format!("Notebook {} has an empty input path", index + 1));
      }
      if entry.output.is_empty()
        || Path::new(&entry.output).file_name().is_none()
        || entry.output.contains(['/', '\\'])
      {
        errors.push(format!(
          "Notebook {} output must be a plain file name, got '{}'",
          index + 1,
          entry.output
        ));
      }
    }

    if self.combined_output.as_os_str().is_empty() {
      errors.push("combined_output must not be empty".to_string());
    }

    if self.converter.program.trim().is_empty() {
      errors.push("converter.program must not be empty".to_string());
    }

    if self.snapshot.enable && self.snapshot.program.trim().is_empty() {
      errors.push("snapshot.program must not be empty".to_string());
    }

    if self.jobs == Some(0) {
      errors.push("jobs must be at least 1".to_string());
    }

    if let Some(ref stylesheet) = self.navigation.stylesheet {
      let stylesheet = self.resolve(stylesheet);
      if !stylesheet.is_file() {
        errors.push(format!(
          "Stylesheet file does not exist: {}",
          stylesheet.display()
        ));
      }
    }

    if !errors.is_empty() {
      let error_message = errors.join("\n");
      return Err(ConfigError::Config(format!(
        "Configuration validation errors:\n{error_message}"
      )));
    }

    Ok(())
  }

  /// Generate a default configuration file with commented explanations
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = crate::templates::get_template(format)
      .map_err(|e| ConfigError::Template(e.to_string()))?;

    fs::write(path, config_content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }

  /// Export the embedded stylesheets to a directory for customization.
  ///
  /// Existing files are skipped unless `force` is set.
  ///
  /// # Errors
  ///
  /// Returns an error if the directory cannot be created or a file cannot
  /// be written.
  pub fn export_stylesheets(
    output_dir: &Path,
    force: bool,
  ) -> Result<(), ConfigError> {
    fs::create_dir_all(output_dir).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to create stylesheet directory: {}: {}",
        output_dir.display(),
        e
      ))
    })?;

    let mut templates: Vec<_> =
      nbbind_templates::all_templates().into_iter().collect();
    templates.sort_unstable_by_key(|(name, _)| *name);

    for (filename, content) in templates {
      let file_path = output_dir.join(filename);

      if file_path.exists() && !force {
        log::warn!(
          "File {} already exists. Use --force to overwrite.",
          file_path.display()
        );
        continue;
      }

      fs::write(&file_path, content).map_err(|e| {
        ConfigError::Config(format!(
          "Failed to write stylesheet: {}: {}",
          file_path.display(),
          e
        ))
      })?;
      log::info!("Exported stylesheet: {}", file_path.display());
    }

    Ok(())
  }
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
  fn test_effective_notebooks_fall_back_to_builtin_list() {
    let config = Config::default();
    let notebooks = config.effective_notebooks();
    assert_eq!(notebooks.len(), 3);
    assert_eq!(notebooks[0].output, "polygon_ratio_problem.html");

    let mut config = Config::default();
    config.notebooks = vec![NotebookEntry::new("a.ipynb", "a.html")];
    assert_eq!(config.effective_notebooks(), config.notebooks);
  }

  #[test]
  fn test_worker_count_is_capped() {
    let mut config = Config::default();
    assert_eq!(config.worker_count(16), 4);
    assert_eq!(config.worker_count(2), 2);
    assert_eq!(config.worker_count(0), 1);
    config.jobs = Some(3);
    assert_eq!(config.worker_count(16), 3);
    config.jobs = Some(64);
    assert_eq!(config.worker_count(1), 4);
  }

  #[test]
  fn test_config_merge_replaces_notebooks_and_set_fields() {
    let mut base = Config::default();
    base.notebooks = vec![NotebookEntry::new("a.ipynb", "a.html")];
    base.combined_output = PathBuf::from("base.html");
    base.jobs = Some(2);

    let mut other = Config::default();
    other.notebooks = vec![NotebookEntry::new("b.ipynb", "b.html")];
    other.navigation.section_marker = "Chapter".to_string();

    base.merge(other);

    assert_eq!(base.notebooks, [NotebookEntry::new("b.ipynb", "b.html")]);
    // Defaults in the later file do not clobber earlier values
    assert_eq!(base.combined_output, PathBuf::from("base.html"));
    assert_eq!(base.jobs, Some(2));
    assert_eq!(base.navigation.section_marker, "Chapter");
  }

  #[test]
  fn test_merging_files_with_the_same_notebooks_does_not_duplicate_them() {
    let dir = tempfile::tempdir().unwrap();
    let notebooks = "[[notebooks]]\ninput = \"a/a.ipynb\"\noutput = \
                     \"a.html\"\n[[notebooks]]\ninput = \"b/b.ipynb\"\noutput \
                     = \"b.html\"\n";
    let first = dir.path().join("first.toml");
    let second = dir.path().join("second.toml");
    let third = dir.path().join("third.toml");
    fs::write(&first, notebooks).unwrap();
    fs::write(&second, notebooks).unwrap();
    fs::write(&third, "jobs = 1\n").unwrap();

    let config = Config::load(&[first, second, third], &[]).unwrap();
    assert_eq!(config.notebooks, [
      NotebookEntry::new("a/a.ipynb", "a.html"),
      NotebookEntry::new("b/b.ipynb", "b.html"),
    ]);
    assert_eq!(config.jobs, Some(1));
  }

  #[test]
  fn test_apply_overrides() {
    let mut config = Config::default();
    config
      .apply_overrides(&[
        "navigation.page_breaks=false".to_string(),
        "jobs = 2".to_string(),
        "converter.args=-m nbconvert --to html".to_string(),
        "navigation.toc_title=Table of Contents".to_string(),
      ])
      .unwrap();

    assert!(!config.navigation.page_breaks);
    assert_eq!(config.jobs, Some(2));
    assert_eq!(config.converter.args, ["-m", "nbconvert", "--to", "html"]);
    assert_eq!(config.navigation.toc_title, "Table of Contents");
  }

  #[test]
  fn test_invalid_overrides_are_rejected() {
    let mut config = Config::default();
    assert!(config.apply_overrides(&["no-equals".to_string()]).is_err());
    assert!(config.apply_override("unknown.key", "1").is_err());
    assert!(config.apply_override("snapshot.enable", "maybe").is_err());
    assert!(config.apply_override("jobs", "many").is_err());
  }

  #[test]
  fn test_validate_rejects_paths_as_output_names() {
    let mut config = Config::default();
    config.notebooks = vec![NotebookEntry::new("a.ipynb", "out/a.html")];
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("plain file name"));

    config.notebooks = vec![NotebookEntry::new("a.ipynb", "a.html")];
    config.jobs = Some(0);
    assert!(config.validate().is_err());
  }

  #[test]
  fn test_from_file_toml_and_json() {
    let dir = tempfile::tempdir().unwrap();

    let toml_path = dir.path().join("nbbind.toml");
    fs::write(
      &toml_path,
      "combined_output = \"book.html\"\n[[notebooks]]\ninput = \
       \"x/a.ipynb\"\noutput = \"a.html\"\n[navigation]\npage_breaks = \
       false\n",
    )
    .unwrap();
    let config = Config::from_file(&toml_path).unwrap();
    assert_eq!(config.combined_output, PathBuf::from("book.html"));
    assert_eq!(config.notebooks, [NotebookEntry::new("x/a.ipynb", "a.html")]);
    assert!(!config.navigation.page_breaks);
    assert_eq!(config.navigation.toc_title, "Contents");

    let json_path = dir.path().join("nbbind.json");
    fs::write(&json_path, r#"{"jobs": 3, "snapshot": {"enable": false}}"#)
      .unwrap();
    let config = Config::from_file(&json_path).unwrap();
    assert_eq!(config.jobs, Some(3));
    assert!(!config.snapshot.enable);
    assert_eq!(config.snapshot.output, PathBuf::from("requirements.txt"));

    let yaml_path = dir.path().join("nbbind.yaml");
    fs::write(&yaml_path, "jobs: 3").unwrap();
    assert!(Config::from_file(&yaml_path).is_err());
  }

  #[test]
  fn test_load_merges_files_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.toml");
    let second = dir.path().join("second.toml");
    fs::write(&first, "index_page = \"home.html\"\n").unwrap();
    fs::write(&second, "combined_output = \"all.html\"\n").unwrap();

    let config = Config::load(&[first, second], &[
      "snapshot.enable=no".to_string(),
    ])
    .unwrap();
    assert_eq!(config.index_page, PathBuf::from("home.html"));
    assert_eq!(config.combined_output, PathBuf::from("all.html"));
    assert!(!config.snapshot.enable);
  }

  #[test]
  fn test_export_stylesheets_respects_force() {
    let dir = tempfile::tempdir().unwrap();
    let existing = dir.path().join("combined.css");
    fs::write(&existing, "custom").unwrap();

    Config::export_stylesheets(dir.path(), false).unwrap();
    assert_eq!(fs::read_to_string(&existing).unwrap(), "custom");
    assert!(dir.path().join("back-to-index.css").exists());

    Config::export_stylesheets(dir.path(), true).unwrap();
    assert_ne!(fs::read_to_string(&existing).unwrap(), "custom");
  }
}
