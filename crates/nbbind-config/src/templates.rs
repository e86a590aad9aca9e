use std::fmt;

use crate::config::Config;

/// Error type for template operations.
#[derive(Debug)]
pub enum TemplateError {
  /// The requested configuration format is not supported.
  UnsupportedFormat(String),

  /// The default configuration could not be serialized.
  Serialize(String),
}

impl fmt::Display for TemplateError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::UnsupportedFormat(format) => {
        write!(f, "Unsupported config format: {format}")
      },
      Self::Serialize(e) => write!(f, "Failed to serialize config: {e}"),
    }
  }
}

impl std::error::Error for TemplateError {}

/// Default configuration in TOML, with comments for every field.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# nbbind configuration file

# Directory everything else is relative to (defaults to the current directory)
# root = "."

# Combined document, relative to the root
combined_output = "polygon_ratio_all.html"

# Page the "Back to index" links point at, relative to the root
index_page = "index.html"

# Maximum number of concurrent conversions (capped at 4)
# jobs = 2

# Notebooks to convert, in the order they appear in the combined document.
# The HTML file is written next to its notebook. When several config files
# are merged, the last one that lists notebooks decides the whole list.
[[notebooks]]
input = "polygon_ratio_geometry/polygon_ratio_problem.ipynb"
output = "polygon_ratio_problem.html"

[[notebooks]]
input = "pysym/pysym_polygon_ratio_Wu_and_Groebner.ipynb"
output = "pysym_polygon_ratio_Wu_and_Groebner.html"

[[notebooks]]
input = "newclid_methods/newclid_polygon_ratio.ipynb"
output = "newclid_polygon_ratio.html"

[converter]
# Invoked as: program args... --output NAME --output-dir DIR INPUT
program = "python3"
args = ["-m", "jupyter", "nbconvert", "--to", "html"]

[snapshot]
# Write the installed package list before converting
enable = true
program = "python3"
args = ["-m", "pip", "list", "--not-required", "--format=freeze"]
output = "requirements.txt"

[navigation]
# Headings containing this word become table of contents entries
section_marker = "Part"

# Page break before every section heading except the first of a document
page_breaks = true

# Heading of the generated table of contents
toc_title = "Contents"

# Inject the floating "Back to index" link
back_link = true

# Replace the built-in stylesheet of the combined document
# stylesheet = "styles/combined.css"
"#;

/// Get the default configuration for `format` (`toml` or `json`).
///
/// # Errors
///
/// Returns an error if the format is unsupported.
pub fn get_template(format: &str) -> Result<String, TemplateError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE.to_string()),
    "json" => {
      let config = Config {
        notebooks: Config::default_notebooks(),
        ..Config::default()
      };
      serde_json::to_string_pretty(&config)
        .map_err(|e| TemplateError::Serialize(e.to_string()))
    },
    other => Err(TemplateError::UnsupportedFormat(other.to_string())),
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn toml_template_parses_to_defaults() {
    let parsed: Config = toml::from_str(DEFAULT_TOML_TEMPLATE).unwrap();
    assert_eq!(parsed.notebooks, Config::default_notebooks());
    assert_eq!(parsed.converter, Config::default().converter);
    assert_eq!(parsed.snapshot, Config::default().snapshot);
    assert_eq!(parsed.navigation, Config::default().navigation);
  }

  #[test]
  fn json_template_roundtrips() {
    let json = get_template("json").unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.notebooks.len(), 3);
  }

  #[test]
  fn unknown_format_is_rejected() {
    assert!(matches!(
      get_template("yaml"),
      Err(TemplateError::UnsupportedFormat(_))
    ));
  }
}
