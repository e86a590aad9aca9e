use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for nbbind
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "nbbind: bind notebook HTML into one document"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`]). Runs a full build when
  /// omitted.
  #[command(subcommand)]
  pub command: Option<Commands>,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times) Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", action = clap::ArgAction::Append, global = true)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", action = clap::ArgAction::Append, global = true)]
  pub config_overrides: Vec<String>,

  /// Maximum number of concurrent conversions (at most 4).
  #[arg(short = 'p', long = "jobs", global = true)]
  pub jobs: Option<usize>,

  /// Directory notebooks, outputs and the index page are relative to.
  #[arg(long, global = true)]
  pub root: Option<PathBuf>,
}

/// All supported subcommands for the nbbind CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Snapshot packages, convert every notebook and write the combined
  /// document.
  Build {
    /// Assemble the HTML files of a previous run without converting.
    #[arg(long)]
    skip_convert: bool,

    /// Do not write the package snapshot.
    #[arg(long)]
    skip_snapshot: bool,
  },

  /// Combine existing HTML files into one document.
  Assemble {
    /// HTML files in the order they should appear.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Combined document to write. Defaults to the configured output.
    #[arg(short, long)]
    output: Option<PathBuf>,
  },

  /// Initialize a new nbbind configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "nbbind.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Export the built-in stylesheets to a directory for customization.
  Export {
    /// Output directory for stylesheet files.
    #[arg(short, long, default_value = "styles")]
    output_dir: PathBuf,

    /// Whether to overwrite existing files.
    #[arg(long)]
    force: bool,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// `KEY=VALUE` overrides for the flags that mirror configuration keys,
  /// followed by the explicit `--config` overrides.
  #[must_use]
  pub fn overrides(&self) -> Vec<String> {
    let mut overrides = Vec::new();
    if let Some(ref root) = self.root {
      overrides.push(format!("root={}", root.display()));
    }
    if let Some(jobs) = self.jobs {
      overrides.push(format!("jobs={jobs}"));
    }
    overrides.extend(self.config_overrides.iter().cloned());
    overrides
  }
}
