use std::fs;

use color_eyre::eyre::{Context, Result, bail};
use log::{LevelFilter, info};
use nbbind::{
  cli::{Cli, Commands},
  pipeline::{self, BuildOptions},
};
use nbbind_config::Config;

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  // Commands that do not need a loaded configuration
  match &cli.command {
    Some(Commands::Init {
      output,
      format,
      force,
    }) => {
      if output.exists() && !force {
        bail!(
          "Configuration file already exists: {}. Use --force to overwrite.",
          output.display()
        );
      }

      if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
          fs::create_dir_all(parent).wrap_err_with(|| {
            format!("Failed to create directory: {}", parent.display())
          })?;
          info!("Created directory: {}", parent.display());
        }
      }

      Config::generate_default_config(format, output).wrap_err_with(|| {
        format!(
          "Failed to generate configuration file: {}",
          output.display()
        )
      })?;
      return Ok(());
    },

    Some(Commands::Export { output_dir, force }) => {
      Config::export_stylesheets(output_dir, *force).wrap_err_with(|| {
        format!("Failed to export stylesheets to {}", output_dir.display())
      })?;
      return Ok(());
    },

    _ => {},
  }

  let config = Config::load(&cli.config_files, &cli.overrides())
    .wrap_err("Failed to load configuration")?;

  match cli.command {
    Some(Commands::Assemble { inputs, output }) => {
      let output = output.unwrap_or_else(|| config.combined_output.clone());
      pipeline::assemble_files(&config, &inputs, &output).wrap_err_with(
        || format!("Failed to assemble {}", output.display()),
      )?;
    },

    Some(Commands::Build {
      skip_convert,
      skip_snapshot,
    }) => {
      pipeline::build(&config, BuildOptions {
        skip_snapshot,
        skip_convert,
      })
      .wrap_err("Build failed")?;
    },

    _ => {
      pipeline::build(&config, BuildOptions::default())
        .wrap_err("Build failed")?;
    },
  }

  Ok(())
}
