use std::fs;

use color_eyre::eyre::{Context, Result, bail};
use log::{LevelFilter, info};
use mdepub::{
  cli::{Cli, Commands, default_output},
  compile,
  config::Config,
};

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

  match &cli.command {
    Commands::Init {
      output,
      format,
      force,
    } => {
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
      Ok(())
    },

    Commands::Compile { source, output, .. } => {
      let config = Config::load(&cli).wrap_err("Failed to load configuration")?;
      let output = output.clone().unwrap_or_else(|| default_output(source));

      info!("Compiling {} into {}", source.display(), output.display());
      compile(source, &output, &config).wrap_err_with(|| {
        format!("Failed to compile {}", source.display())
      })
    },
  }
}
