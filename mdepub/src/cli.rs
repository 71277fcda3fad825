use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use clap::{Parser, Subcommand};

/// Command line interface for mdepub
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "mdepub: compile Markdown directories into EPUB books"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to a configuration file (TOML or JSON). Without it, `mdepub.toml`
  /// or `mdepub.json` in the current directory is used when present.
  #[arg(short = 'c', long = "config-file", global = true)]
  pub config_file: Option<PathBuf>,
}

/// All supported subcommands for the mdepub CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Compile a source directory into an EPUB package.
  Compile {
    /// Directory containing Markdown articles, media and metadata.
    source: PathBuf,

    /// Output file. Defaults to the source directory name with `.epub`
    /// appended.
    output: Option<PathBuf>,

    /// Default language of the publication.
    #[arg(short, long)]
    lang: Option<String>,

    /// Title used when the metadata file does not provide one.
    #[arg(short = 'T', long)]
    title: Option<String>,

    /// Keep ASCII quotes, dashes and ellipses as written.
    #[arg(long = "no-typography", action = clap::ArgAction::SetTrue)]
    no_typography: bool,
  },

  /// Initialize a new mdepub configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "mdepub.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

/// Output path used when none is given: the source path without trailing
/// separators, plus `.epub`.
#[must_use]
pub fn default_output(source: &Path) -> PathBuf {
  let source = source.to_string_lossy();
  let trimmed = source.trim_end_matches(['/', MAIN_SEPARATOR]);
  PathBuf::from(format!("{trimmed}.epub"))
}
