pub mod templates;

use std::{
  fs,
  path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
  cli::{Cli, Commands},
  error::{MdepubError, Result},
};

fn default_lang() -> String {
  "en".to_string()
}

fn default_title() -> String {
  "Untitled".to_string()
}

fn default_toc_title() -> String {
  "Contents".to_string()
}

fn default_metadata_files() -> Vec<String> {
  vec![
    "metadata.yaml".to_string(),
    "metadata.yml".to_string(),
    "metadata.json".to_string(),
  ]
}

fn default_markdown_extensions() -> Vec<String> {
  vec![".md".to_string(), ".mdown".to_string(), ".markdown".to_string()]
}

fn default_cover_files() -> Vec<String> {
  ["cover.png", "cover.svg", "cover.jpeg", "cover.jpg", "cover.gif"]
    .map(String::from)
    .to_vec()
}

fn default_stylesheet() -> String {
  "style.css".to_string()
}

const fn default_true() -> bool {
  true
}

/// Configuration options for mdepub
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
  /// Default language of the publication and its pages
  #[serde(default = "default_lang")]
  pub lang: String,

  /// Title used when the metadata file has none
  #[serde(default = "default_title")]
  pub title: String,

  /// Title of the synthesized table of contents page
  #[serde(default = "default_toc_title")]
  pub toc_title: String,

  /// Candidate publication description files, relative to the source root,
  /// in priority order
  #[serde(default = "default_metadata_files")]
  pub metadata_files: Vec<String>,

  /// Extensions (with leading dot) of Markdown articles
  #[serde(default = "default_markdown_extensions")]
  pub markdown_extensions: Vec<String>,

  /// Root-relative paths that can serve as the cover image
  #[serde(default = "default_cover_files")]
  pub cover_files: Vec<String>,

  /// Global stylesheet at the source root
  #[serde(default = "default_stylesheet")]
  pub stylesheet: String,

  /// Whether to apply typographic substitutions to article text
  #[serde(default = "default_true")]
  pub typography: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      lang:                default_lang(),
      title:               default_title(),
      toc_title:           default_toc_title(),
      metadata_files:      default_metadata_files(),
      markdown_extensions: default_markdown_extensions(),
      cover_files:         default_cover_files(),
      stylesheet:          default_stylesheet(),
      typography:          true,
    }
  }
}

impl Config {
  /// Create a new configuration from a file
  /// Only TOML and JSON are supported.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if its
  /// extension is neither `toml` nor `json`.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    let content =
      fs::read_to_string(path).map_err(|e| MdepubError::io(path, e))?;

    let ext = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase)
      .ok_or_else(|| {
        MdepubError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        ))
      })?;

    let config: Self = match ext.as_str() {
      "json" => {
        serde_json::from_str(&content).map_err(|e| {
          MdepubError::Config(format!(
            "Failed to parse JSON config from {}: {e}",
            path.display()
          ))
        })?
      },
      "toml" => {
        toml::from_str(&content).map_err(|e| {
          MdepubError::Config(format!(
            "Failed to parse TOML config from {}: {e}",
            path.display()
          ))
        })?
      },
      _ => {
        return Err(MdepubError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )));
      },
    };
    config.validate()?;
    Ok(config)
  }

  /// Load config from file and CLI arguments
  ///
  /// # Errors
  ///
  /// Returns an error if an explicit or discovered config file is invalid,
  /// or if the merged configuration is not usable.
  pub fn load(cli: &Cli) -> Result<Self> {
    let mut config = if let Some(config_path) = &cli.config_file {
      Self::from_file(config_path)?
    } else if let Some(discovered_config) = Self::find_config_file() {
      log::info!(
        "Using discovered config file: {}",
        discovered_config.display()
      );
      Self::from_file(&discovered_config)?
    } else {
      Self::default()
    };

    config.merge_with_cli(cli);
    config.validate()?;
    Ok(config)
  }

  /// Apply command line overrides.
  pub fn merge_with_cli(&mut self, cli: &Cli) {
    if let Commands::Compile {
      lang,
      title,
      no_typography,
      ..
    } = &cli.command
    {
      if let Some(lang) = lang {
        self.lang.clone_from(lang);
      }
      if let Some(title) = title {
        self.title.clone_from(title);
      }
      if *no_typography {
        self.typography = false;
      }
    }
  }

  /// Look for a config file in the current directory.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    ["mdepub.toml", "mdepub.json"]
      .iter()
      .map(|filename| current_dir.join(filename))
      .find(|path| path.is_file())
  }

  /// Check the invariants the compiler relies on.
  ///
  /// # Errors
  ///
  /// Returns an error naming the first offending field.
  pub fn validate(&self) -> Result<()> {
    if self.lang.trim().is_empty() {
      return Err(MdepubError::Config("`lang` must not be empty".into()));
    }
    if self.title.trim().is_empty() {
      return Err(MdepubError::Config("`title` must not be empty".into()));
    }
    if let Some(ext) = self
      .markdown_extensions
      .iter()
      .find(|ext| !ext.starts_with('.') || ext.len() < 2)
    {
      return Err(MdepubError::Config(format!(
        "Markdown extension {ext:?} must start with a dot"
      )));
    }
    Ok(())
  }

  /// Whether `path` has one of the configured Markdown extensions.
  #[must_use]
  pub fn is_markdown(&self, path: &Path) -> bool {
    path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| {
        self
          .markdown_extensions
          .iter()
          .any(|known| {
            known.strip_prefix('.').unwrap_or(known).eq_ignore_ascii_case(ext)
          })
      })
  }

  /// Whether the root-relative path names a metadata description file.
  #[must_use]
  pub fn is_metadata_file(&self, relative: &str) -> bool {
    matches_any(relative, &self.metadata_files)
  }

  /// Whether the root-relative path names a cover image candidate.
  #[must_use]
  pub fn is_cover_file(&self, relative: &str) -> bool {
    matches_any(relative, &self.cover_files)
  }

  /// Generate a default configuration file in the given format.
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported or the file cannot be
  /// written.
  pub fn generate_default_config(format: &str, path: &Path) -> Result<()> {
    let config_content = templates::get_template(format)
      .map_err(|e| MdepubError::Config(e.to_string()))?;

    fs::write(path, config_content).map_err(|e| MdepubError::io(path, e))?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

fn matches_any(relative: &str, names: &[String]) -> bool {
  names.iter().any(|name| name.eq_ignore_ascii_case(relative))
}
