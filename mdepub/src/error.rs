use std::{io, path::PathBuf};

use thiserror::Error;

/// Top-level error type for the mdepub crate.
#[derive(Debug, Error)]
pub enum MdepubError {
  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Source directory not found: {}", .0.display())]
  MissingSource(PathBuf),

  #[error("I/O error on {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Malformed front matter in {}: {source}", path.display())]
  FrontMatter {
    path:   PathBuf,
    #[source]
    source: serde_yaml::Error,
  },

  #[error("Malformed metadata file {}: {source}", path.display())]
  Metadata {
    path:   PathBuf,
    #[source]
    source: serde_yaml::Error,
  },

  #[error("Failed to render {}: {source}", path.display())]
  Markup {
    path:   PathBuf,
    #[source]
    source: mdepub_commonmark::MarkupError,
  },

  #[error("Template error: {0}")]
  Template(#[from] tera::Error),

  #[error("Package error: {0}")]
  Package(#[from] mdepub_epub::EpubError),
}

impl MdepubError {
  /// Attach a path to an I/O error.
  pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }
}

pub type Result<T> = std::result::Result<T, MdepubError>;
