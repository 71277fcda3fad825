use std::io;

use thiserror::Error;

/// Error type for package writing.
#[derive(Debug, Error)]
pub enum EpubError {
  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("Archive error: {0}")]
  Zip(#[from] zip::result::ZipError),

  #[error("XML error: {0}")]
  Xml(#[from] quick_xml::Error),

  #[error("Duplicate package entry: {0}")]
  DuplicateEntry(String),

  #[error("Unsupported media type for {0}")]
  UnsupportedMediaType(String),
}

pub type Result<T> = std::result::Result<T, EpubError>;
