use std::fmt;

/// Error type for template operations.
#[derive(Debug)]
pub enum TemplateError {
  /// Indicates that the requested configuration format is not supported.
  /// Contains the name of the unsupported format.
  UnsupportedFormat(String),
}

impl fmt::Display for TemplateError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::UnsupportedFormat(format) => {
        write!(f, "Unsupported config format: {format}")
      },
    }
  }
}

impl std::error::Error for TemplateError {}

/// Default configuration in TOML, with every field commented.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# mdepub configuration file

# Language of the publication and of every page without its own `lang`
lang = "en"

# Title used when the metadata file does not provide one
title = "Untitled"

# Title of the generated table of contents page
toc_title = "Contents"

# Publication description files, relative to the source directory. The first
# one found is used.
metadata_files = ["metadata.yaml", "metadata.yml", "metadata.json"]

# Extensions of files rendered as Markdown articles
markdown_extensions = [".md", ".mdown", ".markdown"]

# Files that can serve as the cover image. The first one met while walking the
# source directory becomes the cover.
cover_files = ["cover.png", "cover.svg", "cover.jpeg", "cover.jpg", "cover.gif"]

# Global stylesheet at the root of the source directory, linked from every
# page when present
stylesheet = "style.css"

# Curly quotes, dashes, ellipses and (c)/(r)/(tm) signs in article text
typography = true
"#;

/// Default configuration in JSON.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "lang": "en",
  "title": "Untitled",
  "toc_title": "Contents",
  "metadata_files": ["metadata.yaml", "metadata.yml", "metadata.json"],
  "markdown_extensions": [".md", ".mdown", ".markdown"],
  "cover_files": ["cover.png", "cover.svg", "cover.jpeg", "cover.jpg", "cover.gif"],
  "stylesheet": "style.css",
  "typography": true
}
"#;

/// Default configuration file contents for `format` (`toml` or `json`).
///
/// # Errors
///
/// Returns [`TemplateError::UnsupportedFormat`] for any other format.
pub fn get_template(format: &str) -> Result<&'static str, TemplateError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(TemplateError::UnsupportedFormat(format.to_string())),
  }
}
