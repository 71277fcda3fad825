//! Resource classification: how a package entry takes part in the reading
//! order, which manifest properties it carries, and its media type.
use std::{fmt, path::Path};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

/// Media type of every content document in the package.
pub const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";

/// Bytes left as they are inside a path segment of an href.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
  .remove(b'-')
  .remove(b'.')
  .remove(b'_')
  .remove(b'~');

/// How a resource participates in the publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
  /// Content document in the linear reading order.
  Primary,
  /// Content document outside the linear reading order (`linear="no"`).
  Auxiliary,
  /// Anything that is not a content document: images, styles, fonts.
  Media,
}

impl ContentType {
  /// Whether the resource gets a spine entry.
  #[must_use]
  pub const fn in_spine(self) -> bool {
    matches!(self, Self::Primary | Self::Auxiliary)
  }
}

/// Manifest item property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
  /// The navigation document.
  Nav,
  /// The publication cover image.
  CoverImage,
  /// Any other EPUB manifest property, written verbatim.
  Other(String),
}

impl Property {
  /// Map a property name as declared in source front matter onto the
  /// writer's vocabulary.
  #[must_use]
  pub fn from_declared(name: &str) -> Self {
    match name.trim().to_ascii_lowercase().as_str() {
      "nav" => Self::Nav,
      "cover-image" | "cover" => Self::CoverImage,
      _ => Self::Other(name.trim().to_string()),
    }
  }

  /// Manifest spelling of the property.
  #[must_use]
  pub fn as_str(&self) -> &str {
    match self {
      Self::Nav => "nav",
      Self::CoverImage => "cover-image",
      Self::Other(name) => name,
    }
  }
}

impl fmt::Display for Property {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Media type for a file by extension, `None` when the package does not
/// carry files of that kind.
#[must_use]
pub fn media_type(path: &Path) -> Option<&'static str> {
  let ext = path.extension()?.to_str()?.to_ascii_lowercase();
  let media_type = match ext.as_str() {
    "xhtml" => XHTML_MEDIA_TYPE,
    "png" => "image/png",
    "jpg" | "jpe" | "jpeg" => "image/jpeg",
    "gif" => "image/gif",
    "svg" => "image/svg+xml",
    "mp3" => "audio/mpeg",
    "aac" | "m4a" | "m4b" | "m4p" | "m4r" => "audio/mp4",
    "mp4" | "m4v" => "video/mp4",
    "css" => "text/css",
    "js" | "javascript" => "application/javascript",
    "json" => "application/json",
    "otf" => "font/otf",
    "woff" => "font/woff",
    "smil" | "smi" | "sml" => "application/smil+xml",
    "pls" => "application/pls+xml",
    _ => return None,
  };
  Some(media_type)
}

/// URL reference to the package entry `name`, with each `/`-separated
/// segment percent-encoded.
///
/// ```
/// assert_eq!(mdepub_epub::href("my pics/a&b.png"), "my%20pics/a%26b.png");
/// ```
#[must_use]
pub fn href(name: &str) -> String {
  name
    .split('/')
    .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
    .collect::<Vec<_>>()
    .join("/")
}
