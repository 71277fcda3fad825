//! The compiler: walks a source directory and streams every article and
//! media file into one EPUB package.
mod content;
mod media;

use std::{
  io::Write,
  path::{Path, PathBuf},
};

use log::{debug, info};
use mdepub_commonmark::{MarkdownOptions, MarkdownProcessor};
use mdepub_epub::{ContentType, Property, Writer};
use walkdir::{DirEntry, WalkDir};

use crate::{
  config::Config,
  error::{MdepubError, Result},
  metadata::load_metadata,
  nav::Navigation,
  template::Templates,
};

/// Declaration written at the top of every content document.
const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Package name of the synthesized table of contents.
pub const TOC_NAME: &str = "_toc.xhtml";

/// Compile `source_dir` into an EPUB package at `output`.
///
/// Nothing is written to `output` unless the whole run succeeds.
///
/// # Errors
///
/// Returns an error if the source directory is missing, the metadata file
/// is malformed, an article fails to parse or render, or the package cannot
/// be written.
pub fn compile(source_dir: &Path, output: &Path, config: &Config) -> Result<()> {
  if !source_dir.is_dir() {
    return Err(MdepubError::MissingSource(source_dir.to_path_buf()));
  }

  let metadata = load_metadata(source_dir, config)?;
  let templates = Templates::new()?;
  let mut writer = Writer::create(output)?;
  let lang = metadata
    .primary_language()
    .unwrap_or(config.lang.as_str())
    .to_string();
  writer.metadata = metadata;

  let stylesheet = source_dir
    .join(&config.stylesheet)
    .is_file()
    .then(|| config.stylesheet.replace('\\', "/"));
  if stylesheet.is_none() {
    debug!("No global stylesheet {} found", config.stylesheet);
  }

  let mut compiler = Compiler {
    root: source_dir.to_path_buf(),
    config,
    writer,
    processor: MarkdownProcessor::new(MarkdownOptions {
      typography: config.typography,
      ..MarkdownOptions::default()
    }),
    templates,
    navigation: Navigation::default(),
    lang,
    stylesheet,
    cover_assigned: false,
    toc_assigned: false,
  };
  compiler.walk()?;
  compiler.finish()?;
  info!("Wrote {}", output.display());
  Ok(())
}

/// State of one compilation run.
struct Compiler<'c> {
  root:           PathBuf,
  config:         &'c Config,
  writer:         Writer,
  processor:      MarkdownProcessor,
  templates:      Templates,
  navigation:     Navigation,
  /// Primary language of the publication.
  lang:           String,
  /// Root-relative path of the global stylesheet, when there is one.
  stylesheet:     Option<String>,
  cover_assigned: bool,
  toc_assigned:   bool,
}

impl Compiler<'_> {
  /// Visit the source tree depth-first, sorted by file name, and dispatch
  /// every file to the content or media pipeline.
  fn walk(&mut self) -> Result<()> {
    let walker = WalkDir::new(&self.root)
      .sort_by_file_name()
      .into_iter()
      .filter_entry(|entry| entry.depth() == 0 || !is_hidden_dir(entry));

    for entry in walker {
      let entry = match entry {
        Ok(entry) => entry,
        Err(e) => {
          debug!("Skipping unreadable entry: {e}");
          continue;
        },
      };
      if entry.file_type().is_dir() {
        continue;
      }

      let name = entry.file_name().to_string_lossy();
      if name.starts_with('.') || name.starts_with('~') {
        continue;
      }

      let Some(relative) = relative_name(&self.root, entry.path()) else {
        continue;
      };
      if self.config.is_metadata_file(&relative) {
        continue;
      }

      if self.config.is_markdown(entry.path()) {
        self.add_content(entry.path(), &relative)?;
      } else {
        self.add_media(entry.path(), &relative)?;
      }
    }
    Ok(())
  }

  /// Add the table of contents unless an article took that role, then close
  /// the package.
  fn finish(mut self) -> Result<()> {
    if !self.toc_assigned {
      let stylesheet = self.stylesheet_href(TOC_NAME);
      let markup = self.navigation.render_toc(
        &self.templates,
        &self.lang,
        &self.config.toc_title,
        stylesheet.as_deref(),
      )?;
      self.write_document(
        TOC_NAME,
        ContentType::Auxiliary,
        &[Property::Nav],
        &markup,
      )?;
      info!("Generate {TOC_NAME}");
    }
    self.writer.close()?;
    Ok(())
  }

  /// Add an XHTML document: the XML declaration followed by `markup`.
  fn write_document(
    &mut self,
    name: &str,
    content_type: ContentType,
    properties: &[Property],
    markup: &str,
  ) -> Result<()> {
    let mut entry = self.writer.add(name, content_type, properties)?;
    entry
      .write_all(XML_HEADER.as_bytes())
      .and_then(|()| entry.write_all(markup.as_bytes()))
      .map_err(|e| MdepubError::io(name, e))
  }

  /// Link to the global stylesheet from a document at `relative`.
  fn stylesheet_href(&self, relative: &str) -> Option<String> {
    let stylesheet = self.stylesheet.as_deref()?;
    let depth = relative.matches('/').count();
    Some(format!("{}{}", "../".repeat(depth), mdepub_epub::href(stylesheet)))
  }
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
  entry.file_type().is_dir() && entry.file_name().to_string_lossy().starts_with('.')
}

/// Path of `path` below `root`, with `/` separators.
fn relative_name(root: &Path, path: &Path) -> Option<String> {
  let relative = path.strip_prefix(root).ok()?;
  let parts = relative
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<_>>();
  (!parts.is_empty()).then(|| parts.join("/"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_relative_name() {
    let root = Path::new("/src/book");
    assert_eq!(
      relative_name(root, Path::new("/src/book/a/b.md")).as_deref(),
      Some("a/b.md")
    );
    assert_eq!(relative_name(root, root), None);
    assert_eq!(relative_name(root, Path::new("/elsewhere/x.md")), None);
  }
}
