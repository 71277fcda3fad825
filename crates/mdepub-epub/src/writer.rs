use std::{
  collections::HashSet,
  fs::File,
  io::{self, Write},
  path::{Path, PathBuf},
};

use log::debug;
use tempfile::NamedTempFile;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::{
  error::{EpubError, Result},
  media::{self, ContentType, Property, XHTML_MEDIA_TYPE},
  metadata::Metadata,
  package::{ManifestItem, write_package_document},
};

/// Directory inside the archive holding the package document and every
/// publication resource.
pub const CONTENT_DIR: &str = "OEBPS";

const PACKAGE_DOCUMENT: &str = "content.opf";

const CONTAINER_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

/// Streaming EPUB writer.
///
/// The archive is assembled in a temporary file next to the destination and
/// only moved into place by [`Writer::close`]. A writer that is dropped
/// without being closed removes its temporary file, so a failed run never
/// leaves a truncated package behind.
///
/// ```no_run
/// use mdepub_epub::{ContentType, Writer};
/// use std::io::Write;
///
/// let mut writer = Writer::create("book.epub")?;
/// writer.metadata.title.add("title", "My Book");
/// writer
///   .add("chapter.xhtml", ContentType::Primary, &[])?
///   .write_all(b"<html/>")?;
/// writer.close()?;
/// # Ok::<(), mdepub_epub::EpubError>(())
/// ```
pub struct Writer {
  zip:         ZipWriter<NamedTempFile>,
  destination: PathBuf,
  items:       Vec<ManifestItem>,
  names:       HashSet<String>,

  /// Metadata written into the package document on [`Writer::close`].
  pub metadata: Metadata,
}

impl Writer {
  /// Start a new package that will be written to `path` once closed.
  ///
  /// # Errors
  ///
  /// Returns an error if the temporary archive cannot be created.
  pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
    let destination = path.as_ref().to_path_buf();
    let dir = match destination.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
      _ => PathBuf::from("."),
    };
    let file = tempfile::Builder::new()
      .prefix(".mdepub-")
      .suffix(".tmp")
      .tempfile_in(&dir)?;

    let mut zip = ZipWriter::new(file);

    // The mimetype entry must come first and be stored uncompressed.
    zip.start_file("mimetype", stored())?;
    zip.write_all(b"application/epub+zip")?;

    zip.start_file("META-INF/container.xml", deflated())?;
    zip.write_all(CONTAINER_XML)?;

    Ok(Self {
      zip,
      destination,
      items: Vec::new(),
      names: HashSet::new(),
      metadata: Metadata::default(),
    })
  }

  /// Start a new content document named `name` (relative to the package
  /// root) and return a sink for its bytes. The sink is valid until the next
  /// entry is started.
  ///
  /// # Errors
  ///
  /// Returns an error if the name is already taken or the entry cannot be
  /// started.
  pub fn add(
    &mut self,
    name: &str,
    content_type: ContentType,
    properties: &[Property],
  ) -> Result<Entry<'_>> {
    let media_type = if content_type.in_spine() {
      XHTML_MEDIA_TYPE
    } else {
      media::media_type(Path::new(name))
        .ok_or_else(|| EpubError::UnsupportedMediaType(name.to_string()))?
    };
    self.register(name, media_type, content_type, properties)?;
    self
      .zip
      .start_file(format!("{CONTENT_DIR}/{name}"), deflated())?;
    Ok(Entry {
      zip: &mut self.zip,
    })
  }

  /// Copy the file at `src` into the package as `dest`.
  ///
  /// # Errors
  ///
  /// Returns an error if the media type is unknown, the name is already
  /// taken, or the source cannot be read.
  pub fn add_file<P: AsRef<Path>>(
    &mut self,
    src: P,
    dest: &str,
    content_type: ContentType,
    properties: &[Property],
  ) -> Result<()> {
    let media_type = if content_type.in_spine() {
      XHTML_MEDIA_TYPE
    } else {
      media::media_type(Path::new(dest))
        .ok_or_else(|| EpubError::UnsupportedMediaType(dest.to_string()))?
    };
    let mut source = File::open(src.as_ref())?;
    self.register(dest, media_type, content_type, properties)?;
    self
      .zip
      .start_file(format!("{CONTENT_DIR}/{dest}"), deflated())?;
    io::copy(&mut source, &mut self.zip)?;
    Ok(())
  }

  /// Resources recorded so far, in insertion order.
  #[must_use]
  pub fn items(&self) -> &[ManifestItem] {
    &self.items
  }

  /// Write the package document, finish the archive and move it to its
  /// destination.
  ///
  /// # Errors
  ///
  /// Returns an error if any part of finalization fails; the temporary file
  /// is removed in that case.
  pub fn close(mut self) -> Result<()> {
    let modified = jiff::Timestamp::now()
      .strftime("%Y-%m-%dT%H:%M:%SZ")
      .to_string();
    let opf = write_package_document(&self.metadata, &self.items, &modified)?;
    self
      .zip
      .start_file(format!("{CONTENT_DIR}/{PACKAGE_DOCUMENT}"), deflated())?;
    self.zip.write_all(&opf)?;

    let file = self.zip.finish()?;
    file.persist(&self.destination).map_err(|e| e.error)?;
    debug!(
      "Wrote {} resources to {}",
      self.items.len(),
      self.destination.display()
    );
    Ok(())
  }

  fn register(
    &mut self,
    name: &str,
    media_type: &'static str,
    content_type: ContentType,
    properties: &[Property],
  ) -> Result<()> {
    if !self.names.insert(name.to_string()) {
      return Err(EpubError::DuplicateEntry(name.to_string()));
    }
    self.items.push(ManifestItem {
      id: format!("item-{}", self.items.len() + 1),
      href: media::href(name),
      media_type,
      content_type,
      properties: properties.to_vec(),
    });
    Ok(())
  }
}

/// Byte sink for the entry most recently started with [`Writer::add`].
pub struct Entry<'a> {
  zip: &'a mut ZipWriter<NamedTempFile>,
}

impl Write for Entry<'_> {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.zip.write(buf)
  }

  fn flush(&mut self) -> io::Result<()> {
    self.zip.flush()
  }
}

fn stored() -> SimpleFileOptions {
  SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
}

fn deflated() -> SimpleFileOptions {
  SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}
