//! EPUB 3 package writer.
//!
//! Resources are streamed into a ZIP archive in the order they are added;
//! the package document (manifest, spine and metadata) is written last, when
//! the writer is closed. Content documents (`Primary`/`Auxiliary`) join the
//! spine in insertion order, media resources only the manifest.
mod error;
pub mod media;
pub mod metadata;
mod package;
mod writer;

pub use crate::{
  error::{EpubError, Result},
  media::{ContentType, Property, XHTML_MEDIA_TYPE, href, media_type},
  metadata::{Element, Elements, Meta, Metadata},
  package::ManifestItem,
  writer::{CONTENT_DIR, Entry, Writer},
};
