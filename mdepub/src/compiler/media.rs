use std::path::Path;

use log::info;
use mdepub_epub::{ContentType, Property, XHTML_MEDIA_TYPE, media_type};

use super::Compiler;
use crate::error::Result;

impl Compiler<'_> {
  /// Copy a non-article file into the package. The first cover candidate
  /// met gets the cover role; files of unknown type are skipped.
  pub(super) fn add_media(&mut self, path: &Path, relative: &str) -> Result<()> {
    match media_type(path) {
      None | Some(XHTML_MEDIA_TYPE) => {
        info!("Ignore {relative}");
        return Ok(());
      },
      Some(_) => {},
    }

    let mut properties = Vec::new();
    if !self.cover_assigned && self.config.is_cover_file(relative) {
      properties.push(Property::CoverImage);
      self.cover_assigned = true;
    }
    self
      .writer
      .add_file(path, relative, ContentType::Media, &properties)?;

    let role = properties.first().map_or("media", Property::as_str);
    info!("Add {relative} {role}");
    Ok(())
  }
}
