//! Package document (`content.opf`) serialization.
use quick_xml::{
  Writer,
  events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{
  error::Result,
  media::{ContentType, Property},
  metadata::{DC_NAMESPACE, Elements, Metadata},
};

const OPF_NAMESPACE: &str = "http://www.idpf.org/2007/opf";

/// Id given to the first identifier when the metadata left it unnamed.
const DEFAULT_UID: &str = "uid";

/// A resource recorded in the manifest.
#[derive(Debug, Clone)]
pub struct ManifestItem {
  pub id:           String,
  pub href:         String,
  pub media_type:   &'static str,
  pub content_type: ContentType,
  pub properties:   Vec<Property>,
}

impl ManifestItem {
  pub(crate) fn has_property(&self, property: &Property) -> bool {
    self.properties.contains(property)
  }
}

/// Serialize the package document. `modified` is the `dcterms:modified`
/// timestamp in `CCYY-MM-DDThh:mm:ssZ` form.
pub fn write_package_document(
  metadata: &Metadata,
  items: &[ManifestItem],
  modified: &str,
) -> Result<Vec<u8>> {
  let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
  writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

  let uid = metadata
    .identifier
    .first()
    .and_then(|e| e.id.as_deref())
    .unwrap_or(DEFAULT_UID);

  let mut package = BytesStart::new("package");
  package.push_attribute(("xmlns", OPF_NAMESPACE));
  package.push_attribute(("version", "3.0"));
  package.push_attribute(("unique-identifier", uid));
  if let Some(lang) = metadata.primary_language() {
    package.push_attribute(("xml:lang", lang));
  }
  writer.write_event(Event::Start(package))?;

  write_metadata(&mut writer, metadata, uid, items, modified)?;
  write_manifest(&mut writer, items)?;
  write_spine(&mut writer, items)?;

  writer.write_event(Event::End(BytesEnd::new("package")))?;
  Ok(writer.into_inner())
}

fn write_metadata(
  writer: &mut Writer<Vec<u8>>,
  metadata: &Metadata,
  uid: &str,
  items: &[ManifestItem],
  modified: &str,
) -> Result<()> {
  let mut start = BytesStart::new("metadata");
  start.push_attribute(("xmlns:dc", DC_NAMESPACE));
  writer.write_event(Event::Start(start))?;

  for (i, identifier) in metadata.identifier.iter().enumerate() {
    let id = if i == 0 { Some(uid) } else { identifier.id.as_deref() };
    write_text_element(writer, "dc:identifier", id, &identifier.value)?;
  }
  write_elements(writer, "dc:title", &metadata.title)?;
  write_elements(writer, "dc:language", &metadata.language)?;
  write_elements(writer, "dc:creator", &metadata.creator)?;
  write_elements(writer, "dc:contributor", &metadata.contributor)?;
  write_elements(writer, "dc:publisher", &metadata.publisher)?;
  write_elements(writer, "dc:description", &metadata.description)?;
  write_elements(writer, "dc:subject", &metadata.subject)?;
  write_elements(writer, "dc:coverage", &metadata.coverage)?;
  if let Some(date) = &metadata.date {
    write_text_element(writer, "dc:date", date.id.as_deref(), &date.value)?;
  }
  write_elements(writer, "dc:rights", &metadata.rights)?;

  for meta in &metadata.meta {
    let mut start = BytesStart::new("meta");
    if let Some(id) = &meta.id {
      start.push_attribute(("id", id.as_str()));
    }
    if let Some(refines) = &meta.refines {
      start.push_attribute(("refines", refines.as_str()));
    }
    start.push_attribute(("property", meta.property.as_str()));
    write_text(writer, start, "meta", &meta.value)?;
  }

  let mut start = BytesStart::new("meta");
  start.push_attribute(("property", "dcterms:modified"));
  write_text(writer, start, "meta", modified)?;

  // EPUB 2 reading systems only find the cover through this entry.
  if let Some(cover) =
    items.iter().find(|item| item.has_property(&Property::CoverImage))
  {
    let mut start = BytesStart::new("meta");
    start.push_attribute(("name", "cover"));
    start.push_attribute(("content", cover.id.as_str()));
    writer.write_event(Event::Empty(start))?;
  }

  writer.write_event(Event::End(BytesEnd::new("metadata")))?;
  Ok(())
}

fn write_manifest(
  writer: &mut Writer<Vec<u8>>,
  items: &[ManifestItem],
) -> Result<()> {
  writer.write_event(Event::Start(BytesStart::new("manifest")))?;
  for item in items {
    let mut start = BytesStart::new("item");
    start.push_attribute(("id", item.id.as_str()));
    start.push_attribute(("href", item.href.as_str()));
    start.push_attribute(("media-type", item.media_type));
    if !item.properties.is_empty() {
      let properties = item
        .properties
        .iter()
        .map(Property::as_str)
        .collect::<Vec<_>>()
        .join(" ");
      start.push_attribute(("properties", properties.as_str()));
    }
    writer.write_event(Event::Empty(start))?;
  }
  writer.write_event(Event::End(BytesEnd::new("manifest")))?;
  Ok(())
}

fn write_spine(
  writer: &mut Writer<Vec<u8>>,
  items: &[ManifestItem],
) -> Result<()> {
  writer.write_event(Event::Start(BytesStart::new("spine")))?;
  for item in items.iter().filter(|item| item.content_type.in_spine()) {
    let mut start = BytesStart::new("itemref");
    start.push_attribute(("idref", item.id.as_str()));
    if item.content_type == ContentType::Auxiliary {
      start.push_attribute(("linear", "no"));
    }
    writer.write_event(Event::Empty(start))?;
  }
  writer.write_event(Event::End(BytesEnd::new("spine")))?;
  Ok(())
}

fn write_elements(
  writer: &mut Writer<Vec<u8>>,
  name: &str,
  elements: &Elements,
) -> Result<()> {
  for element in elements.iter() {
    write_text_element(writer, name, element.id.as_deref(), &element.value)?;
  }
  Ok(())
}

fn write_text_element(
  writer: &mut Writer<Vec<u8>>,
  name: &str,
  id: Option<&str>,
  value: &str,
) -> Result<()> {
  let mut start = BytesStart::new(name);
  if let Some(id) = id {
    start.push_attribute(("id", id));
  }
  write_text(writer, start, name, value)
}

fn write_text(
  writer: &mut Writer<Vec<u8>>,
  start: BytesStart<'_>,
  name: &str,
  value: &str,
) -> Result<()> {
  writer.write_event(Event::Start(start))?;
  writer.write_event(Event::Text(BytesText::new(value)))?;
  writer.write_event(Event::End(BytesEnd::new(name)))?;
  Ok(())
}
