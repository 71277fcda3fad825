//! Publication metadata: the description file mapped onto the package
//! metadata, with defaults filled in.
use std::{fs, path::Path};

use log::{debug, info};
use mdepub_epub::{Meta, Metadata};

use crate::{
  config::Config,
  error::{MdepubError, Result},
  frontmatter::FrontMatter,
};

/// Identifier keys, in the order they are added. The first one found becomes
/// the package's unique identifier.
const IDENTIFIER_KEYS: [&str; 6] = ["uuid", "id", "identifier", "doi", "isbn", "issn"];

/// Load the publication description from the first configured metadata file
/// that exists under `source_dir`, then fill in defaults.
///
/// The result always carries at least one language, one title and one
/// identifier.
///
/// # Errors
///
/// Returns an error if the metadata file cannot be read or does not parse as
/// a mapping.
pub fn load_metadata(source_dir: &Path, config: &Config) -> Result<Metadata> {
  let mut metadata = Metadata::default();

  let found = config
    .metadata_files
    .iter()
    .map(|name| source_dir.join(name))
    .find(|path| path.is_file());

  if let Some(path) = found {
    let content =
      fs::read_to_string(&path).map_err(|e| MdepubError::io(&path, e))?;
    let description =
      FrontMatter::parse(&content).map_err(|source| MdepubError::Metadata {
        path: path.clone(),
        source,
      })?;
    convert_metadata(&description, &mut metadata);
    info!("Metadata {}", path.display());
  } else {
    debug!("No metadata file found in {}", source_dir.display());
  }

  apply_defaults(&mut metadata, config);
  Ok(metadata)
}

/// Map recognized description keys onto publication metadata.
pub fn convert_metadata(description: &FrontMatter, metadata: &mut Metadata) {
  if let Some(lang) = description.lang() {
    metadata.language.add("", lang);
  }

  if let Some(title) = description.title() {
    metadata.title.add("title", title);
    metadata.meta.push(Meta::refines("title", "title-type", "main"));
    metadata.meta.push(Meta::refines("title", "display-seq", "1"));
  }
  if let Some(subtitle) = description.subtitle() {
    metadata.title.add("subtitle", subtitle);
    metadata
      .meta
      .push(Meta::refines("subtitle", "title-type", "subtitle"));
    metadata.meta.push(Meta::refines("subtitle", "display-seq", "2"));
  }
  if let Some(collection) = description.get_str("collection") {
    metadata.title.add("collection", collection.as_str());
    metadata
      .meta
      .push(Meta::refines("collection", "title-type", "collection"));
    metadata.meta.push(Meta::with_id(
      "collectionid",
      "belongs-to-collection",
      collection,
    ));
    if let Some(sequence) = description.get_str("sequence") {
      metadata.meta.push(Meta::refines(
        "collection",
        "group-position",
        sequence.as_str(),
      ));
      metadata
        .meta
        .push(Meta::refines("collectionid", "group-position", sequence));
    }
  }
  if let Some(edition) = description.get_str("edition") {
    metadata.title.add("edition", edition);
    metadata
      .meta
      .push(Meta::refines("edition", "title-type", "edition"));
  }
  if let Some(fulltitle) = description.get_str("fulltitle") {
    metadata.title.add("fulltitle", fulltitle);
    metadata
      .meta
      .push(Meta::refines("fulltitle", "title-type", "expanded"));
  }

  for author in description.authors() {
    metadata.creator.add("", author);
  }
  for contributor in description.get_list("contributor") {
    metadata.contributor.add("", contributor);
  }
  for publisher in description.get_list("publisher") {
    metadata.publisher.add("", publisher);
  }

  for key in IDENTIFIER_KEYS {
    if let Some(value) = description.get_str(key) {
      let value = match key {
        "uuid" | "doi" | "isbn" | "issn" => format!("urn:{key}:{value}"),
        _ => value,
      };
      metadata.identifier.add(key, value);
    }
  }

  if let Some(description) = description.description() {
    let collapsed = description.split_whitespace().collect::<Vec<_>>().join(" ");
    metadata.description.add("description", collapsed);
  }
  for keyword in description.keywords() {
    metadata.subject.add("", keyword);
  }
  if let Some(coverage) = description.get_str("coverage") {
    metadata.coverage.add("", coverage);
  }
  if let Some(date) = description.get_str("date") {
    metadata.date = Some(mdepub_epub::Element {
      id:    None,
      value: date,
    });
  }
  for key in ["copyright", "rights"] {
    if let Some(rights) = description.get_str(key) {
      metadata.rights.add(key, rights);
    }
  }
}

fn apply_defaults(metadata: &mut Metadata, config: &Config) {
  if metadata.language.is_empty() {
    metadata.language.add("", config.lang.as_str());
  }
  if metadata.title.is_empty() {
    metadata.title.add("", config.title.as_str());
  }
  if metadata.identifier.is_empty() {
    metadata
      .identifier
      .add("uuid", format!("urn:uuid:{}", uuid::Uuid::new_v4()));
  }
}
