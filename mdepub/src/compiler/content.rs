//! Markdown articles: front matter, rendering and templating.
use std::{fs, path::Path};

use log::{info, warn};
use mdepub_commonmark::normalize_fragment;
use mdepub_epub::{ContentType, Property};
use tera::Context;

use super::Compiler;
use crate::{
  error::{MdepubError, Result},
  frontmatter::FrontMatter,
  nav::NavigationEntry,
  template::Page,
};

/// Title of articles that do not declare one.
const UNTITLED: &str = "* * *";

impl Compiler<'_> {
  /// Render the article at `path` (`relative` to the source root) into the
  /// package and record it in the navigation.
  pub(super) fn add_content(&mut self, path: &Path, relative: &str) -> Result<()> {
    let source =
      fs::read_to_string(path).map_err(|e| MdepubError::io(path, e))?;
    let (front_matter, body) =
      FrontMatter::split(&source).map_err(|source| MdepubError::FrontMatter {
        path: path.to_path_buf(),
        source,
      })?;

    let lang = front_matter.lang().unwrap_or_else(|| self.lang.clone());
    let title = front_matter.title().unwrap_or_else(|| UNTITLED.to_string());
    let content_type = if front_matter.get_bool("hidden") {
      ContentType::Auxiliary
    } else {
      ContentType::Primary
    };

    let mut properties = front_matter
      .get_list("properties")
      .iter()
      .map(|name| Property::from_declared(name))
      .collect::<Vec<_>>();
    let page = if properties.contains(&Property::Nav) {
      if self.toc_assigned {
        warn!("{relative} declares nav, but the navigation document is already set");
        properties.retain(|property| *property != Property::Nav);
        Page::Content
      } else {
        self.toc_assigned = true;
        Page::Nav
      }
    } else {
      Page::Content
    };

    let html =
      self.processor.render(body).map_err(|source| MdepubError::Markup {
        path: path.to_path_buf(),
        source,
      })?;
    let content = normalize_fragment(&html);

    let mut context = Context::new();
    for (key, value) in front_matter.iter() {
      context.insert(key, value);
    }
    context.insert("lang", &lang);
    context.insert("title", &title);
    context.insert("content", &content);
    if let Some(stylesheet) = self.stylesheet_href(relative) {
      context.insert("stylesheet", &stylesheet);
    }
    let markup = self.templates.render(page, &context)?;

    let name = xhtml_name(relative);
    self.write_document(&name, content_type, &properties, &markup)?;
    self.navigation.push(NavigationEntry {
      title: title.clone(),
      subtitle: front_matter.subtitle(),
      level: front_matter.get_int("level").unwrap_or(0),
      href: mdepub_epub::href(&name),
      filename: name.clone(),
      content_type,
    });
    info!("Add {name} {title:?}");
    Ok(())
  }
}

/// Package name of an article: its relative path with an `.xhtml`
/// extension.
fn xhtml_name(relative: &str) -> String {
  let stem = match relative.rfind('.') {
    Some(dot) if !relative[dot..].contains('/') => &relative[..dot],
    _ => relative,
  };
  format!("{stem}.xhtml")
}
