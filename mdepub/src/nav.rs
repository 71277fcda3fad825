//! Navigation entries and the synthesized table of contents.
use mdepub_epub::ContentType;
use serde::Serialize;
use tera::Context;

use crate::{
  error::Result,
  template::{Page, Templates},
};

/// One content document as listed in the table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationEntry {
  pub title:        String,
  pub subtitle:     Option<String>,
  pub level:        i64,
  pub filename:     String,
  /// `filename` as a URL reference.
  pub href:         String,
  pub content_type: ContentType,
}

/// Content documents in the order they were added to the package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Navigation(Vec<NavigationEntry>);

impl Navigation {
  pub fn push(&mut self, entry: NavigationEntry) {
    self.0.push(entry);
  }

  #[must_use]
  pub fn entries(&self) -> &[NavigationEntry] {
    &self.0
  }

  #[must_use]
  pub const fn len(&self) -> usize {
    self.0.len()
  }

  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Render the table of contents page listing every entry.
  ///
  /// # Errors
  ///
  /// Returns an error if the template fails to render.
  pub fn render_toc(
    &self,
    templates: &Templates,
    lang: &str,
    title: &str,
    stylesheet: Option<&str>,
  ) -> Result<String> {
    let mut context = Context::new();
    context.insert("lang", lang);
    context.insert("title", title);
    context.insert("toc", self);
    if let Some(stylesheet) = stylesheet {
      context.insert("stylesheet", stylesheet);
    }
    templates.render(Page::Toc, &context)
  }
}
