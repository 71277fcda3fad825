//! Page templating over the embedded templates.
use tera::{Context, Tera};

use crate::error::Result;

/// The kinds of page the compiler emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
  /// An article wrapped in the document shell.
  Content,
  /// An article that serves as the navigation document.
  Nav,
  /// The synthesized table of contents.
  Toc,
}

impl Page {
  const fn template_name(self) -> &'static str {
    match self {
      Self::Content => "page.xhtml",
      Self::Nav => "nav.xhtml",
      Self::Toc => "toc.xhtml",
    }
  }
}

/// Compiled page templates.
pub struct Templates {
  tera: Tera,
}

impl Templates {
  /// Register the embedded templates with XML escaping for every value that
  /// is not marked `safe`.
  ///
  /// # Errors
  ///
  /// Returns an error if an embedded template does not compile.
  pub fn new() -> Result<Self> {
    let mut tera = Tera::default();
    tera.add_raw_templates(mdepub_templates::all_templates())?;
    tera.autoescape_on(vec![".xhtml"]);
    tera.set_escape_fn(escape_xml);
    Ok(Self { tera })
  }

  /// Render `page` with `context`.
  ///
  /// # Errors
  ///
  /// Returns an error if rendering fails, for instance when the context
  /// lacks a variable the template prints.
  pub fn render(&self, page: Page, context: &Context) -> Result<String> {
    Ok(self.tera.render(page.template_name(), context)?)
  }
}

fn escape_xml(input: &str) -> String {
  html_escape::encode_double_quoted_attribute(input).into_owned()
}
