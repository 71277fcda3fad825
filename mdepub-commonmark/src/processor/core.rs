//! Core implementation of the Markdown processor.
use comrak::{Arena, options::Options, parse_document};

use super::{
  footnotes::{FootnoteTransformer, render_definitions},
  types::{AstTransformer, MarkdownOptions, MarkdownProcessor},
  typography::TextTransformer,
};
use crate::utils::MarkupError;

impl MarkdownProcessor {
  /// Create a new `MarkdownProcessor` with the given options.
  #[must_use]
  pub const fn new(options: MarkdownOptions) -> Self {
    Self { options }
  }

  /// Access processor options.
  #[must_use]
  pub const fn options(&self) -> &MarkdownOptions {
    &self.options
  }

  /// Render Markdown to an XHTML fragment.
  ///
  /// Footnote definitions are moved out of the document flow and emitted
  /// after the body as `<aside epub:type="footnote">` elements.
  ///
  /// # Errors
  ///
  /// Returns an error if the HTML formatter fails.
  pub fn render(&self, markdown: &str) -> Result<String, MarkupError> {
    let arena = Arena::new();
    let options = self.comrak_options();
    let root = parse_document(&arena, markdown, &options);

    FootnoteTransformer.transform(root);
    TextTransformer {
      typography: self.options.typography,
    }
    .transform(root);

    // Detached before rendering so the engine's footnote section is skipped.
    let notes = render_definitions(root, &options)?;

    let mut html = String::with_capacity(markdown.len() * 2);
    comrak::format_html(root, &options, &mut html)?;
    html.push_str(&notes);
    Ok(html)
  }

  /// Build comrak options from `MarkdownOptions`.
  fn comrak_options(&self) -> Options<'_> {
    let mut options = Options::default();
    if self.options.gfm {
      options.extension.table = true;
      options.extension.strikethrough = true;
      options.extension.tasklist = true;
      options.extension.superscript = true;
      options.extension.autolink = true;
    }
    options.extension.footnotes = true;
    options.extension.header_id_prefix = None;
    options.render.r#unsafe = true;
    options
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use super::*;

  fn render(processor: &MarkdownProcessor, input: &str) -> String {
    processor.render(input).expect("markdown renders")
  }

  #[test]
  fn test_render_is_stateless() {
    let processor = MarkdownProcessor::default();
    let input = "A[^x].\n\n[^x]: Note.\n";
    assert_eq!(render(&processor, input), render(&processor, input));
  }

  #[test]
  fn test_gfm_tables() {
    let processor = MarkdownProcessor::new(MarkdownOptions {
      gfm:        true,
      typography: false,
    });
    let html = render(&processor, "| a | b |\n|---|---|\n| 1 | 2 |\n");
    assert!(html.contains("<table>"), "no table in {html}");
    assert!(html.contains("<td>1</td>"));
  }

  #[test]
  fn test_footnotes_without_gfm() {
    let processor = MarkdownProcessor::new(MarkdownOptions {
      gfm:        false,
      typography: false,
    });
    let html = render(&processor, "A[^1].\n\n[^1]: B\n");
    assert!(html.contains(r#"epub:type="noteref""#));
    assert!(html.contains(r#"epub:type="footnote""#));
  }
}
