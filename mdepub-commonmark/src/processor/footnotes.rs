//! Footnotes as EPUB note references and notes.
//!
//! References become `<sup><a epub:type="noteref">` links and definitions
//! become `<aside epub:type="footnote">` elements. Both sides derive their
//! ids from the footnote label through [`footnote_slug`], so a marker always
//! points at its note.
use comrak::{
  nodes::{AstNode, NodeValue},
  options::Options,
};

use super::types::AstTransformer;
use crate::utils::{MarkupError, hash_slug};

/// Id fragment shared by a footnote's references and its definition.
///
/// Labels match case-insensitively, so the slug is taken over the lowercased
/// label.
#[must_use]
pub fn footnote_slug(label: &str) -> String {
  hash_slug(label.to_lowercase().as_bytes())
}

/// Rewrites footnote references into EPUB note reference markup.
pub struct FootnoteTransformer;

impl AstTransformer for FootnoteTransformer {
  fn transform<'a>(&self, node: &'a AstNode<'a>) {
    for child in node.descendants() {
      let mut data = child.data.borrow_mut();
      let html = match &data.value {
        NodeValue::FootnoteReference(reference) => {
          reference_html(&reference.name, reference.ix, reference.ref_num)
        },
        _ => continue,
      };
      data.value = NodeValue::HtmlInline(html);
    }
  }
}

fn reference_html(label: &str, number: u32, ref_num: u32) -> String {
  let slug = footnote_slug(label);
  // Later references to the same note need their own anchor.
  let anchor = if ref_num > 1 {
    format!("fnref:{slug}-{ref_num}")
  } else {
    format!("fnref:{slug}")
  };
  format!(
    r##"<sup><a rel="footnote" id="{anchor}" href="#fn:{slug}" epub:type="noteref">{number}</a></sup>"##
  )
}

/// Detach every footnote definition below `root` and render them as
/// `<aside>` notes, in document order.
///
/// Call this before rendering `root`: once detached, the definitions no
/// longer produce the engine's footnote section.
///
/// # Errors
///
/// Returns an error if the HTML formatter fails.
pub fn render_definitions<'a>(
  root: &'a AstNode<'a>,
  options: &Options,
) -> Result<String, MarkupError> {
  let definitions = root
    .descendants()
    .filter(|node| {
      matches!(node.data.borrow().value, NodeValue::FootnoteDefinition(_))
    })
    .collect::<Vec<_>>();

  let mut notes = String::new();
  for definition in definitions {
    let label = match &definition.data.borrow().value {
      NodeValue::FootnoteDefinition(def) => def.name.clone(),
      _ => continue,
    };
    definition.detach();

    let slug = footnote_slug(&label);
    let backlink = format!(
      r##"<a href="#fnref:{slug}" epub:type="backlink">&#x21A9;</a>"##
    );

    let mut body = String::new();
    for child in definition.children() {
      comrak::format_html(child, options, &mut body)?;
    }

    let ends_in_paragraph = definition.last_child().is_some_and(|last| {
      matches!(last.data.borrow().value, NodeValue::Paragraph)
    });
    match body.rfind("</p>") {
      Some(pos) if ends_in_paragraph => {
        body.insert_str(pos, &format!(" {backlink}"));
      },
      _ => {
        body.push_str(&format!("<p>{backlink}</p>\n"));
      },
    }

    notes.push_str(&format!(
      "<aside id=\"fn:{slug}\" epub:type=\"footnote\">\n{body}</aside>\n"
    ));
  }
  Ok(notes)
}
