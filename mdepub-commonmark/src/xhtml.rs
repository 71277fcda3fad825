//! HTML fragments re-serialized as XHTML.
//!
//! Raw HTML in articles is written the HTML way (`<br>`, `<img ...>`,
//! `&nbsp;`), so rendered fragments are parsed with an HTML5 parser and
//! written back out with XML syntax: void elements self-close, entities
//! become characters and foreign content gets its namespace declared.
use html_escape::{encode_double_quoted_attribute, encode_text};
use kuchikikiki::{NodeData, NodeRef, parse_html};
use markup5ever::{Namespace, ns};
use tendril::TendrilSink;

const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

const VOID_ELEMENTS: &[&str] = &[
  "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link",
  "meta", "param", "source", "track", "wbr",
];

/// Parse `html` leniently and serialize it as XHTML, replacing top-level text
/// runs made only of blank lines with a single newline.
///
/// ```
/// use mdepub_commonmark::normalize_fragment;
///
/// assert_eq!(
///   normalize_fragment("<p>a<br>b&nbsp;c</p>\n\n<hr>"),
///   "<p>a<br/>b\u{a0}c</p>\n<hr/>"
/// );
/// ```
#[must_use]
pub fn normalize_fragment(html: &str) -> String {
  let document = parse_html().one(html);
  let mut out = String::with_capacity(html.len());

  // Leading metadata elements such as `<style>` end up in the head.
  for section in ["head", "body"] {
    let Ok(parent) = document.select_first(section) else {
      continue;
    };
    for child in parent.as_node().children() {
      match child.as_text() {
        Some(text) if is_blank_line_run(&text.borrow()) => out.push('\n'),
        _ => serialize(&child, &ns!(html), &mut out),
      }
    }
  }
  out
}

fn is_blank_line_run(text: &str) -> bool {
  text.len() >= 2 && text.bytes().all(|b| b == b'\n')
}

fn serialize(node: &NodeRef, parent_ns: &Namespace, out: &mut String) {
  match node.data() {
    NodeData::Element(element) => {
      let name = &element.name;
      let local: &str = &name.local;
      let declares_ns = name.ns != *parent_ns;

      out.push('<');
      out.push_str(local);
      if declares_ns {
        push_attribute(out, "xmlns", &name.ns);
        if name.ns == ns!(svg) {
          push_attribute(out, "xmlns:xlink", XLINK_NAMESPACE);
        }
      }
      for (attr_name, attr) in &element.attributes.borrow().map {
        if attr_name.ns == ns!(xmlns)
          || (declares_ns && &*attr_name.local == "xmlns")
        {
          continue;
        }
        let qualified = match &attr.prefix {
          Some(prefix) => format!("{}:{}", &**prefix, &*attr_name.local),
          None => attr_name.local.to_string(),
        };
        push_attribute(out, &qualified, &attr.value);
      }

      let contents = element.template_contents.as_ref().unwrap_or(node);
      let is_void = name.ns == ns!(html) && VOID_ELEMENTS.contains(&local);
      if is_void || (name.ns != ns!(html) && contents.first_child().is_none()) {
        out.push_str("/>");
        return;
      }

      out.push('>');
      for child in contents.children() {
        serialize(&child, &name.ns, out);
      }
      out.push_str("</");
      out.push_str(local);
      out.push('>');
    },
    NodeData::Text(text) => out.push_str(&encode_text(&*text.borrow())),
    NodeData::Comment(comment) => {
      // `--` may not appear inside an XML comment.
      let body = comment.borrow().replace("--", "- -");
      out.push_str("<!--");
      out.push_str(&body);
      if body.ends_with('-') {
        out.push(' ');
      }
      out.push_str("-->");
    },
    _ => {},
  }
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
  out.push(' ');
  out.push_str(name);
  out.push_str("=\"");
  out.push_str(&encode_double_quoted_attribute(value));
  out.push('"');
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_void_elements_self_close() {
    assert_eq!(
      normalize_fragment("<p>Line one<br>line two</p>\n"),
      "<p>Line one<br/>line two</p>\n"
    );
    let img = normalize_fragment(r#"<img src="x.png" alt="x">"#);
    assert!(img.starts_with("<img ") && img.ends_with("/>"), "got {img}");
    assert!(img.contains(r#"src="x.png""#) && img.contains(r#"alt="x""#));
  }

  #[test]
  fn test_named_entities_become_characters() {
    assert_eq!(
      normalize_fragment("<div>a&nbsp;b &amp; c&lt;d</div>"),
      "<div>a\u{a0}b &amp; c&lt;d</div>"
    );
  }

  #[test]
  fn test_unclosed_and_mismatched_tags_are_repaired() {
    assert_eq!(normalize_fragment("<div>a</span></div>"), "<div>a</div>");
    assert_eq!(normalize_fragment("<p><em>a</p>"), "<p><em>a</em></p>");
  }

  #[test]
  fn test_collapses_top_level_runs_only() {
    let html = "<p>a</p>\n\n\n<pre><code>x\n\n\ny</code></pre>\n";
    let normalized = normalize_fragment(html);
    assert_eq!(normalized, "<p>a</p>\n<pre><code>x\n\n\ny</code></pre>\n");
    assert_eq!(normalize_fragment(&normalized), normalized);
  }

  #[test]
  fn test_epub_attributes_survive() {
    let html = r##"<sup><a rel="footnote" href="#fn:x" epub:type="noteref">1</a></sup>"##;
    let normalized = normalize_fragment(html);
    assert!(normalized.contains(r#"epub:type="noteref""#), "got {normalized}");
    assert!(normalized.contains(r##"href="#fn:x""##), "got {normalized}");
  }

  #[test]
  fn test_svg_gets_namespace() {
    let normalized =
      normalize_fragment(r#"<svg viewBox="0 0 1 1"><circle r="1"></circle></svg>"#);
    assert!(
      normalized.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg""#),
      "got {normalized}"
    );
    assert!(normalized.contains(r#"viewBox="0 0 1 1""#), "got {normalized}");
    assert!(normalized.contains(r#"<circle r="1"/>"#), "got {normalized}");
  }

  #[test]
  fn test_comments_stay_valid() {
    assert_eq!(normalize_fragment("<!-- a -- b -->"), "<!-- a - - b -->");
  }
}
