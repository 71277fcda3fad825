//! Key-value descriptions: article front matter and the publication
//! metadata file share this representation.
use serde::de::Error as _;
use serde_yaml::{Mapping, Value};

/// An ordered mapping with case-insensitive, typed lookups.
///
/// Unknown keys are kept so they can be handed to page templates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter(Mapping);

impl FrontMatter {
  /// Parse a YAML (or JSON) document. An empty document gives an empty
  /// mapping.
  ///
  /// # Errors
  ///
  /// Returns an error if the document is not valid YAML or is not a mapping.
  pub fn parse(source: &str) -> Result<Self, serde_yaml::Error> {
    if source.trim().is_empty() {
      return Ok(Self::default());
    }
    match serde_yaml::from_str(source)? {
      Value::Mapping(mapping) => Ok(Self(mapping)),
      Value::Null => Ok(Self::default()),
      _ => Err(serde_yaml::Error::custom("expected a key-value mapping")),
    }
  }

  /// Separate a leading front matter block from the body.
  ///
  /// The block opens with a `---` line and closes with a `---` or `...`
  /// line. Without an opening line, or when it is never closed, the whole
  /// input is the body.
  ///
  /// ```
  /// use mdepub::frontmatter::FrontMatter;
  ///
  /// let (meta, body) = FrontMatter::split("---\ntitle: Intro\n---\nHello\n")?;
  /// assert_eq!(meta.get_str("title").as_deref(), Some("Intro"));
  /// assert_eq!(body, "Hello\n");
  /// # Ok::<(), serde_yaml::Error>(())
  /// ```
  ///
  /// # Errors
  ///
  /// Returns an error if the block does not parse as a mapping.
  pub fn split(content: &str) -> Result<(Self, &str), serde_yaml::Error> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let Some(rest) = opening_delimiter(content) else {
      return Ok((Self::default(), content));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
      let marker = line.trim_end();
      if marker == "---" || marker == "..." {
        let meta = Self::parse(&rest[..offset])?;
        return Ok((meta, &rest[offset + line.len()..]));
      }
      offset += line.len();
    }
    Ok((Self::default(), content))
  }

  /// Raw value under `key`, compared case-insensitively.
  #[must_use]
  pub fn get(&self, key: &str) -> Option<&Value> {
    self.0.iter().find_map(|(k, v)| {
      k.as_str()
        .is_some_and(|k| k.eq_ignore_ascii_case(key))
        .then_some(v)
    })
  }

  /// Scalar value as a non-empty string.
  #[must_use]
  pub fn get_str(&self, key: &str) -> Option<String> {
    self
      .get(key)
      .and_then(scalar_string)
      .filter(|s| !s.trim().is_empty())
  }

  /// Boolean flag. Strings `true`, `yes` and `on` count as set; anything
  /// else, including a missing key, is `false`.
  #[must_use]
  pub fn get_bool(&self, key: &str) -> bool {
    match self.get(key) {
      Some(Value::Bool(b)) => *b,
      Some(Value::String(s)) => {
        matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "on")
      },
      Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
      _ => false,
    }
  }

  /// Integer value, also accepted in string form.
  #[must_use]
  pub fn get_int(&self, key: &str) -> Option<i64> {
    match self.get(key)? {
      Value::Number(n) => n.as_i64(),
      Value::String(s) => s.trim().parse().ok(),
      _ => None,
    }
  }

  /// A sequence of scalars, or a single scalar as a one-element list.
  #[must_use]
  pub fn get_list(&self, key: &str) -> Vec<String> {
    match self.get(key) {
      Some(Value::Sequence(items)) => {
        items
          .iter()
          .filter_map(scalar_string)
          .filter(|s| !s.trim().is_empty())
          .collect()
      },
      Some(value) => scalar_string(value).into_iter().collect(),
      None => Vec::new(),
    }
  }

  /// `lang`, or `language` as a fallback.
  #[must_use]
  pub fn lang(&self) -> Option<String> {
    self.get_str("lang").or_else(|| self.get_str("language"))
  }

  #[must_use]
  pub fn title(&self) -> Option<String> {
    self.get_str("title")
  }

  #[must_use]
  pub fn subtitle(&self) -> Option<String> {
    self.get_str("subtitle")
  }

  #[must_use]
  pub fn description(&self) -> Option<String> {
    self.get_str("description")
  }

  /// Values of both `author` and `authors`.
  #[must_use]
  pub fn authors(&self) -> Vec<String> {
    let mut authors = self.get_list("author");
    authors.extend(self.get_list("authors"));
    authors
  }

  /// `keywords` as a list, with comma-separated strings split up.
  #[must_use]
  pub fn keywords(&self) -> Vec<String> {
    self
      .get_list("keywords")
      .iter()
      .flat_map(|item| item.split(','))
      .map(str::trim)
      .filter(|keyword| !keyword.is_empty())
      .map(String::from)
      .collect()
  }

  /// Entries with string keys, in document order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
    self.0.iter().filter_map(|(k, v)| k.as_str().map(|k| (k, v)))
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

fn opening_delimiter(content: &str) -> Option<&str> {
  let (first, rest) = content.split_once('\n').unwrap_or((content, ""));
  (first.trim_end() == "---").then_some(rest)
}

fn scalar_string(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use super::*;

  #[test]
  fn test_split_without_front_matter() {
    let input = "# Heading\n\nText\n";
    let (meta, body) = FrontMatter::split(input).expect("split should work");
    assert!(meta.is_empty());
    assert_eq!(body, input);
  }

  #[test]
  fn test_split_with_dots_terminator() {
    let (meta, body) = FrontMatter::split("---\ntitle: A\nhidden: yes\n...\nBody")
      .expect("split should work");
    assert_eq!(meta.title().as_deref(), Some("A"));
    assert!(meta.get_bool("hidden"));
    assert_eq!(body, "Body");
  }

  #[test]
  fn test_unterminated_block_is_body() {
    let input = "---\ntitle: A\nno end here\n";
    let (meta, body) = FrontMatter::split(input).expect("split should work");
    assert!(meta.is_empty());
    assert_eq!(body, input);
  }

  #[test]
  fn test_empty_block() {
    let (meta, body) =
      FrontMatter::split("---\n---\ntext").expect("split should work");
    assert!(meta.is_empty());
    assert_eq!(body, "text");
  }

  #[test]
  fn test_non_mapping_is_error() {
    assert!(FrontMatter::split("---\n- a\n- b\n---\n").is_err());
    assert!(FrontMatter::split("---\ntitle: [unclosed\n---\n").is_err());
  }

  #[test]
  fn test_typed_accessors() {
    let meta = FrontMatter::parse(
      "Title: Case\nlevel: '2'\nlanguage: fr\nauthor: Ann\nauthors: [Bob, Cy]\n\
       keywords: 'a, b,c'\nproperties: nav\ncount: 3\n",
    )
    .expect("parse should work");
    assert_eq!(meta.title().as_deref(), Some("Case"));
    assert_eq!(meta.get_int("level"), Some(2));
    assert_eq!(meta.get_int("count"), Some(3));
    assert_eq!(meta.lang().as_deref(), Some("fr"));
    assert_eq!(meta.authors(), vec!["Ann", "Bob", "Cy"]);
    assert_eq!(meta.keywords(), vec!["a", "b", "c"]);
    assert_eq!(meta.get_list("properties"), vec!["nav"]);
    assert_eq!(meta.get_str("count").as_deref(), Some("3"));
    assert!(!meta.get_bool("missing"));
  }

  #[test]
  fn test_json_is_accepted() {
    let meta = FrontMatter::parse(r#"{"title": "Book", "hidden": true}"#)
      .expect("JSON should parse as YAML");
    assert_eq!(meta.title().as_deref(), Some("Book"));
    assert!(meta.get_bool("hidden"));
  }
}
