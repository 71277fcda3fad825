//! Publication metadata as written to the package document.

/// Namespace of the Dublin Core elements.
pub const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";

/// A Dublin Core element value with an optional `id` that `meta` entries can
/// refine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
  pub id:    Option<String>,
  pub value: String,
}

/// An ordered list of elements of one kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Elements(Vec<Element>);

impl Elements {
  /// Append a value. An empty `id` means the element is not refined.
  pub fn add(&mut self, id: &str, value: impl Into<String>) {
    self.0.push(Element {
      id:    (!id.is_empty()).then(|| id.to_string()),
      value: value.into(),
    });
  }

  #[must_use]
  pub fn first(&self) -> Option<&Element> {
    self.0.first()
  }

  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  #[must_use]
  pub const fn len(&self) -> usize {
    self.0.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Element> {
    self.0.iter()
  }

  /// Values in order, without ids.
  #[must_use]
  pub fn values(&self) -> Vec<&str> {
    self.0.iter().map(|e| e.value.as_str()).collect()
  }
}

/// A `<meta>` entry, either refining another element or standing alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meta {
  pub id:       Option<String>,
  pub refines:  Option<String>,
  pub property: String,
  pub value:    String,
}

impl Meta {
  /// Meta refining the element with the given id.
  #[must_use]
  pub fn refines(id: &str, property: &str, value: impl Into<String>) -> Self {
    Self {
      id:       None,
      refines:  Some(format!("#{id}")),
      property: property.to_string(),
      value:    value.into(),
    }
  }

  /// Stand-alone meta carrying its own id.
  #[must_use]
  pub fn with_id(id: &str, property: &str, value: impl Into<String>) -> Self {
    Self {
      id:       Some(id.to_string()),
      refines:  None,
      property: property.to_string(),
      value:    value.into(),
    }
  }
}

/// Publication metadata. The first language is the primary one and the
/// first identifier becomes the package's unique identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
  pub language:    Elements,
  pub title:       Elements,
  pub creator:     Elements,
  pub contributor: Elements,
  pub publisher:   Elements,
  pub identifier:  Elements,
  pub description: Elements,
  pub subject:     Elements,
  pub coverage:    Elements,
  pub date:        Option<Element>,
  pub rights:      Elements,
  pub meta:        Vec<Meta>,
}

impl Metadata {
  /// Primary language, if any was set.
  #[must_use]
  pub fn primary_language(&self) -> Option<&str> {
    self.language.first().map(|e| e.value.as_str())
  }
}
