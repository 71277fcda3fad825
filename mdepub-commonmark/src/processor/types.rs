//! Type definitions for the Markdown processor.
//!
//! ```
//! use mdepub_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let options = MarkdownOptions {
//!   typography: false,
//!   ..Default::default()
//! };
//!
//! let processor = MarkdownProcessor::new(options);
//! assert!(!processor.options().typography);
//! ```
use comrak::nodes::AstNode;

/// Options for configuring the Markdown processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownOptions {
  /// Enable GitHub Flavored Markdown extensions (tables, strikethrough, task
  /// lists, superscript, autolinks).
  pub gfm: bool,

  /// Replace ASCII punctuation with typographic characters: curly quotes,
  /// em dashes, ellipses and the copyright, registered and trademark signs.
  pub typography: bool,
}

impl Default for MarkdownOptions {
  fn default() -> Self {
    Self {
      gfm:        cfg!(feature = "gfm"),
      typography: true,
    }
  }
}

/// Main Markdown processor.
///
/// Holds only options; every [`MarkdownProcessor::render`] call owns its
/// parse arena and scratch state, so one processor can render any number of
/// documents.
#[derive(Debug, Clone, Default)]
pub struct MarkdownProcessor {
  pub(crate) options: MarkdownOptions,
}

/// Trait for AST transformations applied between parsing and rendering.
pub trait AstTransformer {
  fn transform<'a>(&self, node: &'a AstNode<'a>);
}
