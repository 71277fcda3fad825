//! # mdepub-commonmark
//!
//! CommonMark to XHTML rendering for EPUB content documents.
//!
//! Rendering is built on `comrak`. The default HTML output is kept for
//! everything except footnotes, which become EPUB note references and
//! `<aside>` notes, and text, which gets blank-line collapsing and optional
//! typographic substitutions.
//!
//! ```rust
//! use mdepub_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let processor = MarkdownProcessor::new(MarkdownOptions::default());
//! let html = processor.render("Some *emphasis*...")?;
//!
//! assert_eq!(html, "<p>Some <em>emphasis</em>\u{2026}</p>\n");
//! # Ok::<(), mdepub_commonmark::MarkupError>(())
//! ```
//!
//! Rendered fragments are meant to be embedded in XHTML documents;
//! [`normalize_fragment`] turns raw HTML written by authors into XHTML and
//! tidies whitespace between top-level blocks.
pub mod processor;
pub mod utils;
pub mod xhtml;

pub use crate::{
  processor::{AstTransformer, MarkdownOptions, MarkdownProcessor},
  utils::{MarkupError, collapse_blank_lines, hash_slug},
  xhtml::normalize_fragment,
};
