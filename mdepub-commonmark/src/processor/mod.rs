//! Markdown processing.
//!
//! - [`core`]: the processor and its rendering pipeline
//! - [`footnotes`]: EPUB note references and `<aside>` notes
//! - [`typography`]: text node rewriting
//! - [`types`]: options, the processor struct and the transformer trait
pub mod core;
pub mod footnotes;
pub mod types;
pub mod typography;

pub use footnotes::{FootnoteTransformer, footnote_slug, render_definitions};
pub use types::{AstTransformer, MarkdownOptions, MarkdownProcessor};
pub use typography::TextTransformer;
