//! Compile a directory of Markdown articles, media and a metadata file into
//! an EPUB 3 package.
//!
//! The binary is a thin wrapper around [`compile`]; the modules are public so
//! that integration tests can drive each stage.
pub mod cli;
pub mod compiler;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod metadata;
pub mod nav;
pub mod template;

pub use crate::{
  compiler::compile,
  config::Config,
  error::{MdepubError, Result},
};
