use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;

/// Error type for Markdown rendering.
#[derive(Debug, thiserror::Error)]
pub enum MarkupError {
  #[error("Failed to format rendered markup: {0}")]
  Format(#[from] std::fmt::Error),
}

/// Symbols used by [`hash_slug`]. All of them are valid in XML IDs.
const SLUG_ALPHABET: &[u8; 64] =
  b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

const SLUG_LEN: usize = 8;

/// Deterministic short identifier for arbitrary bytes.
///
/// The first 64 bits of the SHA-1 digest are spelled out six bits at a time.
/// Equal input always gives the same slug, across calls and runs; distinct
/// input collides only by chance.
///
/// ```
/// use mdepub_commonmark::utils::hash_slug;
///
/// assert_eq!(hash_slug(b"note"), hash_slug(b"note"));
/// assert_eq!(hash_slug(b"note").len(), 8);
/// ```
#[must_use]
pub fn hash_slug(name: &[u8]) -> String {
  let digest = sha1_smol::Sha1::from(name).digest().bytes();
  let mut prefix = [0u8; 8];
  prefix.copy_from_slice(&digest[..8]);
  let mut value = u64::from_be_bytes(prefix);

  let mut slug = String::with_capacity(SLUG_LEN);
  for _ in 0..SLUG_LEN {
    slug.push(char::from(SLUG_ALPHABET[(value & 63) as usize]));
    value >>= 6;
  }
  slug
}

/// Collapse every run of two or more newlines into a single newline.
#[must_use]
pub fn collapse_blank_lines(text: &str) -> Cow<'_, str> {
  static BLANK_LINES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n{2,}").unwrap_or_else(|e| {
      log::error!("Failed to compile BLANK_LINES_RE regex: {e}");
      never_matching_regex()
    })
  });

  BLANK_LINES_RE.replace_all(text, "\n")
}

/// A regex that never matches, used when a static pattern fails to compile.
pub fn never_matching_regex() -> Regex {
  Regex::new(r"[^\s\S]").unwrap_or_else(|_| {
    #[allow(
      clippy::expect_used,
      reason = "This pattern is guaranteed to be valid"
    )]
    Regex::new(r"^\b$").expect("regex pattern ^\\b$ should always compile")
  })
}
