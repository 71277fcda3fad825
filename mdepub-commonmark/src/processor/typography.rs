//! Text node rewriting: blank-line collapsing and typographic substitutions.
use std::sync::LazyLock;

use comrak::nodes::{AstNode, NodeValue};
use regex::{Captures, Regex};

use super::types::AstTransformer;
use crate::utils::{collapse_blank_lines, never_matching_regex};

/// Rewrites text nodes in place.
///
/// Blank-line runs are always collapsed. With `typography` enabled, quotes
/// become curly quotes, `--`/`---` an em dash, `...` an ellipsis, and
/// `(c)`, `(r)`, `(tm)` their signs. Code spans, code blocks and raw HTML are
/// not text nodes and stay untouched.
pub struct TextTransformer {
  pub typography: bool,
}

impl AstTransformer for TextTransformer {
  fn transform<'a>(&self, node: &'a AstNode<'a>) {
    // Last character emitted in the current block; decides quote direction
    // across node boundaries such as `"*word*"`.
    let mut previous: Option<char> = None;

    for child in node.descendants() {
      let mut data = child.data.borrow_mut();
      if data.value.block() {
        previous = None;
        continue;
      }
      match data.value {
        NodeValue::Text(ref mut text) => {
          let collapsed = collapse_blank_lines(text).into_owned();
          let rewritten = if self.typography {
            smarten(&collapsed, &mut previous)
          } else {
            collapsed
          };
          *text = rewritten.into();
        },
        NodeValue::Code(ref code) => {
          if let Some(last) = code.literal.chars().last() {
            previous = Some(last);
          }
        },
        NodeValue::SoftBreak | NodeValue::LineBreak => previous = Some(' '),
        _ => {},
      }
    }
  }
}

/// Apply symbol and quote substitutions to one text run. `previous` is the
/// character before the run, if any, and is updated to the last character
/// emitted.
fn smarten(text: &str, previous: &mut Option<char>) -> String {
  static SYMBOLS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.\.\.|---?|\((?:c|r|tm)\)").unwrap_or_else(|e| {
      log::error!("Failed to compile SYMBOLS_RE regex: {e}");
      never_matching_regex()
    })
  });

  let replaced = SYMBOLS_RE.replace_all(text, |caps: &Captures<'_>| {
    let matched = &caps[0];
    symbol(matched).map_or_else(|| matched.to_string(), str::to_string)
  });

  let mut out = String::with_capacity(replaced.len());
  for c in replaced.chars() {
    let mapped = match c {
      '"' if opens_quote(*previous) => '\u{201C}',
      '"' => '\u{201D}',
      '\'' if opens_quote(*previous) => '\u{2018}',
      '\'' => '\u{2019}',
      other => other,
    };
    out.push(mapped);
    *previous = Some(mapped);
  }
  out
}

fn symbol(matched: &str) -> Option<&'static str> {
  match matched.to_ascii_lowercase().as_str() {
    "..." => Some("\u{2026}"),
    "--" | "---" => Some("\u{2014}"),
    "(c)" => Some("\u{00A9}"),
    "(r)" => Some("\u{00AE}"),
    "(tm)" => Some("\u{2122}"),
    _ => None,
  }
}

/// A quote opens at the start of a block, after whitespace, after an opening
/// bracket or quote, or after a dash.
fn opens_quote(previous: Option<char>) -> bool {
  previous.is_none_or(|c| {
    c.is_whitespace()
      || matches!(
        c,
        '(' | '[' | '{' | '-' | '\u{2013}' | '\u{2014}' | '\u{201C}' | '\u{2018}'
      )
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn run(text: &str) -> String {
    smarten(text, &mut None)
  }

  #[test]
  fn test_symbols() {
    assert_eq!(run("Wait..."), "Wait\u{2026}");
    assert_eq!(run("a -- b --- c"), "a \u{2014} b \u{2014} c");
    assert_eq!(run("(c) (C) (r) (TM) (tm)"), "\u{a9} \u{a9} \u{ae} \u{2122} \u{2122}");
  }

  #[test]
  fn test_quotes() {
    assert_eq!(run(r#""Hi," she said"#), "\u{201C}Hi,\u{201D} she said");
    assert_eq!(run("it's 'quoted'"), "it\u{2019}s \u{2018}quoted\u{2019}");
    assert_eq!(run(r#"("x")"#), "(\u{201C}x\u{201D})");
    assert_eq!(run(r#"a--"b""#), "a\u{2014}\u{201C}b\u{201D}");
  }

  #[test]
  fn test_previous_carries_over() {
    let mut previous = Some('d');
    assert_eq!(smarten("\" end", &mut previous), "\u{201D} end");
    assert_eq!(previous, Some('d'));
  }

  #[test]
  fn test_plain_text_is_unchanged() {
    assert_eq!(run("nothing to see"), "nothing to see");
  }
}
