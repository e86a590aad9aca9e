//! Pulling `<head>` and `<body>` inner markup out of standalone documents.
use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;

use crate::utils::never_matching_regex;

static HEAD_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_tag_pattern("head"));
static BODY_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_tag_pattern("body"));

fn tag_pattern(tag: &str) -> Cow<'static, Regex> {
  match tag.to_ascii_lowercase().as_str() {
    "head" => Cow::Borrowed(&*HEAD_RE),
    "body" => Cow::Borrowed(&*BODY_RE),
    other => Cow::Owned(compile_tag_pattern(other)),
  }
}

fn compile_tag_pattern(tag: &str) -> Regex {
  // `<head` must not match `<header>`, so the name has to be followed by
  // whitespace, `/` or the closing bracket.
  let tag = regex::escape(tag);
  Regex::new(&format!(r"(?is)<{tag}(?:[\s/][^>]*)?>(.*?)</{tag}\s*>"))
    .unwrap_or_else(|_| never_matching_regex())
}

/// Return the trimmed inner markup of the first `<tag>…</tag>` pair in
/// `html`.
///
/// Matching is case-insensitive and spans lines. An absent or unterminated
/// tag yields an empty string; this is never an error.
#[must_use]
pub fn extract_tag_content(html: &str, tag: &str) -> String {
  tag_pattern(tag)
    .captures(html)
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str().trim().to_string())
    .unwrap_or_default()
}
