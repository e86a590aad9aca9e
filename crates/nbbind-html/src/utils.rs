use regex::Regex;

/// Create a regex that never matches anything.
///
/// Used as the fallback when a pattern fails to compile, so that a bad
/// pattern disables a rewrite instead of aborting the run.
#[must_use]
pub fn never_matching_regex() -> Regex {
  #[allow(
    clippy::unwrap_used,
    reason = "both patterns are statically known to be valid"
  )]
  Regex::new(r"[^\s\S]").unwrap_or_else(|_| Regex::new(r"^\b$").unwrap())
}

/// Capitalize the first letter of a string.
#[must_use]
pub fn capitalize_first(s: &str) -> String {
  let mut chars = s.chars();
  chars.next().map_or_else(String::new, |c| {
    c.to_uppercase().collect::<String>() + chars.as_str()
  })
}

/// Turn a file stem such as `polygon_ratio_problem` into a display label
/// (`Polygon Ratio Problem`). Every word is title-cased, so `WU_results`
/// becomes `Wu Results`.
#[must_use]
pub fn humanize_file_stem(stem: &str) -> String {
  stem
    .replace('_', " ")
    .split_whitespace()
    .map(|word| capitalize_first(&word.to_lowercase()))
    .collect::<Vec<_>>()
    .join(" ")
}
