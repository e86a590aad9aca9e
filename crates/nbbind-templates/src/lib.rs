use std::collections::HashMap;

/// Stylesheet inlined into the combined document. Covers the table of
/// contents, section separators and the print rules.
pub const COMBINED_CSS: &str = include_str!("../templates/combined.css");

/// Stylesheet injected alongside the persistent "Back to index" link.
pub const BACK_TO_INDEX_CSS: &str =
  include_str!("../templates/back-to-index.css");

#[must_use]
pub fn all_templates() -> HashMap<&'static str, &'static str> {
  let mut templates = HashMap::new();
  templates.insert("combined.css", COMBINED_CSS);
  templates.insert("back-to-index.css", BACK_TO_INDEX_CSS);
  templates
}
