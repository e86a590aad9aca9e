//! Final concatenation of the combined document.
use html_escape::encode_double_quoted_attribute;

use crate::{nav::PAGE_BREAK_CLASS, types::Section};

/// Class of the `<section>` wrapping each source document.
pub const SECTION_CLASS: &str = "nb-section";

impl Section {
  /// Wrap the body in its `<section>` element.
  #[must_use]
  pub fn wrap(&self) -> String {
    format!(
      "<section class=\"{SECTION_CLASS}\" id=\"{}\" data-source=\"{}\">\n{}\n</section>",
      encode_double_quoted_attribute(&self.id),
      encode_double_quoted_attribute(&self.source_name),
      self.body
    )
  }
}

/// Wrap CSS in a `<style>` element.
#[must_use]
pub fn style_block(css: &str) -> String {
  format!("<style>\n{}\n</style>", css.trim())
}

/// Concatenate the combined document.
///
/// Sections are separated by page-break boundaries; none follows the last
/// one. No content is inspected here.
#[must_use]
pub fn compose(head: &str, style: &str, nav: &str, sections: &[Section]) -> String {
  let page_break = format!("<div class=\"{PAGE_BREAK_CLASS}\"></div>");
  let body = sections
    .iter()
    .map(Section::wrap)
    .collect::<Vec<_>>()
    .join(&format!("\n{page_break}\n"));

  [
    "<!DOCTYPE html>",
    "<html>",
    "<head>",
    head,
    style,
    "</head>",
    "<body>",
    nav,
    body.as_str(),
    "</body>",
    "</html>",
  ]
  .join("\n")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn section(id: &str, body: &str) -> Section {
    Section {
      id:          id.to_string(),
      source_name: format!("{id}.html"),
      body:        body.to_string(),
      headings:    Vec::new(),
    }
  }

  #[test]
  fn page_breaks_only_between_sections() {
    let out = compose("<title>t</title>", "<style></style>", "<nav></nav>", &[
      section("a", "<p>1</p>"),
      section("b", "<p>2</p>"),
      section("c", "<p>3</p>"),
    ]);

    assert_eq!(out.matches("class=\"page-break\"").count(), 2);
    let last_section = out.rfind("<section").expect("section");
    assert!(!out[last_section..].contains("page-break"));
  }

  #[test]
  fn document_shape() {
    let out = compose("<meta charset=\"utf-8\">", "<style>x</style>", "<nav/>", &[
      section("only", ""),
    ]);
    assert!(out.starts_with("<!DOCTYPE html>\n<html>\n<head>\n<meta"));
    assert!(out.contains("<style>x</style>\n</head>\n<body>\n<nav/>\n<section"));
    assert!(out.contains(
      "<section class=\"nb-section\" id=\"only\" \
       data-source=\"only.html\">\n\n</section>"
    ));
    assert!(out.ends_with("</body>\n</html>"));
  }

  #[test]
  fn no_sections_still_well_formed() {
    let out = compose("", "", "", &[]);
    assert!(out.contains("<body>"));
    assert!(out.ends_with("</html>"));
  }

  #[test]
  fn style_block_trims_css() {
    assert_eq!(style_block("\n a{} \n"), "<style>\na{}\n</style>");
  }
}
