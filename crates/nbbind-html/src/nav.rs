//! Navigation affordances: the persistent "Back to index" link and the
//! per-section "Back to contents" links.
//!
//! Both rewrites check for their own markers before inserting anything, so
//! running them over already-processed output changes nothing.
use kuchikikiki::NodeRef;
use log::debug;
use nbbind_templates::BACK_TO_INDEX_CSS;
use regex::Regex;

use crate::{
  dom,
  error::{HtmlError, HtmlResult},
  utils::never_matching_regex,
};

/// Marker class of the persistent back link.
pub const BACK_TO_INDEX_CLASS: &str = "back-to-index";

/// Marker class of the per-section links back to the table of contents.
pub const BACK_TO_TOC_CLASS: &str = "back-to-toc";

/// Class of the page-break boundary elements.
pub const PAGE_BREAK_CLASS: &str = "page-break";

/// Element id of the generated table of contents.
pub const TOC_ID: &str = "toc";

/// Element id of the stylesheet that comes with the back link.
pub const BACK_TO_INDEX_STYLE_ID: &str = "back-to-index-style";

const BACK_TO_INDEX_LABEL: &str = "Back to index";

/// Case-insensitive whole-word matcher for headings that start a section,
/// e.g. every heading containing "Part".
#[derive(Debug, Clone)]
pub struct SectionMarker {
  word:    String,
  pattern: Regex,
}

impl SectionMarker {
  /// Build a matcher for `word`. An empty word matches no heading.
  ///
  /// # Errors
  ///
  /// Returns [`HtmlError::SectionMarker`] if the pattern cannot be compiled.
  pub fn new(word: &str) -> HtmlResult<Self> {
    let word = word.trim();
    let pattern = if word.is_empty() {
      never_matching_regex()
    } else {
      Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word))).map_err(
        |source| {
          HtmlError::SectionMarker {
            marker: word.to_string(),
            source,
          }
        },
      )?
    };

    Ok(Self {
      word: word.to_string(),
      pattern,
    })
  }

  #[must_use]
  pub fn word(&self) -> &str {
    &self.word
  }

  #[must_use]
  pub fn matches(&self, text: &str) -> bool {
    self.pattern.is_match(text)
  }
}

/// Options for [`inject_section_links`].
#[derive(Debug, Clone)]
pub struct SectionLinkOptions {
  /// Target of the inserted links.
  pub toc_href:    String,
  /// Link text.
  pub label:       String,
  /// Insert a page break before the second and later marker headings.
  pub page_breaks: bool,
}

impl Default for SectionLinkOptions {
  fn default() -> Self {
    Self {
      toc_href:    format!("#{TOC_ID}"),
      label:       "Back to contents".to_string(),
      page_breaks: true,
    }
  }
}

/// Whether the persistent back link is already present under `root`.
#[must_use]
pub fn has_navigation_marker(root: &NodeRef) -> bool {
  root
    .select_first(&format!(".{BACK_TO_INDEX_CLASS}"))
    .is_ok()
}

/// Remove every persistent back link under `root`. Returns how many were
/// removed.
///
/// Links carried over from standalone documents point at the index relative
/// to their old location, so fragments drop them before relocation.
pub fn strip_back_links(root: &NodeRef) -> usize {
  let links: Vec<NodeRef> = root
    .select(&format!(".{BACK_TO_INDEX_CLASS}"))
    .map(|selection| selection.map(|link| link.as_node().clone()).collect())
    .unwrap_or_default();

  for link in &links {
    // The newline inserted after the link goes with it
    if let Some(next) = link.next_sibling() {
      if let Some(text) = next.as_text() {
        let rest = text.borrow().strip_prefix('\n').map(str::to_string);
        match rest {
          Some(rest) if rest.is_empty() => next.detach(),
          Some(rest) => *text.borrow_mut() = rest,
          None => {},
        }
      }
    }
    link.detach();
  }

  links.len()
}

/// Insert a "Back to contents" link before every `h1`–`h4` under `root`
/// whose text matches `marker`.
///
/// With page breaks enabled, a page-break element goes in front of the link
/// for every matching heading except the first. Headings already preceded by
/// a back link are left alone. Returns the number of links inserted.
pub fn inject_section_links(
  root: &NodeRef,
  marker: &SectionMarker,
  options: &SectionLinkOptions,
) -> usize {
  let headings: Vec<NodeRef> = root
    .select("h1, h2, h3, h4")
    .map(|selection| selection.map(|h| h.as_node().clone()).collect())
    .unwrap_or_default();

  let mut matched = 0;
  let mut inserted = 0;

  for heading in headings {
    if !marker.matches(&heading.text_contents()) {
      continue;
    }
    matched += 1;

    let already_linked = dom::previous_element_sibling(&heading)
      .is_some_and(|prev| dom::has_class(&prev, BACK_TO_TOC_CLASS));
    if already_linked {
      continue;
    }

    if options.page_breaks && matched > 1 {
      heading
        .insert_before(dom::new_element("div", &[("class", PAGE_BREAK_CLASS)]));
    }
    heading.insert_before(dom::new_link(
      BACK_TO_TOC_CLASS,
      &options.toc_href,
      &options.label,
    ));
    inserted += 1;
  }

  debug!(
    "Inserted {inserted} section links for {matched} '{}' headings",
    marker.word()
  );

  inserted
}

/// Parse `fragment`, insert section links and serialize it back.
#[must_use]
pub fn apply_section_links(
  fragment: &str,
  marker: &SectionMarker,
  options: &SectionLinkOptions,
) -> String {
  dom::transform_fragment(fragment, 0, |body| {
    inject_section_links(body, marker, options)
  })
  .0
}

/// Insert the persistent back link into a complete document: a stylesheet
/// at the end of `<head>` and the link right after `<body>`.
///
/// If the document already carries the link, `html` is returned unchanged.
#[must_use]
pub fn inject_back_link(html: &str, href: &str) -> String {
  let document = dom::parse_document(html);
  if has_navigation_marker(&document) {
    return html.to_string();
  }

  let has_style = document
    .select_first(&format!("#{BACK_TO_INDEX_STYLE_ID}"))
    .is_ok();
  if let (false, Ok(head)) = (has_style, document.select_first("head")) {
    let style = dom::new_element("style", &[("id", BACK_TO_INDEX_STYLE_ID)]);
    style.append(NodeRef::new_text(format!("\n{BACK_TO_INDEX_CSS}")));
    head.as_node().append(style);
  }

  if let Ok(body) = document.select_first("body") {
    let body = body.as_node();
    body.prepend(NodeRef::new_text("\n"));
    body.prepend(dom::new_link(BACK_TO_INDEX_CLASS, href, BACK_TO_INDEX_LABEL));
  }

  dom::serialize_node(&document)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn marker() -> SectionMarker {
    SectionMarker::new("Part").expect("valid marker")
  }

  #[test]
  fn marker_matches_whole_words_case_insensitively() {
    let marker = marker();
    assert!(marker.matches("Part 1"));
    assert!(marker.matches("the PART two"));
    assert!(!marker.matches("Partition"));
    assert!(!marker.matches("Counterpart"));
  }

  #[test]
  fn empty_marker_matches_nothing() {
    let marker = SectionMarker::new("  ").expect("valid marker");
    assert!(!marker.matches("Part 1"));
    assert!(!marker.matches(""));
  }

  #[test]
  fn links_precede_marker_headings_with_breaks_after_first() {
    let out = apply_section_links(
      "<h1>Part 1</h1><p>a</p><h2>Notes</h2><h2>Part 2</h2>",
      &marker(),
      &SectionLinkOptions::default(),
    );
    assert_eq!(
      out,
      "<a class=\"back-to-toc\" href=\"#toc\">Back to \
       contents</a><h1>Part 1</h1><p>a</p><h2>Notes</h2><div \
       class=\"page-break\"></div><a class=\"back-to-toc\" \
       href=\"#toc\">Back to contents</a><h2>Part 2</h2>"
    );
  }

  #[test]
  fn page_breaks_can_be_disabled() {
    let options = SectionLinkOptions {
      page_breaks: false,
      ..SectionLinkOptions::default()
    };
    let out =
      apply_section_links("<h1>Part 1</h1><h1>Part 2</h1>", &marker(), &options);
    assert_eq!(out.matches("back-to-toc").count(), 2);
    assert!(!out.contains(PAGE_BREAK_CLASS));
  }

  #[test]
  fn section_links_are_idempotent() {
    let options = SectionLinkOptions::default();
    let once = apply_section_links(
      "<div><h1>Part 1</h1>\n<p>x</p>\n<h2>Part 2</h2></div>",
      &marker(),
      &options,
    );
    let twice = apply_section_links(&once, &marker(), &options);
    assert_eq!(once, twice);
    assert_eq!(twice.matches(PAGE_BREAK_CLASS).count(), 1);
  }

  #[test]
  fn back_link_is_injected_once() {
    let html = "<!DOCTYPE html><html><head><title>T</title></head><body \
                class=\"nb\"><p>x</p></body></html>";
    let once = inject_back_link(html, "../index.html");
    let twice = inject_back_link(&once, "../index.html");

    assert_eq!(once, twice);
    assert_eq!(once.matches("class=\"back-to-index\"").count(), 1);
    assert!(once.contains("href=\"../index.html\""));
    assert_eq!(once.matches("<style id=\"back-to-index-style\">").count(), 1);
    let body_at = once.find("<body").expect("body");
    let link_at = once.find("<a class=\"back-to-index\"").expect("link");
    assert!(link_at > body_at);
  }

  #[test]
  fn stripped_back_link_can_be_reinjected() {
    let html = inject_back_link(
      "<html><head></head><body><p>x</p></body></html>",
      "../index.html",
    );
    let document = dom::parse_document(&html);
    assert_eq!(strip_back_links(&document), 1);
    assert!(!has_navigation_marker(&document));

    let out = inject_back_link(&dom::serialize_node(&document), "index.html");
    assert_eq!(out.matches("back-to-index-style").count(), 1);
    assert!(out.contains("<body><a class=\"back-to-index\" href=\"index.html\">"));
    assert!(!out.contains("../index.html"));
  }

  #[test]
  fn back_link_survives_missing_head_and_body() {
    let out = inject_back_link("<p>bare</p>", "index.html");
    assert!(out.contains("<head><style id=\"back-to-index-style\">"));
    assert!(out.contains("Back to index</a>"));
    assert!(out.contains("<p>bare</p>"));
  }
}
