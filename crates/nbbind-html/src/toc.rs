//! Table of contents for the combined document.
use std::{fmt::Write, path::Path};

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::{
  nav::{SectionMarker, TOC_ID},
  types::{Section, TocEntry, TocLevel},
  utils::humanize_file_stem,
};

/// Ordered table of contents: each top entry is followed by its sub
/// entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOfContents {
  entries: Vec<TocEntry>,
}

/// Label for a section without headings: the humanized file stem.
fn fallback_label(source_name: &str) -> String {
  let stem = Path::new(source_name)
    .file_stem()
    .map_or_else(|| source_name.into(), |s| s.to_string_lossy());
  humanize_file_stem(&stem)
}

impl TableOfContents {
  /// Build the table of contents from sections in their given order.
  ///
  /// Sections are never reordered or deduplicated.
  #[must_use]
  pub fn build(sections: &[Section], marker: &SectionMarker) -> Self {
    let mut entries = Vec::new();

    for section in sections {
      let label = section
        .headings
        .first()
        .map_or_else(|| fallback_label(&section.source_name), |h| h.text.clone());

      entries.push(TocEntry {
        label,
        href: format!("#{}", section.id),
        level: TocLevel::Top,
      });

      entries.extend(
        section
          .headings
          .iter()
          .filter(|heading| marker.matches(&heading.text))
          .map(|heading| {
            TocEntry {
              label: heading.text.clone(),
              href:  format!("#{}", heading.id),
              level: TocLevel::Sub,
            }
          }),
      );
    }

    Self { entries }
  }

  #[must_use]
  pub fn entries(&self) -> &[TocEntry] {
    &self.entries
  }

  /// Top-level entries, one per section.
  pub fn top_level(&self) -> impl Iterator<Item = &TocEntry> {
    self.entries.iter().filter(|e| e.level == TocLevel::Top)
  }

  /// Render as `<nav id="toc">` with a nested list. A top entry without sub
  /// entries gets no nested list.
  #[must_use]
  pub fn render(&self, title: &str) -> String {
    let mut html = String::with_capacity(self.entries.len() * 80);
    let mut sub_open = false;
    let mut item_open = false;

    // Writing to String is infallible
    let _ = write!(
      html,
      "<nav id=\"{TOC_ID}\" class=\"nb-toc\">\n<h2>{}</h2>\n<ul>\n",
      encode_text(title)
    );

    for entry in &self.entries {
      let link = format!(
        "<a href=\"{}\">{}</a>",
        encode_double_quoted_attribute(&entry.href),
        encode_text(&entry.label)
      );

      match entry.level {
        TocLevel::Top => {
          if sub_open {
            html.push_str("</ul>");
            sub_open = false;
          }
          if item_open {
            html.push_str("</li>\n");
          }
          let _ = write!(html, "<li>{link}");
          item_open = true;
        },
        TocLevel::Sub => {
          if !sub_open {
            html.push_str("\n<ul>\n");
            sub_open = true;
          }
          let _ = writeln!(html, "<li>{link}</li>");
        },
      }
    }

    if sub_open {
      html.push_str("</ul>");
    }
    if item_open {
      html.push_str("</li>\n");
    }
    html.push_str("</ul>\n</nav>");

    html
  }
}
