//! Assembly of several documents into one combined document.
use std::{
  collections::HashSet,
  path::{Path, PathBuf},
};

use log::{debug, info};
use nbbind_templates::COMBINED_CSS;

use crate::{
  anchors::{AnchorState, assign_heading_anchors, slugify},
  assets::rewrite_asset_paths,
  compose::{compose, style_block},
  document::Document,
  dom,
  error::{HtmlError, HtmlResult},
  nav::{
    BACK_TO_INDEX_STYLE_ID,
    SectionLinkOptions,
    SectionMarker,
    TOC_ID,
    inject_section_links,
    strip_back_links,
  },
  toc::TableOfContents,
  types::Section,
};

/// Knobs for [`Assembler`].
#[derive(Debug, Clone)]
pub struct AssembleOptions {
  /// Word marking headings that start a section (matched case-insensitively
  /// as a whole word).
  pub section_marker: String,
  /// Insert page breaks before the second and later marker headings of each
  /// document.
  pub page_breaks:    bool,
  /// Heading of the table of contents.
  pub toc_title:      String,
  /// Replacement for the built-in combined stylesheet.
  pub stylesheet:     Option<String>,
}

impl Default for AssembleOptions {
  fn default() -> Self {
    Self {
      section_marker: "Part".to_string(),
      page_breaks:    true,
      toc_title:      "Contents".to_string(),
      stylesheet:     None,
    }
  }
}

/// Combines documents into one navigable, printable document.
#[derive(Debug, Clone)]
pub struct Assembler {
  marker:    SectionMarker,
  links:     SectionLinkOptions,
  toc_title: String,
  css:       String,
}

fn absolute(path: &Path) -> PathBuf {
  std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Ids of elements the assembler adds around the sections.
const RESERVED_IDS: [&str; 2] = [TOC_ID, BACK_TO_INDEX_STYLE_ID];

fn reserved_ids() -> HashSet<String> {
  RESERVED_IDS.iter().map(ToString::to_string).collect()
}

/// Section ids derived from file stems, unique and in input order. Never
/// one of [`RESERVED_IDS`].
fn section_ids(documents: &[Document]) -> Vec<String> {
  let mut seen = reserved_ids();

  documents
    .iter()
    .enumerate()
    .map(|(index, document)| {
      let slug = slugify(&document.file_stem());
      let base = if slug.is_empty() {
        format!("section-{}", index + 1)
      } else {
        slug
      };

      let mut id = base.clone();
      let mut n = 2;
      while !seen.insert(id.clone()) {
        id = format!("{base}-{n}");
        n += 1;
      }
      id
    })
    .collect()
}

impl Assembler {
  /// # Errors
  ///
  /// Returns an error if the section marker cannot be compiled.
  pub fn new(options: AssembleOptions) -> HtmlResult<Self> {
    Ok(Self {
      marker:    SectionMarker::new(&options.section_marker)?,
      links:     SectionLinkOptions {
        page_breaks: options.page_breaks,
        ..SectionLinkOptions::default()
      },
      toc_title: options.toc_title,
      css:       options
        .stylesheet
        .unwrap_or_else(|| COMBINED_CSS.to_string()),
    })
  }

  #[must_use]
  pub const fn marker(&self) -> &SectionMarker {
    &self.marker
  }

  /// Turn every document into a [`Section`]: extract the body, rewrite
  /// asset paths against `root`, drop back links meant for the standalone
  /// document, assign heading anchors and insert section links.
  ///
  /// Anchor ids are unique across all returned sections and never collide
  /// with a section id or an id the assembler uses itself (`toc`,
  /// `back-to-index-style`).
  #[must_use]
  pub fn sections(&self, documents: &[Document], root: &Path) -> Vec<Section> {
    let root = absolute(root);
    let ids = section_ids(documents);
    let mut used = reserved_ids();
    used.extend(ids.iter().cloned());

    documents
      .iter()
      .zip(ids)
      .map(|(document, id)| {
        let fragment = document.fragment();
        let base_dir = absolute(document.source_dir());
        let body = rewrite_asset_paths(&fragment.body, &base_dir, &root);

        let mut state =
          AnchorState::new(id.clone()).with_reserved(used.iter().cloned());
        let (body, headings) =
          dom::transform_fragment(&body, Vec::new(), |node| {
            strip_back_links(node);
            let headings = assign_heading_anchors(node, &mut state);
            inject_section_links(node, &self.marker, &self.links);
            headings
          });
        used.extend(headings.iter().map(|h| h.id.clone()));

        debug!(
          "Section '{id}' from {}: {} headings",
          document.path().display(),
          headings.len()
        );

        Section {
          id,
          source_name: document.file_name(),
          body,
          headings,
        }
      })
      .collect()
  }

  /// Build the combined document. The head is taken from the first
  /// document.
  ///
  /// # Errors
  ///
  /// Returns [`HtmlError::NoDocuments`] if `documents` is empty.
  pub fn assemble(
    &self,
    documents: &[Document],
    root: &Path,
  ) -> HtmlResult<String> {
    let Some(first) = documents.first() else {
      return Err(HtmlError::NoDocuments);
    };
    info!("Assembling {} documents", documents.len());

    let head = first.fragment().head;
    let sections = self.sections(documents, root);
    let nav = TableOfContents::build(&sections, &self.marker)
      .render(&self.toc_title);

    Ok(compose(&head, &style_block(&self.css), &nav, &sections))
  }
}
