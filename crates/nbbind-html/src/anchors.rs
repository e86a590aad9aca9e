//! Heading anchor assignment.
//!
//! Every `h1`–`h4` in a fragment receives an id of the form
//! `{prefix}-{slug}`. The prefix is unique per fragment, which keeps ids
//! unique across the combined document; repeated slugs inside one fragment
//! are disambiguated with a numeric suffix.
use std::collections::HashSet;

use kuchikikiki::NodeRef;
use log::debug;
use markup5ever::local_name;

use crate::{dom, types::Heading};

/// Class of the permalink anchors that notebook renderers embed in
/// headings.
pub const PERMALINK_CLASS: &str = "anchor-link";

const HEADING_SELECTOR: &str = "h1, h2, h3, h4";

/// Slugify heading text for use in an anchor id.
///
/// Lowercases, replaces every run of characters outside `[a-zA-Z0-9_-]` with
/// a single dash, and trims leading/trailing dashes.
#[must_use]
pub fn slugify(text: &str) -> String {
  let mut slug = String::with_capacity(text.len());
  let mut pending_dash = false;

  for c in text.to_lowercase().chars() {
    if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
      if pending_dash {
        slug.push('-');
        pending_dash = false;
      }
      slug.push(c);
    } else {
      pending_dash = true;
    }
  }

  slug.trim_matches('-').to_string()
}

/// Per-fragment anchor assignment state.
///
/// Holds the fragment prefix, the ordinal used for headings whose text
/// produces an empty slug, and every id handed out so far (plus any ids
/// reserved by earlier fragments).
#[derive(Debug, Clone, Default)]
pub struct AnchorState {
  prefix:      String,
  empty_slugs: usize,
  used:        HashSet<String>,
}

impl AnchorState {
  #[must_use]
  pub fn new(prefix: impl Into<String>) -> Self {
    Self {
      prefix:      prefix.into(),
      empty_slugs: 0,
      used:        HashSet::new(),
    }
  }

  /// Mark ids as taken so this fragment never produces them.
  #[must_use]
  pub fn with_reserved<I, S>(mut self, ids: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.used.extend(ids.into_iter().map(Into::into));
    self
  }

  #[must_use]
  pub fn prefix(&self) -> &str {
    &self.prefix
  }

  /// Compute the next anchor id for a heading at `level` with display
  /// `text`, and record it as used.
  pub fn next_id(&mut self, level: u8, text: &str) -> String {
    let slug = slugify(text);
    let base = if slug.is_empty() {
      self.empty_slugs += 1;
      self.prefixed(&format!("h{level}-{}", self.empty_slugs))
    } else {
      self.prefixed(&slug)
    };

    let mut id = base.clone();
    let mut n = 2;
    while self.used.contains(&id) {
      id = format!("{base}-{n}");
      n += 1;
    }

    self.used.insert(id.clone());
    id
  }

  fn prefixed(&self, tail: &str) -> String {
    if self.prefix.is_empty() {
      tail.to_string()
    } else {
      format!("{}-{tail}", self.prefix)
    }
  }
}

fn heading_level(name: &str) -> Option<u8> {
  match name {
    "h1" => Some(1),
    "h2" => Some(2),
    "h3" => Some(3),
    "h4" => Some(4),
    _ => None,
  }
}

/// Collapse internal whitespace and trim.
fn normalize_text(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Assign anchor ids to every `h1`–`h4` under `root`, in document order.
///
/// Permalink decorations are removed from each heading first, any existing
/// id is replaced. Returns the heading records.
pub fn assign_heading_anchors(
  root: &NodeRef,
  state: &mut AnchorState,
) -> Vec<Heading> {
  let nodes: Vec<NodeRef> = root
    .select(HEADING_SELECTOR)
    .map(|selection| selection.map(|h| h.as_node().clone()).collect())
    .unwrap_or_default();

  let mut headings = Vec::with_capacity(nodes.len());

  for node in nodes {
    let Some(element) = node.as_element() else {
      continue;
    };
    let Some(level) = heading_level(element.name.local.as_ref()) else {
      continue;
    };

    let decorations: Vec<NodeRef> = node
      .select(&format!(".{PERMALINK_CLASS}"))
      .map(|selection| selection.map(|a| a.as_node().clone()).collect())
      .unwrap_or_default();
    for decoration in decorations {
      decoration.detach();
    }

    let text = normalize_text(&node.text_contents());
    let id = state.next_id(level, &text);

    {
      let mut attributes = element.attributes.borrow_mut();
      attributes.remove(local_name!("id"));
      attributes.insert(local_name!("id"), id.clone());
    }

    headings.push(Heading { level, text, id });
  }

  debug!(
    "Assigned {} heading anchors with prefix '{}'",
    headings.len(),
    state.prefix()
  );

  headings
}

/// Parse `fragment`, assign heading anchors and serialize it back.
#[must_use]
pub fn assign_anchors(
  fragment: &str,
  state: &mut AnchorState,
) -> (String, Vec<Heading>) {
  dom::transform_fragment(fragment, Vec::new(), |body| {
    assign_heading_anchors(body, state)
  })
}
