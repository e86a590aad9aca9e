//! Thin helpers over the `kuchikikiki` node tree.
//!
//! Fragments are parsed inside an explicit `<head></head><body>` shell so
//! that leading `<script>`, `<style>` or `<meta>` elements stay in the body
//! rather than being hoisted into a synthesized head.
use kuchikikiki::{Attribute, ExpandedName, NodeRef};
use log::error;
use markup5ever::{QualName, local_name, ns};
use tendril::TendrilSink;

/// Parse a complete HTML document.
#[must_use]
pub fn parse_document(html: &str) -> NodeRef {
  kuchikikiki::parse_html().one(html)
}

/// Parse body-level markup and return the `<body>` node holding it.
///
/// Returns [`None`] only if the parser did not produce a body, which
/// html5ever always does in practice.
#[must_use]
pub fn parse_body_fragment(fragment: &str) -> Option<NodeRef> {
  let document = kuchikikiki::parse_html().one(format!(
    "<!DOCTYPE html><html><head></head><body>{fragment}</body></html>"
  ));
  document
    .select_first("body")
    .ok()
    .map(|body| body.as_node().clone())
}

/// Serialize a node including itself.
#[must_use]
pub fn serialize_node(node: &NodeRef) -> String {
  let mut out = Vec::new();
  if let Err(e) = node.serialize(&mut out) {
    error!("Failed to serialize HTML node: {e}");
  }
  String::from_utf8(out).unwrap_or_default()
}

/// Serialize only the children of `node`, e.g. the inner markup of a body.
#[must_use]
pub fn serialize_children(node: &NodeRef) -> String {
  node.children().map(|child| serialize_node(&child)).collect()
}

/// Create an HTML element with the given attributes.
#[must_use]
pub fn new_element(name: &str, attributes: &[(&str, &str)]) -> NodeRef {
  NodeRef::new_element(
    QualName::new(None, ns!(html), name.into()),
    attributes.iter().map(|(key, value)| {
      (ExpandedName::new("", *key), Attribute {
        prefix: None,
        value:  (*value).to_string(),
      })
    }),
  )
}

/// Create an `<a>` element with a class, an href and text content.
#[must_use]
pub fn new_link(class: &str, href: &str, text: &str) -> NodeRef {
  let link = new_element("a", &[("class", class), ("href", href)]);
  link.append(NodeRef::new_text(text));
  link
}

/// Whether `node` is an element carrying `class` in its class list.
#[must_use]
pub fn has_class(node: &NodeRef, class: &str) -> bool {
  node.as_element().is_some_and(|element| {
    element
      .attributes
      .borrow()
      .get(local_name!("class"))
      .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
  })
}

/// The closest preceding sibling that is an element, skipping whitespace-only
/// text and comments.
#[must_use]
pub fn previous_element_sibling(node: &NodeRef) -> Option<NodeRef> {
  let mut current = node.previous_sibling();
  while let Some(sibling) = current {
    if sibling.as_element().is_some() {
      return Some(sibling);
    }
    if let Some(text) = sibling.as_text()
      && !text.borrow().trim().is_empty()
    {
      return None;
    }
    current = sibling.previous_sibling();
  }
  None
}

/// Run a DOM transformation over a body fragment, falling back to the
/// untouched input if anything in the parse/transform cycle panics.
///
/// Empty input short-circuits to an empty result without parsing.
pub fn transform_fragment<T, F>(fragment: &str, fallback: T, transform: F) -> (String, T)
where
  F: FnOnce(&NodeRef) -> T,
{
  if fragment.trim().is_empty() {
    return (String::new(), fallback);
  }

  let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
    let body = parse_body_fragment(fragment)?;
    let value = transform(&body);
    Some((serialize_children(&body), value))
  }));

  match result {
    Ok(Some(processed)) => processed,
    Ok(None) => (fragment.to_string(), fallback),
    Err(panic_err) => {
      error!("Panic during HTML fragment processing: {panic_err:?}");
      (fragment.to_string(), fallback)
    },
  }
}
