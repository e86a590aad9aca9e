//! Asset reference rewriting and path arithmetic for relocated fragments.
//!
//! Fragments are moved from the directory of their source document into the
//! combined document at the root directory, so relative `src` references must
//! be re-expressed relative to the root. This works on the raw text rather
//! than on the parsed tree so that everything other than the rewritten values
//! stays byte-identical.
use std::{
  borrow::Cow,
  path::{Component, Path, PathBuf},
  sync::LazyLock,
};

use log::trace;
use regex::{Captures, Regex};

use crate::utils::never_matching_regex;

static SRC_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"(\s)src="([^"]+)""#).unwrap_or_else(|_| never_matching_regex())
});

static SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| {
  // Two or more scheme characters so that a Windows drive letter is not
  // mistaken for a URL scheme.
  Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]+:")
    .unwrap_or_else(|_| never_matching_regex())
});

/// Whether a reference must be left alone regardless of where the fragment
/// ends up: absolute URLs, protocol-relative URLs, `data:` URIs and in-page
/// anchors.
#[must_use]
pub fn is_location_independent(src: &str) -> bool {
  src.starts_with('#')
    || src.starts_with("//")
    || src.starts_with("data:")
    || SCHEME_RE.is_match(src)
}

/// Lexically normalize a path, collapsing `.` and `..` components.
///
/// Returns [`None`] when an absolute path would climb above the filesystem
/// root. Leading `..` components of a relative path are kept.
#[must_use]
pub fn normalize_path(path: &Path) -> Option<PathBuf> {
  let mut parts: Vec<Component<'_>> = Vec::new();

  for component in path.components() {
    match component {
      Component::CurDir => {},
      Component::ParentDir => {
        match parts.last() {
          Some(Component::Normal(_)) => {
            parts.pop();
          },
          Some(Component::RootDir | Component::Prefix(_)) => return None,
          _ => parts.push(component),
        }
      },
      other => parts.push(other),
    }
  }

  Some(parts.iter().collect())
}

/// Join the components of a relative path with forward slashes, whatever the
/// platform separator is.
#[must_use]
pub fn to_forward_slashes(path: &Path) -> String {
  path
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<Cow<'_, str>>>()
    .join("/")
}

/// Resolve a single `src` value found in a fragment originating from
/// `base_dir` and express it relative to `root`.
///
/// Returns [`None`] when the value must be kept as-is: it is location
/// independent, it cannot be resolved, or it resolves outside `root`.
#[must_use]
pub fn resolve_asset_path(
  src: &str,
  base_dir: &Path,
  root: &Path,
) -> Option<String> {
  if is_location_independent(src) {
    return None;
  }

  let resolved = normalize_path(&base_dir.join(src))?;
  let root = normalize_path(root)?;
  let rel = resolved.strip_prefix(&root).ok()?;

  let rel = to_forward_slashes(rel);
  if rel.is_empty() { None } else { Some(rel) }
}

/// Rewrite every `src="…"` reference in `body_html` so it resolves from
/// `root` instead of `base_dir`.
///
/// References that are location independent, unresolvable or outside `root`
/// are left untouched. Nothing besides the attribute values changes.
#[must_use]
pub fn rewrite_asset_paths(
  body_html: &str,
  base_dir: &Path,
  root: &Path,
) -> String {
  SRC_ATTR_RE
    .replace_all(body_html, |caps: &Captures<'_>| {
      let lead = &caps[1];
      let src = &caps[2];
      resolve_asset_path(src, base_dir, root).map_or_else(
        || {
          trace!("Keeping asset reference as-is: {src}");
          caps[0].to_string()
        },
        |rel| format!("{lead}src=\"{rel}\""),
      )
    })
    .into_owned()
}

/// Compute the href that leads from a document in `from_dir` to `target`,
/// using forward slashes.
///
/// Both paths are normalized first. If they share no common ancestor (e.g.
/// different drive prefixes) the normalized target is returned.
#[must_use]
pub fn relative_href(from_dir: &Path, target: &Path) -> String {
  let (Some(from), Some(target)) =
    (normalize_path(from_dir), normalize_path(target))
  else {
    return to_forward_slashes(target);
  };

  let from_parts: Vec<Component<'_>> = from.components().collect();
  let target_parts: Vec<Component<'_>> = target.components().collect();

  let common = from_parts
    .iter()
    .zip(&target_parts)
    .take_while(|(a, b)| a == b)
    .count();

  if common == 0 && from.has_root() {
    return to_forward_slashes(&target);
  }

  let mut segments: Vec<Cow<'_, str>> =
    vec![Cow::Borrowed(".."); from_parts.len() - common];
  segments.extend(
    target_parts[common..]
      .iter()
      .map(|c| c.as_os_str().to_string_lossy()),
  );

  segments.join("/")
}
