use std::{fs, path::Path};

use nbbind_html::Document;

/// Minimal notebook-like export: a head with a title and a body holding the
/// given markup, the way nbconvert lays it out.
pub fn notebook_html(title: &str, body: &str) -> String {
  format!(
    "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}\
     </title>\n</head>\n<body class=\"jp-Notebook\">\n<main>\n{body}\n</main>\n\
     </body>\n</html>\n"
  )
}

/// Write `html` to `dir/name` and read it back as a [`Document`].
pub fn write_document(dir: &Path, name: &str, html: &str) -> Document {
  fs::create_dir_all(dir).expect("Failed to create dir in test");
  let path = dir.join(name);
  fs::write(&path, html).expect("Failed to write document in test");
  Document::read(&path).expect("Failed to read document in test")
}

/// All `id="…"` attribute values in document order.
pub fn ids(html: &str) -> Vec<String> {
  let re = regex::Regex::new(r#"\sid="([^"]*)""#).expect("valid regex");
  re.captures_iter(html).map(|c| c[1].to_string()).collect()
}
