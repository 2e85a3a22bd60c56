use std::path::{Path, PathBuf};

use stowage_platform::short_hash;
use tracing::trace;

use crate::consts::{ENTITY_FILE_EXTENSION, KEY_HASH_LEN, KEY_HASH_SEPARATOR, MAX_SLUG_LEN, MAX_VERBATIM_KEY_LEN};

/// Fallback slug for names without a single alphanumeric character.
const EMPTY_SLUG: &str = "resource";

/// Turn an arbitrary resource name into a filesystem safe key.
///
/// Names made only of `[a-z0-9_-]` (at most 64 chars) are used verbatim.
/// Everything else becomes `<slug>@<hash>`, where the hash is derived from the
/// raw name. Because `@` never occurs in a verbatim key the mapping stays
/// injective across both forms.
pub fn normalize_key(name: &str) -> String {
  if is_verbatim(name) {
    return name.to_string();
  }

  format!("{}{}{}", slugify(name), KEY_HASH_SEPARATOR, short_hash(name, KEY_HASH_LEN))
}

/// File name (no directory) of the record backing `name`.
pub fn entity_file_name(name: &str) -> String {
  format!("{}{}", normalize_key(name), ENTITY_FILE_EXTENSION)
}

/// Full path of the record backing `name` below `root`.
pub fn resource_path(root: &Path, name: &str) -> PathBuf {
  let path = root.join(entity_file_name(name));
  trace!(name, path = %path.display(), "derived resource path");
  path
}

fn is_verbatim(name: &str) -> bool {
  !name.is_empty()
    && name.len() <= MAX_VERBATIM_KEY_LEN
    && name
      .bytes()
      .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
}

fn slugify(name: &str) -> String {
  let mut slug = String::with_capacity(name.len().min(MAX_SLUG_LEN));
  let mut pending_separator = false;

  for c in name.chars() {
    if c.is_ascii_alphanumeric() {
      if pending_separator && !slug.is_empty() {
        slug.push('-');
      }
      pending_separator = false;
      slug.push(c.to_ascii_lowercase());
    } else {
      pending_separator = true;
    }

    if slug.len() >= MAX_SLUG_LEN {
      break;
    }
  }

  slug.truncate(MAX_SLUG_LEN);
  let slug = slug.trim_end_matches('-');
  if slug.is_empty() {
    return EMPTY_SLUG.to_string();
  }
  slug.to_string()
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  #[test]
  fn safe_names_are_kept_verbatim() {
    assert_eq!(normalize_key("widget"), "widget");
    assert_eq!(normalize_key("app_settings-2"), "app_settings-2");
    assert_eq!(entity_file_name("widget"), "widget.entity.json");
  }

  #[test]
  fn unsafe_names_get_slug_and_hash() {
    let key = normalize_key("App\\Settings::Theme");
    let (slug, hash) = key.split_once(KEY_HASH_SEPARATOR).unwrap();
    assert_eq!(slug, "app-settings-theme");
    assert_eq!(hash, short_hash("App\\Settings::Theme", KEY_HASH_LEN));
  }

  #[test]
  fn names_without_alphanumerics_still_get_a_slug() {
    let key = normalize_key("../../");
    assert!(key.starts_with("resource@"));
    assert!(!key.contains('/'));
  }

  #[test]
  fn long_names_are_truncated_but_distinct() {
    let a = "a".repeat(200);
    let b = format!("{}b", "a".repeat(199));
    let key_a = normalize_key(&a);
    let key_b = normalize_key(&b);
    assert_ne!(key_a, key_b);
    assert_eq!(key_a.len(), MAX_SLUG_LEN + 1 + KEY_HASH_LEN);
  }

  #[test]
  fn derivation_is_deterministic() {
    for name in ["widget", "Widget", "some/nested name", "ünïcödé"] {
      assert_eq!(normalize_key(name), normalize_key(name));
    }
  }

  #[test]
  fn distinct_names_map_to_distinct_files() {
    let names = [
      "widget",
      "Widget",
      "WIDGET",
      "widget ",
      "widget-",
      "widget_",
      "app.settings",
      "app/settings",
      "app-settings",
      "app settings",
      "",
      "resource",
      "ünïcödé",
    ];
    let root = Path::new("storage");
    let paths: HashSet<PathBuf> = names.iter().map(|n| resource_path(root, n)).collect();
    assert_eq!(paths.len(), names.len());
  }
}
